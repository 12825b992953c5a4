use serde::{Deserialize, Serialize};

use crate::core::ExtremumRule;
use crate::error::{ChartError, ChartResult};
use crate::parse::LimitSpec;

/// Storage layout of the payloads a store loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesLayout {
    /// A y array on an implicit, uniformly spaced x grid.
    #[default]
    Dense,
    /// An array of objects with named x and y fields.
    Records,
}

/// Kind of chart consuming the store.
///
/// Determines the default extremum rule and whether the chart draws binned
/// or raw windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Series,
    MassSpectrum,
    /// Transmittance spectra: significant peaks point down.
    Infrared,
    Nmr,
    /// 2D correlation maps drawn as scatter points.
    Nmr2d,
}

impl ChartKind {
    /// Extremum rule used when a caller does not pick one.
    ///
    /// Infrared keeps minima. Otherwise record series rank by `|y|` and dense
    /// arrays keep the plain maximum.
    #[must_use]
    pub fn default_extremum_rule(self, layout: SeriesLayout) -> ExtremumRule {
        match (self, layout) {
            (Self::Infrared, _) => ExtremumRule::Min,
            (_, SeriesLayout::Records) => ExtremumRule::MaxMagnitude,
            (_, SeriesLayout::Dense) => ExtremumRule::Max,
        }
    }

    /// `false` for kinds that draw every visible sample.
    #[must_use]
    pub fn reads_binned(self) -> bool {
        !matches!(self, Self::Nmr2d)
    }
}

/// Store configuration.
///
/// Serializable so hosts can keep chart setup next to their data manifests.
/// Missing fields fall back to `StoreConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub layout: SeriesLayout,
    pub chart_kind: ChartKind,
    /// Record x field; a dotted prefix locates the record array.
    pub x_accessor: String,
    /// Dense: path of the y array (empty = payload itself). Records: y field.
    pub y_accessor: String,
    pub title_field: Option<String>,
    pub id_field: Option<String>,
    pub x_limits: LimitSpec,
    pub y_limits: LimitSpec,
    /// Horizontal pixels per output bin.
    pub bin_width_px: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            layout: SeriesLayout::Dense,
            chart_kind: ChartKind::Series,
            x_accessor: "x".to_owned(),
            y_accessor: String::new(),
            title_field: None,
            id_field: None,
            x_limits: LimitSpec::Auto,
            y_limits: LimitSpec::Auto,
            bin_width_px: 1.0,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn new(layout: SeriesLayout) -> Self {
        let y_accessor = match layout {
            SeriesLayout::Dense => String::new(),
            SeriesLayout::Records => "y".to_owned(),
        };
        Self {
            layout,
            y_accessor,
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Configuration(format!("failed to parse store config: {e}")))?;
        config.validate()
    }

    #[must_use]
    pub fn with_chart_kind(mut self, chart_kind: ChartKind) -> Self {
        self.chart_kind = chart_kind;
        self
    }

    #[must_use]
    pub fn with_x_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.x_accessor = accessor.into();
        self
    }

    #[must_use]
    pub fn with_y_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.y_accessor = accessor.into();
        self
    }

    #[must_use]
    pub fn with_title_field(mut self, field: impl Into<String>) -> Self {
        self.title_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_x_limits(mut self, limits: LimitSpec) -> Self {
        self.x_limits = limits;
        self
    }

    #[must_use]
    pub fn with_y_limits(mut self, limits: LimitSpec) -> Self {
        self.y_limits = limits;
        self
    }

    #[must_use]
    pub fn with_bin_width_px(mut self, bin_width_px: f64) -> Self {
        self.bin_width_px = bin_width_px;
        self
    }

    /// Default extremum rule for this store's chart kind and layout.
    #[must_use]
    pub fn default_extremum_rule(&self) -> ExtremumRule {
        self.chart_kind.default_extremum_rule(self.layout)
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.bin_width_px.is_finite() || self.bin_width_px <= 0.0 {
            return Err(ChartError::Configuration(
                "bin width must be finite and > 0".to_owned(),
            ));
        }
        if self.layout == SeriesLayout::Records
            && (self.x_accessor.is_empty() || self.y_accessor.is_empty())
        {
            return Err(ChartError::Configuration(
                "record layout requires x and y accessors".to_owned(),
            ));
        }
        self.x_limits.validate("x")?;
        self.y_limits.validate("y")?;
        Ok(self)
    }
}
