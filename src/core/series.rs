use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::types::{Extent, SeriesPoint, SeriesWindow};

/// Uniform read access to the samples of a series.
///
/// Windowing and binning are written once against this trait; the two
/// storage layouts only differ in how `x_at`/`y_at` resolve an index.
/// Implementations must return non-decreasing `x_at` values.
pub trait SampleSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// X value of sample `index`. `index` must be `< len()`.
    fn x_at(&self, index: usize) -> f64;

    /// Y value of sample `index`. `index` must be `< len()`.
    fn y_at(&self, index: usize) -> f64;

    fn point_at(&self, index: usize) -> SeriesPoint {
        SeriesPoint::new(index, self.x_at(index), self.y_at(index))
    }
}

/// Y values on an implicit, uniformly spaced x grid.
///
/// Sample `i` sits at `i * (x_max - x_min) / len + x_min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSamples {
    values: Vec<f64>,
    x_limits: Extent,
}

impl DenseSamples {
    #[must_use]
    pub fn new(values: Vec<f64>, x_limits: Extent) -> Self {
        Self { values, x_limits }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn x_step(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.x_limits.span() / self.values.len() as f64
    }
}

impl SampleSource for DenseSamples {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn x_at(&self, index: usize) -> f64 {
        index as f64 * self.x_step() + self.x_limits.min
    }

    fn y_at(&self, index: usize) -> f64 {
        self.values[index]
    }
}

/// One explicit sample of a record series.
///
/// `fields` keeps the raw payload object so renderers can read extra columns;
/// `annotations` holds rows joined from a companion annotation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub annotations: Vec<Vec<Value>>,
}

impl Record {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            fields: Map::new(),
            annotations: Vec::new(),
        }
    }
}

/// Records ordered by non-decreasing `x`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordSamples {
    records: Vec<Record>,
}

impl RecordSamples {
    /// Wraps records that are already sorted by `x`.
    #[must_use]
    pub fn from_sorted(records: Vec<Record>) -> Self {
        debug_assert!(records.windows(2).all(|pair| pair[0].x <= pair[1].x));
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access for enrichment that leaves `x` untouched.
    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }
}

impl SampleSource for RecordSamples {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn x_at(&self, index: usize) -> f64 {
        self.records[index].x
    }

    fn y_at(&self, index: usize) -> f64 {
        self.records[index].y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesData {
    Dense(DenseSamples),
    Records(RecordSamples),
}

impl SampleSource for SeriesData {
    fn len(&self) -> usize {
        match self {
            Self::Dense(samples) => samples.len(),
            Self::Records(samples) => samples.len(),
        }
    }

    fn x_at(&self, index: usize) -> f64 {
        match self {
            Self::Dense(samples) => samples.x_at(index),
            Self::Records(samples) => samples.x_at(index),
        }
    }

    fn y_at(&self, index: usize) -> f64 {
        match self {
            Self::Dense(samples) => samples.y_at(index),
            Self::Records(samples) => samples.y_at(index),
        }
    }
}

/// Field names used to read x/y from a raw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesAccessors {
    pub x: String,
    pub y: String,
}

impl SeriesAccessors {
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// One named dataset held by a `SeriesStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    id: String,
    title: String,
    accessors: SeriesAccessors,
    x_limits: Extent,
    y_limits: Extent,
    data: SeriesData,
    window: SeriesWindow,
}

impl Series {
    /// Creates a series with a full window. An empty `title` falls back to `id`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: Option<String>,
        accessors: SeriesAccessors,
        x_limits: Extent,
        y_limits: Extent,
        data: SeriesData,
    ) -> Self {
        let id = id.into();
        let title = title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| id.clone());
        let window = SeriesWindow::full(data.len());
        Self {
            id,
            title,
            accessors,
            x_limits,
            y_limits,
            data,
            window,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn accessors(&self) -> &SeriesAccessors {
        &self.accessors
    }

    #[must_use]
    pub fn x_limits(&self) -> Extent {
        self.x_limits
    }

    #[must_use]
    pub fn y_limits(&self) -> Extent {
        self.y_limits
    }

    #[must_use]
    pub fn data(&self) -> &SeriesData {
        &self.data
    }

    #[must_use]
    pub fn window(&self) -> SeriesWindow {
        self.window
    }

    /// Record behind a drawable point, for record series only.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<&Record> {
        match &self.data {
            SeriesData::Records(samples) => samples.records().get(index),
            SeriesData::Dense(_) => None,
        }
    }

    pub(crate) fn set_window(&mut self, window: SeriesWindow) {
        self.window = window.clamped(self.data.len());
    }

    pub(crate) fn reset_window(&mut self) {
        self.window = SeriesWindow::full(self.data.len());
    }
}
