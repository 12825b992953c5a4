use serde::Serialize;
use tracing::debug;

use crate::core::{
    ExtremumRule, Series, SeriesOutcome, ViewportDescriptor, bin_series, window_points,
};
use crate::error::ChartResult;

use super::SeriesStore;

/// Drawable output for one series of a store, in store order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub id: String,
    pub outcome: SeriesOutcome,
}

impl SeriesStore {
    /// Unbinned samples inside the visible domain, one entry per series.
    ///
    /// Narrows each series' cached window but leaves its bin count alone.
    pub fn get(&mut self, viewport: &ViewportDescriptor) -> ChartResult<Vec<SeriesView>> {
        let extent = viewport.visible_extent()?;
        debug!(x0 = extent.0, x1 = extent.1, "windowing series");

        Ok(self
            .series
            .values_mut()
            .map(|series| {
                let pass = window_points(series.data(), series.window(), extent);
                series.set_window(pass.window);
                SeriesView {
                    id: series.id().to_owned(),
                    outcome: pass.outcome,
                }
            })
            .collect())
    }

    /// Extremum-binned samples at pixel resolution, one entry per series.
    ///
    /// Each series' window is read, advanced by the pass and written back, so
    /// repeated calls at the same zoom reuse the same bin count.
    pub fn bin(
        &mut self,
        viewport: &ViewportDescriptor,
        rule: ExtremumRule,
    ) -> ChartResult<Vec<SeriesView>> {
        let extent = viewport.visible_extent()?;
        let pixel_width = viewport.pixel_width;
        let bin_width_px = self.config.bin_width_px;
        debug!(
            x0 = extent.0,
            x1 = extent.1,
            pixel_width,
            rule = ?rule,
            "binning series"
        );

        let bin_one = |series: &mut Series| {
            let pass = bin_series(
                series.data(),
                series.window(),
                extent,
                pixel_width,
                bin_width_px,
                rule,
            );
            series.set_window(pass.window);
            SeriesView {
                id: series.id().to_owned(),
                outcome: pass.outcome,
            }
        };

        #[cfg(feature = "parallel-binning")]
        {
            use rayon::prelude::*;

            let series: Vec<&mut Series> = self.series.values_mut().collect();
            return Ok(series.into_par_iter().map(bin_one).collect());
        }

        #[cfg(not(feature = "parallel-binning"))]
        {
            Ok(self.series.values_mut().map(bin_one).collect())
        }
    }

    /// `bin` with the rule implied by the configured chart kind and layout.
    pub fn bin_with_default_rule(
        &mut self,
        viewport: &ViewportDescriptor,
    ) -> ChartResult<Vec<SeriesView>> {
        let rule = self.config.default_extremum_rule();
        self.bin(viewport, rule)
    }

    /// Binned or raw windows, whichever the configured chart kind draws.
    pub fn view(&mut self, viewport: &ViewportDescriptor) -> ChartResult<Vec<SeriesView>> {
        if self.config.chart_kind.reads_binned() {
            self.bin_with_default_rule(viewport)
        } else {
            self.get(viewport)
        }
    }
}
