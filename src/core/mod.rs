pub mod binning;
pub mod orientation;
pub mod scale;
pub mod series;
pub mod types;
pub mod windowing;

pub use binning::{BinnedPoints, ExtremumBinner, ExtremumRule, bin_series, bin_step};
pub use orientation::orient;
pub use scale::{LinearScale, ViewportDescriptor};
pub use series::{
    DenseSamples, Record, RecordSamples, SampleSource, Series, SeriesAccessors, SeriesData,
};
pub use types::{Extent, SeriesPoint, SeriesWindow};
pub use windowing::{EmptyReason, SeriesOutcome, WindowPass, expand_window, window_points};
