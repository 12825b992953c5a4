//! spectrum-rs: windowing and binning engine for spectral chart data.
//!
//! A `SeriesStore` loads infrared, mass, NMR and generic series from JSON or
//! JCAMP-DX sources and hands renderers pixel-resolution point arrays for the
//! visible x-domain. Binning keeps the extremum of each bin, so peaks survive
//! heavy zoom-out instead of being averaged away.

pub mod api;
pub mod core;
pub mod error;
pub mod parse;
pub mod telemetry;

pub use api::{SeriesStore, StoreConfig};
pub use error::{ChartError, ChartResult};
