mod data_window;
mod fetch;
mod loader;
mod series_store;
mod store_config;

pub use data_window::SeriesView;
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{
    FetchedPayload, MemoryFetcher, OfflineFetcher, SourceFetcher, SourceLocation, SourceRef,
};
pub use loader::{LoadRejection, LoadReport};
pub use series_store::{RemoveTarget, SeriesStore};
pub use store_config::{ChartKind, SeriesLayout, StoreConfig};
