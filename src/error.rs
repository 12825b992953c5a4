use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport: pixel width={width}")]
    InvalidViewport { width: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("duplicate series id: {id}")]
    DuplicateSeries { id: String },

    #[error("failed to fetch {source_ref}: {reason}")]
    Fetch { source_ref: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),
}
