use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("{caller}: {message}")]
    InvalidParameter { caller: String, message: String },

    #[error("{caller}: found {found} distinct units, only up to two are supported")]
    TooManyUnits { caller: String, found: usize },

    #[error("{caller}: all series must share the same datetime index")]
    IndexMismatch { caller: String },

    #[error("{caller}: bands list cannot be empty")]
    EmptyBands { caller: String },

    #[error("Failed to aggregate series")]
    Aggregation(#[from] PolarsError),
}

impl ChartError {
    pub(crate) fn invalid(caller: &str, message: impl Into<String>) -> Self {
        ChartError::InvalidParameter {
            caller: caller.to_string(),
            message: message.into(),
        }
    }
}
