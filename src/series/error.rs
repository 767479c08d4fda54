use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Series has {values} values but {index} index entries")]
    LengthMismatch { values: usize, index: usize },

    #[error("Column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed reading column '{column}' from DataFrame")]
    Frame {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to parse series document")]
    DocumentParse(#[from] serde_json::Error),
}
