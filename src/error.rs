use crate::plots::ChartError;
use crate::series::SeriesError;
use crate::style::StyleError;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateVisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}
