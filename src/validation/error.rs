use crate::style::PaperSize;
use thiserror::Error;

/// Hard failures of [`crate::Validator::validate`].
///
/// Every variant carries the label of the calling chart builder so the message
/// points at the call that went wrong.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{caller}: input must be a series or a list of series, got {found}")]
    InvalidInputShape { caller: String, found: String },

    #[error("{caller}: series list cannot be empty")]
    EmptyInput { caller: String },

    #[error("{caller}: item {position} must be a numeric series, got {found}")]
    InvalidElementType {
        caller: String,
        position: usize,
        found: String,
    },

    #[error("{caller}: {label} must have a datetime index, got {found}")]
    MissingDatetimeIndex {
        caller: String,
        label: String,
        found: String,
    },

    #[error("{caller}: Series {position} must have a '{attribute}' attribute")]
    MissingMetadata {
        caller: String,
        position: usize,
        attribute: &'static str,
    },

    #[error(
        "{caller}: {label} has no time overlap with the first series. \
         First series range: {reference}, {label} range: {found}"
    )]
    NoTimeOverlap {
        caller: String,
        label: String,
        reference: String,
        found: String,
    },

    #[error("{caller}: invalid style name '{name}'. Available styles: {}", .available.join(", "))]
    UnknownStyle {
        caller: String,
        name: String,
        available: Vec<String>,
    },

    #[error(
        "{caller}: invalid paper size '{name}'. Available sizes: {}",
        PaperSize::ALL.map(PaperSize::name).join(", ")
    )]
    UnknownPaperSize { caller: String, name: String },

    #[error("{caller}: {label} has no valid data after removing NaN and infinite values")]
    NoUsableData { caller: String, label: String },
}
