//! Up-front checks shared by every chart builder.

pub(crate) mod error;
pub(crate) mod summary;
pub(crate) mod validator;

pub use error::ValidationError;
pub use summary::{summarize, SeriesSummary, ValidationSummary};
pub use validator::{TimeRange, ValidatedInput, ValidationWarning, Validator};
