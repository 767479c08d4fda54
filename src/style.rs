//! Named chart styles and paper sizes.
//!
//! A [`StyleRegistry`] maps style names to [`StyleDefinition`]s (Plotly
//! templates) and stamps a style plus a [`PaperSize`] onto anything
//! implementing [`crate::Chart`].

pub(crate) mod definition;
pub(crate) mod error;
pub(crate) mod paper_size;
pub(crate) mod registry;

pub use definition::StyleDefinition;
pub use error::StyleError;
pub use paper_size::{resolve_paper_size, Dimensions, PaperSize};
pub use registry::{StyleLoadFailure, StyleRegistry, BUILTIN_STYLE_NAMES, DEFAULT_STYLE};
