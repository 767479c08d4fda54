//! The chart abstraction the style registry writes to, and its Plotly implementation.

pub(crate) mod figure;

use crate::style::{Dimensions, StyleDefinition};

/// What the style registry needs from a chart: somewhere to put the active
/// style and the pixel dimensions.
pub trait Chart {
    fn set_style(&mut self, name: &str, definition: &StyleDefinition);

    fn set_dimensions(&mut self, dimensions: Dimensions);
}

pub use figure::Figure;
