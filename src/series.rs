//! Time-indexed numeric series.
//!
//! Chart builders never depend on a concrete series type. They consume the
//! [`TimeSeries`] capability, which exposes the value column, the index column
//! and the optional `name`/`unit` metadata. [`NamedSeries`] is the owned
//! implementation; [`FrameColumn`] adapts polars `DataFrame` columns.

pub(crate) mod document;
pub(crate) mod error;
pub(crate) mod frame;
pub(crate) mod named;

use chrono::NaiveDateTime;

/// The value column of a series as seen by validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueColumn<'a> {
    /// Ordered numeric values. Missing observations are `NaN`.
    Numeric(&'a [f64]),
    /// The column holds something that is not numeric. Carries the dtype name.
    Unsupported(&'a str),
}

/// The index column of a series as seen by validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexColumn<'a> {
    /// Ordered timestamps, one per value.
    Datetime(&'a [NaiveDateTime]),
    /// Any other index (row numbers, strings, ...). Carries a description of its kind.
    Other(&'a str),
}

/// Capability required from anything that is plotted.
///
/// Implementors keep `values` and `index` the same length.
pub trait TimeSeries {
    fn values(&self) -> ValueColumn<'_>;

    fn index(&self) -> IndexColumn<'_>;

    fn name(&self) -> Option<&str>;

    fn unit(&self) -> Option<&str>;

    /// Number of rows, whatever the value column holds.
    fn row_count(&self) -> usize;

    /// The numeric values, or `None` when the value column is not numeric.
    fn numeric_values(&self) -> Option<&[f64]> {
        match self.values() {
            ValueColumn::Numeric(values) => Some(values),
            ValueColumn::Unsupported(_) => None,
        }
    }

    /// The timestamps, or `None` when the index is not datetime-like.
    fn datetime_index(&self) -> Option<&[NaiveDateTime]> {
        match self.index() {
            IndexColumn::Datetime(index) => Some(index),
            IndexColumn::Other(_) => None,
        }
    }

    /// Display label: the name when set, `"Series {position}"` otherwise.
    fn label(&self, position: usize) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Series {position}"))
    }
}

/// Input accepted by the validator and every chart builder: one series or a list.
///
/// A single series is normalized to a one-element list during validation.
#[derive(Clone)]
pub enum PlotInput<'a> {
    Single(&'a dyn TimeSeries),
    List(Vec<&'a dyn TimeSeries>),
}

impl<'a> PlotInput<'a> {
    /// Normalizes to a list, wrapping a single series.
    pub fn into_list(self) -> Vec<&'a dyn TimeSeries> {
        match self {
            PlotInput::Single(series) => vec![series],
            PlotInput::List(list) => list,
        }
    }
}

impl<'a> From<&'a dyn TimeSeries> for PlotInput<'a> {
    fn from(series: &'a dyn TimeSeries) -> Self {
        PlotInput::Single(series)
    }
}

impl<'a> From<&'a NamedSeries> for PlotInput<'a> {
    fn from(series: &'a NamedSeries) -> Self {
        PlotInput::Single(series)
    }
}

impl<'a> From<&'a FrameColumn> for PlotInput<'a> {
    fn from(series: &'a FrameColumn) -> Self {
        PlotInput::Single(series)
    }
}

impl<'a> From<Vec<&'a dyn TimeSeries>> for PlotInput<'a> {
    fn from(list: Vec<&'a dyn TimeSeries>) -> Self {
        PlotInput::List(list)
    }
}

impl<'a> From<&'a [NamedSeries]> for PlotInput<'a> {
    fn from(list: &'a [NamedSeries]) -> Self {
        PlotInput::List(list.iter().map(|s| s as &dyn TimeSeries).collect())
    }
}

impl<'a> From<&'a Vec<NamedSeries>> for PlotInput<'a> {
    fn from(list: &'a Vec<NamedSeries>) -> Self {
        PlotInput::from(list.as_slice())
    }
}

impl<'a, const N: usize> From<[&'a NamedSeries; N]> for PlotInput<'a> {
    fn from(list: [&'a NamedSeries; N]) -> Self {
        PlotInput::List(list.into_iter().map(|s| s as &dyn TimeSeries).collect())
    }
}

impl<'a> From<&'a [FrameColumn]> for PlotInput<'a> {
    fn from(list: &'a [FrameColumn]) -> Self {
        PlotInput::List(list.iter().map(|s| s as &dyn TimeSeries).collect())
    }
}

impl<'a> From<&'a Vec<FrameColumn>> for PlotInput<'a> {
    fn from(list: &'a Vec<FrameColumn>) -> Self {
        PlotInput::from(list.as_slice())
    }
}

pub use document::{parse_series_document, read_series_document};
pub use error::SeriesError;
pub use frame::{frame_columns, FrameColumn};
pub use named::{NamedSeries, SeriesIndex};

/// Finite values of a series, in index order.
pub(crate) fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}
