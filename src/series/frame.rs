//! Adapter from polars `DataFrame` columns to [`TimeSeries`].
//!
//! Frames produced by weather loaders carry one datetime column plus one column
//! per variable. Each variable column becomes a [`FrameColumn`] sharing the
//! frame's time index. Non-numeric columns are kept (their values are reported
//! as unsupported) so validation can point at the offending position.

use crate::series::error::SeriesError;
use crate::series::{IndexColumn, TimeSeries, ValueColumn};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{Column, DataFrame, DataType, PolarsResult, TimeUnit};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum FrameValues {
    Numeric(Vec<f64>),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
enum FrameIndex {
    Datetime(Vec<NaiveDateTime>),
    Other(String),
}

/// One value column of a `DataFrame`, paired with the frame's index column.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    name: String,
    unit: Option<String>,
    values: FrameValues,
    index: Arc<FrameIndex>,
    rows: usize,
}

impl FrameColumn {
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

impl TimeSeries for FrameColumn {
    fn values(&self) -> ValueColumn<'_> {
        match &self.values {
            FrameValues::Numeric(values) => ValueColumn::Numeric(values),
            FrameValues::Unsupported(dtype) => ValueColumn::Unsupported(dtype),
        }
    }

    fn index(&self) -> IndexColumn<'_> {
        match self.index.as_ref() {
            FrameIndex::Datetime(index) => IndexColumn::Datetime(index),
            FrameIndex::Other(kind) => IndexColumn::Other(kind),
        }
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn row_count(&self) -> usize {
        self.rows
    }
}

/// Splits `frame` into one [`FrameColumn`] per column other than `index_column`.
///
/// Columns are named after the frame columns. Nulls in numeric columns become `NaN`.
///
/// # Errors
///
/// Returns [`SeriesError::ColumnNotFound`] if `index_column` is absent, or
/// [`SeriesError::Frame`] if a column cannot be cast.
pub fn frame_columns(frame: &DataFrame, index_column: &str) -> Result<Vec<FrameColumn>, SeriesError> {
    let index = frame
        .column(index_column)
        .map_err(|e| SeriesError::ColumnNotFound(index_column.to_string(), e))?;
    let index = Arc::new(read_index(index).map_err(|source| SeriesError::Frame {
        column: index_column.to_string(),
        source,
    })?);

    frame
        .get_columns()
        .iter()
        .filter(|column| column.name().as_str() != index_column)
        .map(|column| {
            let name = column.name().to_string();
            let values = read_values(column).map_err(|source| SeriesError::Frame {
                column: name.clone(),
                source,
            })?;
            Ok(FrameColumn {
                name,
                unit: None,
                values,
                index: Arc::clone(&index),
                rows: frame.height(),
            })
        })
        .collect()
}

fn read_index(column: &Column) -> PolarsResult<FrameIndex> {
    match column.dtype() {
        DataType::Datetime(_, _) | DataType::Date => {
            let millis = column.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
            let stamps: Option<Vec<NaiveDateTime>> = millis
                .datetime()?
                .into_iter()
                .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
                .collect();
            Ok(match stamps {
                Some(stamps) => FrameIndex::Datetime(stamps),
                None => FrameIndex::Other("datetime with nulls".to_string()),
            })
        }
        other => Ok(FrameIndex::Other(other.to_string())),
    }
}

fn read_values(column: &Column) -> PolarsResult<FrameValues> {
    match column.dtype() {
        DataType::Float64
        | DataType::Float32
        | DataType::Int64
        | DataType::Int32
        | DataType::Int16
        | DataType::Int8
        | DataType::UInt64
        | DataType::UInt32
        | DataType::UInt16
        | DataType::UInt8 => {
            let floats = column.cast(&DataType::Float64)?;
            let values = floats
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            Ok(FrameValues::Numeric(values))
        }
        other => Ok(FrameValues::Unsupported(other.to_string())),
    }
}
