use crate::series::{IndexColumn, TimeSeries, ValueColumn};
use crate::validation::validator::TimeRange;
use serde::Serialize;

/// Per-series facts useful when a chart looks wrong.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub position: usize,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub length: usize,
    pub index_kind: String,
    pub value_kind: String,
    pub nan_count: usize,
    pub infinite_count: usize,
    /// `"{start} to {end}"`, or `"N/A"` without a datetime index.
    pub time_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub total_series: usize,
    pub series: Vec<SeriesSummary>,
}

/// Describes each series without validating it.
pub fn summarize(series: &[&dyn TimeSeries]) -> ValidationSummary {
    let series: Vec<SeriesSummary> = series
        .iter()
        .enumerate()
        .map(|(position, s)| summarize_one(position, *s))
        .collect();
    ValidationSummary {
        total_series: series.len(),
        series,
    }
}

fn summarize_one(position: usize, series: &dyn TimeSeries) -> SeriesSummary {
    let (length, value_kind, nan_count, infinite_count) = match series.values() {
        ValueColumn::Numeric(values) => (
            values.len(),
            "f64".to_string(),
            values.iter().filter(|v| v.is_nan()).count(),
            values.iter().filter(|v| v.is_infinite()).count(),
        ),
        ValueColumn::Unsupported(dtype) => (series.row_count(), dtype.to_string(), 0, 0),
    };
    let (index_kind, time_range) = match series.index() {
        IndexColumn::Datetime(index) => (
            "datetime".to_string(),
            TimeRange::of(index).map_or_else(|| "N/A".to_string(), |range| range.to_string()),
        ),
        IndexColumn::Other(kind) => (kind.to_string(), "N/A".to_string()),
    };

    SeriesSummary {
        position,
        name: series.name().map(str::to_string),
        unit: series.unit().map(str::to_string),
        length,
        index_kind,
        value_kind,
        nan_count,
        infinite_count,
        time_range,
    }
}
