//! Reads series from JSON documents.
//!
//! A document is either one series object or an array of them:
//!
//! ```json
//! { "name": "Dry bulb", "unit": "°C",
//!   "index": ["2023-01-01T00:00:00", "2023-01-01T01:00:00"],
//!   "values": [4.2, null] }
//! ```
//!
//! `null` values become `NaN`. A series without `index` gets a positional index,
//! which validation later rejects for time-based charts.

use crate::error::ClimateVisError;
use crate::series::named::NamedSeries;
use crate::series::SeriesError;
use crate::validation::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Parses `text` as JSON and reads it with [`read_series_document`].
///
/// # Errors
///
/// [`SeriesError::DocumentParse`] for malformed JSON, otherwise the
/// [`ValidationError`]s of [`read_series_document`].
pub fn parse_series_document(text: &str, caller: &str) -> Result<Vec<NamedSeries>, ClimateVisError> {
    let document: Value = serde_json::from_str(text).map_err(SeriesError::from)?;
    Ok(read_series_document(&document, caller)?)
}

/// Normalizes a series document into a list of series.
///
/// # Errors
///
/// * [`ValidationError::InvalidInputShape`] if the document is neither an object nor an array.
/// * [`ValidationError::EmptyInput`] for an empty array.
/// * [`ValidationError::InvalidElementType`] for an entry without a numeric `values` array,
///   or whose `index` and `values` differ in length.
/// * [`ValidationError::MissingDatetimeIndex`] if an `index` entry is not a timestamp.
pub fn read_series_document(document: &Value, caller: &str) -> Result<Vec<NamedSeries>, ValidationError> {
    let entries: Vec<&Value> = match document {
        Value::Object(_) => vec![document],
        Value::Array(items) => items.iter().collect(),
        other => {
            return Err(ValidationError::InvalidInputShape {
                caller: caller.to_string(),
                found: json_kind(other).to_string(),
            })
        }
    };
    if entries.is_empty() {
        return Err(ValidationError::EmptyInput {
            caller: caller.to_string(),
        });
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| read_entry(entry, position, caller))
        .collect()
}

fn read_entry(entry: &Value, position: usize, caller: &str) -> Result<NamedSeries, ValidationError> {
    let invalid = |found: String| ValidationError::InvalidElementType {
        caller: caller.to_string(),
        position,
        found,
    };

    let object = entry
        .as_object()
        .ok_or_else(|| invalid(json_kind(entry).to_string()))?;
    let values = read_values(object).ok_or_else(|| invalid("object without numeric 'values'".to_string()))?;
    let name = object.get("name").and_then(Value::as_str);
    let unit = object.get("unit").and_then(Value::as_str);

    let mut series = match object.get("index") {
        None | Some(Value::Null) => NamedSeries::positional(values),
        Some(index) => {
            let label = name
                .map(str::to_string)
                .unwrap_or_else(|| format!("Series {position}"));
            let index = read_index(index).ok_or_else(|| ValidationError::MissingDatetimeIndex {
                caller: caller.to_string(),
                label,
                found: json_kind(index).to_string(),
            })?;
            NamedSeries::builder()
                .index(index)
                .values(values)
                .build()
                .map_err(|e| invalid(e.to_string()))?
        }
    };
    if let Some(name) = name {
        series = series.with_name(name);
    }
    if let Some(unit) = unit {
        series = series.with_unit(unit);
    }
    Ok(series)
}

fn read_values(object: &Map<String, Value>) -> Option<Vec<f64>> {
    object
        .get("values")?
        .as_array()?
        .iter()
        .map(|v| match v {
            Value::Null => Some(f64::NAN),
            other => other.as_f64(),
        })
        .collect()
}

fn read_index(index: &Value) -> Option<Vec<NaiveDateTime>> {
    index
        .as_array()?
        .iter()
        .map(|stamp| stamp.as_str().and_then(parse_timestamp))
        .collect()
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            text.parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;
    use serde_json::json;

    #[test]
    fn test_single_object_becomes_one_series() -> Result<(), ValidationError> {
        let document = json!({
            "name": "Dry bulb",
            "unit": "°C",
            "index": ["2023-01-01T00:00:00", "2023-01-01 01:00:00", "2023-01-01T02:00:00Z"],
            "values": [4.2, null, 3.9],
        });

        let series = read_series_document(&document, "test")?;

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name(), Some("Dry bulb"));
        assert_eq!(series[0].unit(), Some("°C"));
        assert_eq!(series[0].datetime_index().map(<[_]>::len), Some(3));
        assert!(series[0].numeric_values().unwrap()[1].is_nan());
        Ok(())
    }

    #[test]
    fn test_scalar_document_is_invalid_shape() {
        let result = read_series_document(&json!(42), "histogram");

        assert!(matches!(
            result,
            Err(ValidationError::InvalidInputShape { ref found, .. }) if found == "number"
        ));
    }

    #[test]
    fn test_non_object_entry_names_position() {
        let document = json!([
            { "index": ["2023-01-01"], "values": [1.0] },
            7
        ]);

        let result = read_series_document(&document, "exceedance");

        assert!(matches!(
            result,
            Err(ValidationError::InvalidElementType { position: 1, .. })
        ));
    }

    #[test]
    fn test_unparseable_index_is_missing_datetime_index() {
        let document = json!({ "name": "rh", "index": [1, 2], "values": [1.0, 2.0] });

        let result = read_series_document(&document, "test");

        assert!(matches!(
            result,
            Err(ValidationError::MissingDatetimeIndex { ref label, .. }) if label == "rh"
        ));
    }

    #[test]
    fn test_length_mismatch_is_invalid_element() {
        let document = json!({ "index": ["2023-01-01"], "values": [1.0, 2.0] });

        let result = read_series_document(&document, "test");

        assert!(matches!(
            result,
            Err(ValidationError::InvalidElementType { position: 0, .. })
        ));
    }

    #[test]
    fn test_empty_array_is_empty_input() {
        let result = read_series_document(&json!([]), "test");

        assert!(matches!(result, Err(ValidationError::EmptyInput { .. })));
    }

    #[test]
    fn test_parse_reports_malformed_json() {
        let result = parse_series_document("{ not json", "test");

        assert!(matches!(
            result,
            Err(ClimateVisError::Series(SeriesError::DocumentParse(_)))
        ));
    }
}
