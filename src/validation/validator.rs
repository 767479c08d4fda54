use crate::series::{finite_values, IndexColumn, PlotInput, TimeSeries, ValueColumn};
use crate::style::{PaperSize, StyleRegistry};
use crate::validation::error::ValidationError;
use bon::bon;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::fmt;

/// First and last timestamp of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Earliest and latest timestamp, or `None` for an empty index.
    pub fn of(index: &[NaiveDateTime]) -> Option<Self> {
        let start = *index.iter().min()?;
        let end = *index.iter().max()?;
        Some(Self { start, end })
    }

    pub fn span_millis(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    fn overlaps(&self, other: &TimeRange) -> bool {
        !(other.end < self.start || other.start > self.end)
    }

    fn overlap_millis(&self, other: &TimeRange) -> i64 {
        (self.end.min(other.end) - self.start.max(other.start)).num_milliseconds()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A soft finding. Warnings never abort validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    MissingName {
        position: usize,
    },
    MissingUnit {
        position: usize,
    },
    /// Overlap with the first series is under half of the shorter span.
    LimitedOverlap {
        label: String,
        overlap_millis: i64,
        expected_millis: i64,
    },
    NonFiniteValues {
        label: String,
        count: usize,
        percent: f64,
    },
    /// More than one finite value, all equal. Informational only.
    ConstantValues {
        label: String,
        value: f64,
    },
}

impl ValidationWarning {
    fn log(&self, caller: &str) {
        match self {
            ValidationWarning::ConstantValues { .. } => info!("{}: {}", caller, self),
            _ => warn!("{}: {}", caller, self),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::MissingName { position } => write!(
                f,
                "Series {position} has no name. Set one for better plot labels"
            ),
            ValidationWarning::MissingUnit { position } => write!(
                f,
                "Series {position} has no unit. Set one for better axis labels"
            ),
            ValidationWarning::LimitedOverlap {
                label,
                overlap_millis,
                expected_millis,
            } => write!(
                f,
                "{label} has limited time overlap with the first series. \
                 Overlap: {overlap_millis} ms, minimum expected: {expected_millis} ms"
            ),
            ValidationWarning::NonFiniteValues {
                label,
                count,
                percent,
            } => write!(
                f,
                "{label} contains {count} NaN or infinite values ({percent:.1}% of data). \
                 These will be excluded from plotting"
            ),
            ValidationWarning::ConstantValues { label, value } => write!(
                f,
                "{label} has constant values ({value}). This may result in a flat line plot"
            ),
        }
    }
}

/// The outcome of a successful validation: the series as a list, plus warnings.
#[derive(Clone)]
pub struct ValidatedInput<'a> {
    series: Vec<&'a dyn TimeSeries>,
    warnings: Vec<ValidationWarning>,
}

impl<'a> ValidatedInput<'a> {
    pub fn series(&self) -> &[&'a dyn TimeSeries] {
        &self.series
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn into_series(self) -> Vec<&'a dyn TimeSeries> {
        self.series
    }
}

impl fmt::Debug for ValidatedInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedInput")
            .field("series", &self.series.len())
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Checks plot input against a [`StyleRegistry`] before a chart is built.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r StyleRegistry,
}

#[bon]
impl<'r> Validator<'r> {
    pub fn new(registry: &'r StyleRegistry) -> Self {
        Self { registry }
    }

    /// Validates one series or a list of series for plotting.
    ///
    /// Checks run in order and stop at the first hard failure: non-empty input,
    /// numeric values, datetime index, name/unit metadata, time overlap with the
    /// first series, style name, paper size name, then data quality. Soft
    /// findings are logged and returned in [`ValidatedInput::warnings`].
    ///
    /// # Arguments
    ///
    /// * `input` - A series or a list of series.
    /// * `style` - Name of a registered style.
    /// * `paper_size` - Optional paper size name such as `"A4_LANDSCAPE"`.
    /// * `caller` - Label of the calling function, used in messages. Defaults to `"plotting function"`.
    /// * `require_metadata` - Treat missing name/unit as an error instead of a warning.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first failed check.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use climatevis::{NamedSeries, StyleRegistry, Validator};
    ///
    /// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let temperature = NamedSeries::hourly(start, vec![1.5, 2.0, f64::NAN])
    ///     .with_name("Temperature")
    ///     .with_unit("°C");
    ///
    /// let registry = StyleRegistry::with_builtin_styles();
    /// let validated = Validator::new(&registry)
    ///     .validate()
    ///     .input(&temperature)
    ///     .style("base")
    ///     .paper_size("A4_LANDSCAPE")
    ///     .call()?;
    ///
    /// assert_eq!(validated.series().len(), 1);
    /// assert_eq!(validated.warnings().len(), 1); // one NaN
    /// # Ok::<(), climatevis::ValidationError>(())
    /// ```
    #[builder]
    pub fn validate<'a>(
        &self,
        #[builder(into)] input: PlotInput<'a>,
        style: &str,
        paper_size: Option<&str>,
        #[builder(default = "plotting function")] caller: &str,
        #[builder(default)] require_metadata: bool,
    ) -> Result<ValidatedInput<'a>, ValidationError> {
        let series = input.into_list();
        if series.is_empty() {
            return Err(ValidationError::EmptyInput {
                caller: caller.to_string(),
            });
        }

        check_element_types(&series, caller)?;
        check_datetime_index(&series, caller)?;

        let mut warnings = Vec::new();
        check_metadata(&series, caller, require_metadata, &mut warnings)?;
        check_compatibility(&series, caller, &mut warnings)?;
        self.check_style(style, caller)?;
        if let Some(paper_size) = paper_size {
            check_paper_size(paper_size, caller)?;
        }
        check_data_quality(&series, caller, &mut warnings)?;

        Ok(ValidatedInput { series, warnings })
    }

    fn check_style(&self, style: &str, caller: &str) -> Result<(), ValidationError> {
        if self.registry.contains(style) {
            return Ok(());
        }
        Err(ValidationError::UnknownStyle {
            caller: caller.to_string(),
            name: style.to_string(),
            available: self
                .registry
                .registered_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

fn check_element_types(series: &[&dyn TimeSeries], caller: &str) -> Result<(), ValidationError> {
    for (position, s) in series.iter().enumerate() {
        if let ValueColumn::Unsupported(dtype) = s.values() {
            return Err(ValidationError::InvalidElementType {
                caller: caller.to_string(),
                position,
                found: dtype.to_string(),
            });
        }
    }
    Ok(())
}

fn check_datetime_index(series: &[&dyn TimeSeries], caller: &str) -> Result<(), ValidationError> {
    for (position, s) in series.iter().enumerate() {
        if let IndexColumn::Other(kind) = s.index() {
            return Err(ValidationError::MissingDatetimeIndex {
                caller: caller.to_string(),
                label: s.label(position),
                found: kind.to_string(),
            });
        }
    }
    Ok(())
}

fn check_metadata(
    series: &[&dyn TimeSeries],
    caller: &str,
    require_metadata: bool,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<(), ValidationError> {
    for (position, s) in series.iter().enumerate() {
        let missing = [
            ("name", s.name().is_none(), ValidationWarning::MissingName { position }),
            ("unit", s.unit().is_none(), ValidationWarning::MissingUnit { position }),
        ];
        for (attribute, is_missing, warning) in missing {
            if !is_missing {
                continue;
            }
            if require_metadata {
                return Err(ValidationError::MissingMetadata {
                    caller: caller.to_string(),
                    position,
                    attribute,
                });
            }
            warning.log(caller);
            warnings.push(warning);
        }
    }
    Ok(())
}

fn check_compatibility(
    series: &[&dyn TimeSeries],
    caller: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<(), ValidationError> {
    let Some((first, rest)) = series.split_first() else {
        return Ok(());
    };
    let Some(reference_index) = first.datetime_index() else {
        return Ok(());
    };
    let Some(reference) = TimeRange::of(reference_index) else {
        return Ok(());
    };

    for (offset, s) in rest.iter().enumerate() {
        let position = offset + 1;
        let Some(index) = s.datetime_index() else {
            continue;
        };
        if index == reference_index {
            continue;
        }
        let Some(current) = TimeRange::of(index) else {
            continue;
        };
        let label = s.label(position);

        if !reference.overlaps(&current) {
            return Err(ValidationError::NoTimeOverlap {
                caller: caller.to_string(),
                label,
                reference: reference.to_string(),
                found: current.to_string(),
            });
        }

        // At least half of the shorter span must overlap; exactly half passes.
        let overlap = reference.overlap_millis(&current);
        let shorter = reference.span_millis().min(current.span_millis());
        if overlap * 2 < shorter {
            let warning = ValidationWarning::LimitedOverlap {
                label,
                overlap_millis: overlap,
                expected_millis: shorter / 2,
            };
            warning.log(caller);
            warnings.push(warning);
        }
    }
    Ok(())
}

fn check_paper_size(paper_size: &str, caller: &str) -> Result<(), ValidationError> {
    paper_size
        .parse::<PaperSize>()
        .map(|_| ())
        .map_err(|_| ValidationError::UnknownPaperSize {
            caller: caller.to_string(),
            name: paper_size.to_string(),
        })
}

fn check_data_quality(
    series: &[&dyn TimeSeries],
    caller: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<(), ValidationError> {
    for (position, s) in series.iter().enumerate() {
        let Some(values) = s.numeric_values() else {
            continue;
        };
        let label = s.label(position);

        let non_finite = values.iter().filter(|v| !v.is_finite()).count();
        if non_finite > 0 {
            let warning = ValidationWarning::NonFiniteValues {
                label: label.clone(),
                count: non_finite,
                percent: non_finite as f64 / values.len() as f64 * 100.0,
            };
            warning.log(caller);
            warnings.push(warning);
        }

        let finite = finite_values(values);
        let Some(&first) = finite.first() else {
            return Err(ValidationError::NoUsableData {
                caller: caller.to_string(),
                label,
            });
        };
        if finite.len() > 1 && finite.iter().all(|v| *v == first) {
            let warning = ValidationWarning::ConstantValues {
                label,
                value: first,
            };
            warning.log(caller);
            warnings.push(warning);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{frame_columns, NamedSeries};
    use chrono::{NaiveDate, TimeDelta};
    use polars::prelude::df;

    fn day(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn daily(first: u32, last: u32, name: &str) -> NamedSeries {
        let values = (first..=last).map(f64::from).collect();
        NamedSeries::regular(day(first), TimeDelta::days(1), values)
            .with_name(name)
            .with_unit("°C")
    }

    #[test]
    fn test_single_series_becomes_one_element_list() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        let series = daily(1, 10, "temp");

        let validated = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call()?;

        assert_eq!(validated.series().len(), 1);
        assert_eq!(validated.series()[0].numeric_values(), series.numeric_values());
        assert!(validated.warnings().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_list() {
        let registry = StyleRegistry::with_builtin_styles();
        let empty: Vec<NamedSeries> = Vec::new();

        let result = Validator::new(&registry)
            .validate()
            .input(&empty)
            .style("base")
            .call();

        assert!(matches!(result, Err(ValidationError::EmptyInput { .. })));
    }

    #[test]
    fn test_non_numeric_element_names_position() -> Result<(), Box<dyn std::error::Error>> {
        let registry = StyleRegistry::with_builtin_styles();
        let frame = df!(
            "datetime" => [day(1), day(2)],
            "temp" => [1.0, 2.0],
            "station" => ["06260", "06260"],
        )?;
        let columns = frame_columns(&frame, "datetime")?;

        let result = Validator::new(&registry)
            .validate()
            .input(&columns)
            .style("base")
            .caller("exceedance")
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::InvalidElementType { position: 1, ref caller, .. }) if caller == "exceedance"
        ));
        Ok(())
    }

    #[test]
    fn test_positional_index_is_rejected() {
        let registry = StyleRegistry::with_builtin_styles();
        let series = NamedSeries::positional(vec![1.0, 2.0]).with_name("rh");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::MissingDatetimeIndex { ref label, .. }) if label == "rh"
        ));
    }

    #[test]
    fn test_missing_metadata_warns_by_default() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        let series = NamedSeries::hourly(day(1), vec![1.0, 2.0]);

        let validated = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call()?;

        assert_eq!(
            validated.warnings(),
            &[
                ValidationWarning::MissingName { position: 0 },
                ValidationWarning::MissingUnit { position: 0 }
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_metadata_fails_when_required() {
        let registry = StyleRegistry::with_builtin_styles();
        let series = NamedSeries::hourly(day(1), vec![1.0, 2.0]).with_name("temp");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .require_metadata(true)
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::MissingMetadata { position: 0, attribute: "unit", .. })
        ));
    }

    #[test]
    fn test_disjoint_ranges_have_no_overlap() {
        let registry = StyleRegistry::with_builtin_styles();
        let january = daily(1, 10, "early");
        let later = daily(20, 30, "late");

        let result = Validator::new(&registry)
            .validate()
            .input([&january, &later])
            .style("base")
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::NoTimeOverlap { ref label, .. }) if label == "late"
        ));
    }

    #[test]
    fn test_exactly_half_overlap_passes_silently() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        // Both span 10 days and share days 6..=11, exactly half.
        let first = daily(1, 11, "a");
        let second = daily(6, 16, "b");

        let validated = Validator::new(&registry)
            .validate()
            .input([&first, &second])
            .style("base")
            .call()?;

        assert_eq!(validated.series().len(), 2);
        assert!(validated.warnings().is_empty());
        Ok(())
    }

    #[test]
    fn test_limited_overlap_warns() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        let first = daily(1, 11, "a");
        let second = daily(9, 19, "b");

        let validated = Validator::new(&registry)
            .validate()
            .input([&first, &second])
            .style("base")
            .call()?;

        assert!(matches!(
            validated.warnings(),
            [ValidationWarning::LimitedOverlap { label, .. }] if label == "b"
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_style_lists_available() {
        let registry = StyleRegistry::with_builtin_styles();
        let series = daily(1, 3, "temp");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("fancy")
            .caller("wind_rose")
            .call();

        match result {
            Err(ValidationError::UnknownStyle {
                caller,
                name,
                available,
            }) => {
                assert_eq!(caller, "wind_rose");
                assert_eq!(name, "fancy");
                assert_eq!(available, vec!["base", "base_autosize", "test"]);
            }
            other => panic!("expected UnknownStyle, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_style_in_empty_registry_lists_nothing() {
        let registry = StyleRegistry::new();
        let series = daily(1, 3, "temp");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::UnknownStyle { ref name, ref available, .. })
                if name == "base" && available.is_empty()
        ));
    }

    #[test]
    fn test_unknown_paper_size() {
        let registry = StyleRegistry::with_builtin_styles();
        let series = daily(1, 3, "temp");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .paper_size("LETTER")
            .call();

        assert!(matches!(result, Err(ValidationError::UnknownPaperSize { .. })));
    }

    #[test]
    fn test_ten_percent_nan_warns_and_leaves_input_untouched() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        let mut values: Vec<f64> = (0..10u32).map(f64::from).collect();
        values[3] = f64::NAN;
        let series = NamedSeries::hourly(day(1), values.clone())
            .with_name("temp")
            .with_unit("°C");
        let before = series.clone();

        let validated = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call()?;

        assert!(matches!(
            validated.warnings(),
            [ValidationWarning::NonFiniteValues { count: 1, percent, .. }] if (*percent - 10.0).abs() < 1e-9
        ));
        assert_eq!(series.len(), before.len());
        assert!(series.numeric_values().unwrap()[3].is_nan());
        assert_eq!(series.numeric_values().unwrap()[4], 4.0);
        Ok(())
    }

    #[test]
    fn test_all_nan_has_no_usable_data() {
        let registry = StyleRegistry::with_builtin_styles();
        let series = NamedSeries::hourly(day(1), vec![f64::NAN, f64::INFINITY]).with_name("gust");

        let result = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call();

        assert!(matches!(
            result,
            Err(ValidationError::NoUsableData { ref label, .. }) if label == "gust"
        ));
    }

    #[test]
    fn test_constant_values_are_informational() -> Result<(), ValidationError> {
        let registry = StyleRegistry::with_builtin_styles();
        let series = NamedSeries::hourly(day(1), vec![5.0; 4])
            .with_name("flat")
            .with_unit("m/s");

        let validated = Validator::new(&registry)
            .validate()
            .input(&series)
            .style("base")
            .call()?;

        assert_eq!(
            validated.warnings(),
            &[ValidationWarning::ConstantValues {
                label: "flat".to_string(),
                value: 5.0
            }]
        );
        Ok(())
    }
}
