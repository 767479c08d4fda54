//! The owned series type.

use crate::series::error::SeriesError;
use crate::series::{IndexColumn, TimeSeries, ValueColumn};
use bon::bon;
use chrono::{NaiveDateTime, TimeDelta};

/// Index of a [`NamedSeries`].
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesIndex {
    /// One timestamp per value.
    Datetime(Vec<NaiveDateTime>),
    /// Row numbers `0..len`; the series has no time axis.
    Positional(usize),
}

impl SeriesIndex {
    pub fn len(&self) -> usize {
        match self {
            SeriesIndex::Datetime(index) => index.len(),
            SeriesIndex::Positional(len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A time-indexed numeric sequence with optional display name and physical unit.
///
/// The unit is metadata, kept apart from the name so axis titles can be
/// composed as `"{title} ({unit})"`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use climatevis::{NamedSeries, TimeSeries};
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let temperature = NamedSeries::hourly(start, vec![4.1, 3.8, 3.5])
///     .with_name("Dry bulb temperature")
///     .with_unit("°C");
///
/// assert_eq!(temperature.len(), 3);
/// assert_eq!(temperature.unit(), Some("°C"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    index: SeriesIndex,
    values: Vec<f64>,
    name: Option<String>,
    unit: Option<String>,
}

#[bon]
impl NamedSeries {
    /// Builds a series from timestamps and values of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `index` and `values` differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use climatevis::NamedSeries;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2023, 7, d).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// let wind = NamedSeries::builder()
    ///     .index(vec![day(1), day(2)])
    ///     .values(vec![3.2, 5.9])
    ///     .name("Wind speed")
    ///     .unit("m/s")
    ///     .build()?;
    /// # Ok::<(), climatevis::SeriesError>(())
    /// ```
    #[builder]
    pub fn new(
        index: Vec<NaiveDateTime>,
        values: Vec<f64>,
        #[builder(into)] name: Option<String>,
        #[builder(into)] unit: Option<String>,
    ) -> Result<Self, SeriesError> {
        if index.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                values: values.len(),
                index: index.len(),
            });
        }
        Ok(Self {
            index: SeriesIndex::Datetime(index),
            values,
            name,
            unit,
        })
    }

    /// Builds an hourly series starting at `start`, one value per hour.
    pub fn hourly(start: NaiveDateTime, values: Vec<f64>) -> Self {
        Self::regular(start, TimeDelta::hours(1), values)
    }

    /// Builds a series with a fixed `step` between consecutive timestamps.
    pub fn regular(start: NaiveDateTime, step: TimeDelta, values: Vec<f64>) -> Self {
        let index = std::iter::successors(Some(start), |stamp| Some(*stamp + step))
            .take(values.len())
            .collect();
        Self {
            index: SeriesIndex::Datetime(index),
            values,
            name: None,
            unit: None,
        }
    }

    /// Builds a series indexed by row number only.
    pub fn positional(values: Vec<f64>) -> Self {
        Self {
            index: SeriesIndex::Positional(values.len()),
            values,
            name: None,
            unit: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn series_index(&self) -> &SeriesIndex {
        &self.index
    }
}

impl TimeSeries for NamedSeries {
    fn values(&self) -> ValueColumn<'_> {
        ValueColumn::Numeric(&self.values)
    }

    fn index(&self) -> IndexColumn<'_> {
        match &self.index {
            SeriesIndex::Datetime(index) => IndexColumn::Datetime(index),
            SeriesIndex::Positional(_) => IndexColumn::Other("positional"),
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn row_count(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn midnight(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_builder_rejects_length_mismatch() {
        let result = NamedSeries::builder()
            .index(vec![midnight(1), midnight(2)])
            .values(vec![1.0])
            .build();

        assert!(matches!(
            result,
            Err(SeriesError::LengthMismatch { values: 1, index: 2 })
        ));
    }

    #[test]
    fn test_builder_keeps_metadata() -> Result<(), SeriesError> {
        let series = NamedSeries::builder()
            .index(vec![midnight(1)])
            .values(vec![12.5])
            .name("Relative humidity")
            .unit("%")
            .build()?;

        assert_eq!(series.name(), Some("Relative humidity"));
        assert_eq!(series.unit(), Some("%"));
        assert_eq!(series.numeric_values(), Some(&[12.5][..]));
        Ok(())
    }

    #[test]
    fn test_hourly_index_steps_one_hour() {
        let series = NamedSeries::hourly(midnight(1), vec![0.0; 25]);
        let index = series.datetime_index().unwrap();

        assert_eq!(index.len(), 25);
        assert_eq!(index[24], midnight(2));
    }

    #[test]
    fn test_regular_index_of_long_series() {
        let series = NamedSeries::regular(midnight(1), TimeDelta::minutes(1), vec![0.0; 600_000]);
        let index = series.datetime_index().unwrap();

        assert_eq!(index.len(), 600_000);
        assert_eq!(index[599_999] - index[0], TimeDelta::minutes(599_999));
        assert!(index.windows(2).all(|pair| pair[1] - pair[0] == TimeDelta::minutes(1)));
    }

    #[test]
    fn test_positional_series_has_no_datetime_index() {
        let series = NamedSeries::positional(vec![1.0, 2.0]);

        assert_eq!(series.datetime_index(), None);
        assert_eq!(series.index(), IndexColumn::Other("positional"));
        assert_eq!(series.label(3), "Series 3");
    }
}
