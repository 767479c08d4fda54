//! Calendar bucketing of a series with polars.

use crate::series::TimeSeries;
use polars::prelude::{
    col, Column, DataFrame, DataType, Expr, IntoLazy, NamedFrom, PolarsResult, Series,
    SortMultipleOptions,
};

/// A calendar component of the timestamp to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeKey {
    Month,
    Hour,
    DayOfYear,
}

impl TimeKey {
    fn column(self) -> &'static str {
        match self {
            TimeKey::Month => "month",
            TimeKey::Hour => "hour",
            TimeKey::DayOfYear => "day_of_year",
        }
    }

    fn expr(self) -> Expr {
        let datetime = col("datetime").dt();
        let component = match self {
            TimeKey::Month => datetime.month(),
            TimeKey::Hour => datetime.hour(),
            TimeKey::DayOfYear => datetime.ordinal_day(),
        };
        component.cast(DataType::Int32).alias(self.column())
    }
}

/// Min, mean and max of one bucket. Only finite values take part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupStats {
    /// One entry per [`TimeKey`], in the order they were requested.
    pub key: Vec<i32>,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Groups `series` by the calendar `keys` and aggregates each bucket.
///
/// Buckets are sorted by key. Buckets without any finite value are left out.
pub(crate) fn grouped_stats(series: &dyn TimeSeries, keys: &[TimeKey]) -> PolarsResult<Vec<GroupStats>> {
    let (Some(index), Some(values)) = (series.datetime_index(), series.numeric_values()) else {
        return Ok(Vec::new());
    };
    let values: Vec<Option<f64>> = values.iter().map(|v| v.is_finite().then_some(*v)).collect();
    let frame = DataFrame::new(vec![
        Column::from(Series::new("datetime".into(), index)),
        Column::from(Series::new("value".into(), values)),
    ])?;

    let stats = frame
        .lazy()
        .group_by(keys.iter().map(|k| k.expr()).collect::<Vec<_>>())
        .agg([
            col("value").min().alias("min"),
            col("value").mean().alias("mean"),
            col("value").max().alias("max"),
        ])
        .sort_by_exprs(
            keys.iter().map(|k| col(k.column())).collect::<Vec<_>>(),
            SortMultipleOptions::default(),
        )
        .collect()?;

    let key_columns = keys
        .iter()
        .map(|k| Ok(stats.column(k.column())?.i32()?.into_iter().collect::<Vec<_>>()))
        .collect::<PolarsResult<Vec<Vec<Option<i32>>>>>()?;
    let min: Vec<Option<f64>> = stats.column("min")?.f64()?.into_iter().collect();
    let mean: Vec<Option<f64>> = stats.column("mean")?.f64()?.into_iter().collect();
    let max: Vec<Option<f64>> = stats.column("max")?.f64()?.into_iter().collect();

    let groups = (0..stats.height())
        .filter_map(|row| {
            let key = key_columns
                .iter()
                .map(|column| column[row])
                .collect::<Option<Vec<i32>>>()?;
            Some(GroupStats {
                key,
                min: min[row]?,
                mean: mean[row]?,
                max: max[row]?,
            })
        })
        .collect();
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::NamedSeries;
    use chrono::NaiveDate;

    #[test]
    fn test_day_of_year_buckets() -> Result<(), Box<dyn std::error::Error>> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        // Two days of hourly data: day 1 is 0..24, day 2 is 24..48 with one NaN.
        let mut values: Vec<f64> = (0..48u32).map(f64::from).collect();
        values[30] = f64::NAN;
        let series = NamedSeries::hourly(start, values);

        let stats = grouped_stats(&series, &[TimeKey::DayOfYear])?;

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].key, vec![1]);
        assert_eq!((stats[0].min, stats[0].max), (0.0, 23.0));
        assert!((stats[0].mean - 11.5).abs() < 1e-9);
        assert_eq!(stats[1].key, vec![2]);
        assert_eq!((stats[1].min, stats[1].max), (24.0, 47.0));
        assert!((stats[1].mean - (24..48).filter(|v| *v != 30).sum::<i32>() as f64 / 23.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_month_hour_buckets_sorted() -> Result<(), Box<dyn std::error::Error>> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 31)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let series = NamedSeries::hourly(start, vec![1.0, 2.0, 3.0, 4.0]);

        let stats = grouped_stats(&series, &[TimeKey::Month, TimeKey::Hour])?;

        let keys: Vec<Vec<i32>> = stats.iter().map(|s| s.key.clone()).collect();
        assert_eq!(keys, vec![vec![1, 22], vec![1, 23], vec![2, 0], vec![2, 1]]);
        Ok(())
    }

    #[test]
    fn test_all_nan_bucket_is_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut values = vec![f64::NAN; 24];
        values.push(5.0);
        let series = NamedSeries::hourly(start, values);

        let stats = grouped_stats(&series, &[TimeKey::DayOfYear])?;

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].key, vec![61]);
        Ok(())
    }
}
