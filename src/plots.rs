//! Chart builders.
//!
//! Each chart type is a `#[builder]` method on [`crate::ClimateVis`]. All of
//! them validate first, aggregate, add traces to a [`crate::Figure`] and
//! finally stamp style and paper size through the registry.

pub(crate) mod aggregate;
pub(crate) mod bands;
pub(crate) mod colors;
pub(crate) mod distribution;
pub(crate) mod error;
pub(crate) mod heatmap;
pub(crate) mod probability;
pub(crate) mod profiles;
pub(crate) mod stats;
pub(crate) mod time_series;
pub(crate) mod wind_rose;

pub use bands::{
    add_exceedance_bands, add_value_range_bands, exceedance_summary, value_range_summary,
    ExceedanceBand, ExceedanceBandSummary, ValueBand, ValueBandSummary,
};
pub use colors::{ColorScale, Rgb};
pub use error::ChartError;
pub use time_series::PlotMode;
pub use wind_rose::{Sector, SectorSeries, WindDirection};

use std::fmt;
use std::str::FromStr;

pub(crate) const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Day of year of each month's first day in a non-leap year.
pub(crate) const MONTH_START_DAYS: [u32; 12] = [1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Day of year of each month's 15th, where month labels sit.
pub(crate) fn month_label_days() -> impl Iterator<Item = (&'static str, u32)> {
    MONTH_LABELS
        .into_iter()
        .zip(MONTH_START_DAYS.map(|day| day + 14))
}

/// Bold month label anchored just below `y`.
pub(crate) fn month_annotation(label: &str, x: f64, y: f64) -> serde_json::Value {
    serde_json::json!({
        "x": x,
        "y": y,
        "text": format!("<b>{label}</b>"),
        "showarrow": false,
        "xanchor": "center",
        "yanchor": "top",
        "font": { "size": 12 },
        "bgcolor": "white",
    })
}

/// Per-bucket statistic of a profile chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Min,
    Mean,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Min, Statistic::Mean, Statistic::Max];

    pub fn name(self) -> &'static str {
        match self {
            Statistic::Min => "min",
            Statistic::Mean => "mean",
            Statistic::Max => "max",
        }
    }

    pub(crate) fn pick(self, stats: &aggregate::GroupStats) -> f64 {
        match self {
            Statistic::Min => stats.min,
            Statistic::Mean => stats.mean,
            Statistic::Max => stats.max,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| format!("statistic must be one of min, mean, max, got '{s}'"))
    }
}
