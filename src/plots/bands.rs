//! Band statistics and shaded band overlays for exceedance-style charts.

use crate::chart::Figure;
use crate::plots::colors::ColorScale;
use crate::plots::error::ChartError;
use crate::plots::stats;
use crate::series::finite_values;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// A range of exceedance probabilities, as fractions in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExceedanceBand {
    pub from: f64,
    pub to: f64,
}

impl ExceedanceBand {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Inclusive index range into values sorted high to low.
    fn index_range(&self, len: usize) -> Option<(usize, usize)> {
        let last = len.checked_sub(1)?;
        let index = |fraction: f64| {
            let i = ((1.0 - fraction) * len as f64).floor().max(0.0) as usize;
            i.min(last)
        };
        Some((index(self.to), index(self.from)))
    }
}

/// A range of values. `Above` and `Below` are open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueBand {
    /// `min <= v < max`
    Between(f64, f64),
    /// `v >= min`
    Above(f64),
    /// `v < max`
    Below(f64),
}

impl ValueBand {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            ValueBand::Between(min, max) => min <= value && value < max,
            ValueBand::Above(min) => value >= min,
            ValueBand::Below(max) => value < max,
        }
    }
}

impl fmt::Display for ValueBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueBand::Between(min, max) => write!(f, "{min} - {max}"),
            ValueBand::Above(min) => write!(f, "> {min}"),
            ValueBand::Below(max) => write!(f, "< {max}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceedanceBandSummary {
    pub from_percent: f64,
    pub to_percent: f64,
    pub count: usize,
    /// Share of all values that fall in the band, in percent.
    pub percentage: f64,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueBandSummary {
    pub band: String,
    pub count: usize,
    pub percentage: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

fn non_empty<T>(caller: &str, bands: &[T]) -> Result<(), ChartError> {
    if bands.is_empty() {
        return Err(ChartError::EmptyBands {
            caller: caller.to_string(),
        });
    }
    Ok(())
}

/// Count, share and min/mean/max of the values inside each exceedance band.
///
/// Non-finite values are ignored.
///
/// # Errors
///
/// [`ChartError::EmptyBands`] if `bands` is empty.
pub fn exceedance_summary(
    data: &[f64],
    bands: &[ExceedanceBand],
) -> Result<Vec<ExceedanceBandSummary>, ChartError> {
    non_empty("exceedance_summary", bands)?;
    let sorted = stats::sorted_descending(&finite_values(data));

    Ok(bands
        .iter()
        .map(|band| {
            let in_band = match band.index_range(sorted.len()) {
                Some((start, end)) if start <= end => &sorted[start..=end],
                _ => &[][..],
            };
            let extent = stats::extent(in_band);
            ExceedanceBandSummary {
                from_percent: band.from * 100.0,
                to_percent: band.to * 100.0,
                count: in_band.len(),
                percentage: share(in_band.len(), sorted.len()),
                min: extent.map(|(min, _)| min),
                mean: stats::mean(in_band),
                max: extent.map(|(_, max)| max),
            }
        })
        .collect())
}

/// Count, share and min/max/mean of the values inside each value band.
///
/// Non-finite values are ignored.
///
/// # Errors
///
/// [`ChartError::EmptyBands`] if `bands` is empty.
pub fn value_range_summary(
    data: &[f64],
    bands: &[ValueBand],
) -> Result<Vec<ValueBandSummary>, ChartError> {
    non_empty("value_range_summary", bands)?;
    let data = finite_values(data);

    Ok(bands
        .iter()
        .map(|band| {
            let in_band: Vec<f64> = data.iter().copied().filter(|v| band.contains(*v)).collect();
            let extent = stats::extent(&in_band);
            ValueBandSummary {
                band: band.to_string(),
                count: in_band.len(),
                percentage: share(in_band.len(), data.len()),
                min: extent.map(|(min, _)| min),
                max: extent.map(|(_, max)| max),
                mean: stats::mean(&in_band),
            }
        })
        .collect())
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Shades each exceedance band across the x extent of the figure's first trace.
///
/// Band colors are spread evenly across `color_scale` at 20% opacity, and each
/// band is labelled with its percentage range.
///
/// # Errors
///
/// [`ChartError::EmptyBands`] if `bands` is empty.
pub fn add_exceedance_bands(
    figure: &mut Figure,
    data: &[f64],
    bands: &[ExceedanceBand],
    color_scale: ColorScale,
) -> Result<(), ChartError> {
    non_empty("add_exceedance_bands", bands)?;
    let sorted = stats::sorted_descending(&finite_values(data));
    let (x0, x1) = first_trace_x_range(figure);
    let colors = color_scale.sample(bands.len());

    for (band, color) in bands.iter().zip(colors) {
        let Some((to_index, from_index)) = band.index_range(sorted.len()) else {
            continue;
        };
        let (y0, y1) = (sorted[to_index], sorted[from_index]);
        figure.add_shape(band_rect(x0, x1, y0, y1, &color.rgba(0.2)));
        figure.add_annotation(band_label(
            (x0 + x1) / 2.0,
            (y0 + y1) / 2.0,
            format!("{:.1}% - {:.1}%", band.from * 100.0, band.to * 100.0),
        ));
    }
    Ok(())
}

/// Shades each value band that contains data. Open-ended bands extend to the
/// data minimum or maximum.
///
/// # Errors
///
/// [`ChartError::EmptyBands`] if `bands` is empty.
pub fn add_value_range_bands(
    figure: &mut Figure,
    data: &[f64],
    bands: &[ValueBand],
    color_scale: ColorScale,
) -> Result<(), ChartError> {
    non_empty("add_value_range_bands", bands)?;
    let data = finite_values(data);
    let Some((data_min, data_max)) = stats::extent(&data) else {
        return Ok(());
    };
    let (x0, x1) = first_trace_x_range(figure);
    let colors = color_scale.sample(bands.len());

    for (band, color) in bands.iter().zip(colors) {
        if !data.iter().any(|v| band.contains(*v)) {
            continue;
        }
        let (y0, y1) = match *band {
            ValueBand::Between(min, max) => (min, max),
            ValueBand::Above(min) => (min, data_max),
            ValueBand::Below(max) => (data_min, max),
        };
        let text = match band {
            ValueBand::Between(..) => format!("{y0} to {y1}"),
            open => open.to_string(),
        };
        figure.add_shape(band_rect(x0, x1, y0, y1, &color.rgba(0.2)));
        figure.add_annotation(band_label((x0 + x1) / 2.0, (y0 + y1) / 2.0, text));
    }
    Ok(())
}

/// Numeric x extent of the first trace, `(0, 1)` when there is none.
fn first_trace_x_range(figure: &Figure) -> (f64, f64) {
    let xs: Vec<f64> = figure
        .traces()
        .first()
        .and_then(|trace| trace.get("x"))
        .and_then(Value::as_array)
        .map(|xs| xs.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    stats::extent(&xs).unwrap_or((0.0, 1.0))
}

fn band_rect(x0: f64, x1: f64, y0: f64, y1: f64, fill: &str) -> Value {
    json!({
        "type": "rect",
        "x0": x0,
        "x1": x1,
        "y0": y0,
        "y1": y1,
        "fillcolor": fill,
        "line": { "width": 0 },
        "layer": "below",
    })
}

fn band_label(x: f64, y: f64, text: String) -> Value {
    json!({ "x": x, "y": y, "text": text, "showarrow": false })
}
