//! Day-of-year by hour-of-day heatmap.

use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::aggregate::{grouped_stats, TimeKey};
use crate::plots::colors::ColorScale;
use crate::plots::error::ChartError;
use crate::plots::{month_label_days, MONTH_START_DAYS};
use crate::series::{PlotInput, TimeSeries};
use crate::style::DEFAULT_STYLE;
use bon::bon;
use log::debug;
use serde_json::json;
use std::collections::BTreeMap;

const DEFAULT_HEIGHT: f64 = 800.0;
const HOUR_TICKS: [u32; 5] = [1, 7, 13, 19, 24];

/// Hour rows `1..=24` by sorted day columns, holding the mean of each cell.
struct HourDayGrid {
    days: Vec<i32>,
    rows: Vec<Vec<Option<f64>>>,
}

impl HourDayGrid {
    fn from_series(series: &dyn TimeSeries) -> Result<Self, ChartError> {
        let cells = grouped_stats(series, &[TimeKey::DayOfYear, TimeKey::Hour])?;

        let mut columns: BTreeMap<i32, usize> = BTreeMap::new();
        for cell in &cells {
            columns.entry(cell.key[0]).or_default();
        }
        for (position, column) in columns.values_mut().enumerate() {
            *column = position;
        }

        let mut rows = vec![vec![None; columns.len()]; 24];
        for cell in &cells {
            let (day, hour) = (cell.key[0], cell.key[1]);
            if let (Some(column), Some(row)) = (columns.get(&day), rows.get_mut(hour as usize)) {
                row[*column] = Some(cell.mean);
            }
        }
        debug!("Heatmap grid has {} days with data", columns.len());

        Ok(Self {
            days: columns.into_keys().collect(),
            rows,
        })
    }
}

#[bon]
impl ClimateVis {
    /// Hourly values across the year: day of year on x, hour of day on y
    /// (1 at the bottom, labelled 0 to 23), the value as color.
    ///
    /// Several years of data average into one cell per (day, hour). The chart
    /// height is the paper height (800 px without one) times `scale_factor`.
    ///
    /// # Arguments
    ///
    /// * `color_scale` - Defaults to [`ColorScale::Viridis`].
    /// * `max_scale` - Fixed upper limit of the color scale when positive, so
    ///   several heatmaps can share one scale.
    /// * `scale_factor` - Height multiplier. Defaults to `0.6`.
    /// * `show_legend` - Shows the color bar, titled with the series name.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`ChartError::InvalidParameter`] for a
    /// non-positive `scale_factor`.
    #[builder]
    pub fn annual_heatmap(
        &self,
        series: &dyn TimeSeries,
        style: Option<&str>,
        paper_size: Option<&str>,
        color_scale: Option<ColorScale>,
        max_scale: Option<f64>,
        #[builder(default = 0.6)] scale_factor: f64,
        #[builder(default = true)] show_legend: bool,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "annual_heatmap";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(PlotInput::Single(series), style, paper_size, CALLER)?;
        if !(scale_factor.is_finite() && scale_factor > 0.0) {
            return Err(ChartError::invalid(
                CALLER,
                format!("scale_factor must be positive, got {scale_factor}"),
            )
            .into());
        }
        let color_scale = color_scale.unwrap_or_default();

        let grid = HourDayGrid::from_series(series[0])?;
        let mut figure = Figure::new();
        figure.add_trace(json!({
            "type": "heatmap",
            "x": grid.days,
            "y": (1..=24).collect::<Vec<u32>>(),
            "z": grid.rows,
            "coloraxis": "coloraxis",
        }));

        let mut coloraxis = json!({ "colorscale": color_scale.name() });
        if let Some(max) = max_scale.filter(|max| *max > 0.0) {
            coloraxis["cmax"] = json!(max);
        }
        if show_legend {
            coloraxis["colorbar"] = json!({ "title": { "text": series[0].name().unwrap_or("Value") } });
        } else {
            coloraxis["showscale"] = json!(false);
        }

        let (tick_labels, tick_days): (Vec<&str>, Vec<u32>) = month_label_days().unzip();
        for day in MONTH_START_DAYS.into_iter().chain([365]) {
            let x = f64::from(day) - 0.5;
            figure.add_shape(json!({
                "type": "line",
                "x0": x,
                "x1": x,
                "y0": 0.5,
                "y1": 24.5,
                "line": { "color": "gray", "width": 1 },
            }));
        }
        figure.update_layout(json!({
            "xaxis": {
                "tickmode": "array",
                "tickvals": tick_days,
                "ticktext": tick_labels,
                "showgrid": true,
                "gridcolor": "gray",
                "gridwidth": 0.8,
                "zeroline": false,
                "ticks": "",
            },
            "yaxis": {
                "title": { "text": "Hour of Day" },
                "tickmode": "array",
                "tickvals": HOUR_TICKS,
                "ticktext": HOUR_TICKS.map(|hour| (hour - 1).to_string()),
                "showgrid": true,
                "gridcolor": "lightgrey",
                "range": [1, 24],
            },
            "coloraxis": coloraxis,
        }));

        let mut figure = self.finish(figure, style, paper_size)?;
        let base_height = figure.height().map_or(DEFAULT_HEIGHT, f64::from);
        let height = (base_height * scale_factor).round() as u32;
        figure.update_layout(json!({ "height": height }));
        Ok(figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::NamedSeries;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn three_days() -> NamedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut values: Vec<f64> = (0..72u32).map(f64::from).collect();
        values[25] = f64::NAN;
        NamedSeries::hourly(start, values).with_name("Dry bulb")
    }

    #[test]
    fn test_grid_rows_are_hours() -> Result<(), ChartError> {
        let grid = HourDayGrid::from_series(&three_days())?;

        assert_eq!(grid.days, vec![1, 2, 3]);
        assert_eq!(grid.rows.len(), 24);
        assert_eq!(grid.rows[0], vec![Some(0.0), Some(24.0), Some(48.0)]);
        assert_eq!(grid.rows[1], vec![Some(1.0), None, Some(49.0)]);
        Ok(())
    }

    #[test]
    fn test_heatmap_scales_paper_height() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let series = three_days();

        let figure = vis
            .annual_heatmap()
            .series(&series)
            .paper_size("A5_LANDSCAPE")
            .scale_factor(0.5)
            .max_scale(40.0)
            .call()?;

        assert_eq!(figure.width(), Some(794));
        assert_eq!(figure.height(), Some(280));
        let coloraxis = &figure.layout()["coloraxis"];
        assert_eq!(coloraxis["colorscale"], "Viridis");
        assert_eq!(coloraxis["cmax"], 40.0);
        assert_eq!(coloraxis["colorbar"]["title"]["text"], "Dry bulb");
        assert_eq!(figure.traces()[0]["z"][1][1], Value::Null);
        assert_eq!(figure.layout()["shapes"].as_array().map(Vec::len), Some(13));
        Ok(())
    }

    #[test]
    fn test_heatmap_defaults_without_paper_size() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let series = three_days();

        let figure = vis
            .annual_heatmap()
            .series(&series)
            .color_scale(ColorScale::Hot)
            .max_scale(0.0)
            .show_legend(false)
            .call()?;

        assert_eq!(figure.height(), Some(480));
        let coloraxis = &figure.layout()["coloraxis"];
        assert_eq!(coloraxis["colorscale"], "Hot");
        assert_eq!(coloraxis["showscale"], false);
        assert!(coloraxis.get("cmax").is_none());
        assert_eq!(figure.layout()["yaxis"]["ticktext"][4], "23");
        Ok(())
    }

    #[test]
    fn test_heatmap_rejects_zero_scale_factor() {
        let vis = ClimateVis::new();
        let series = three_days();

        let result = vis.annual_heatmap().series(&series).scale_factor(0.0).call();

        assert!(matches!(
            result,
            Err(ClimateVisError::Chart(ChartError::InvalidParameter { .. }))
        ));
    }
}
