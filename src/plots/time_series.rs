use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::error::ChartError;
use crate::series::{frame_columns, PlotInput, TimeSeries};
use crate::style::DEFAULT_STYLE;
use bon::bon;
use chrono::{NaiveDateTime, TimeDelta};
use polars::prelude::DataFrame;
use serde_json::{json, Value};

/// How each series of a time series chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotMode {
    #[default]
    Line,
    /// Line filled down to zero.
    Area,
    Bar,
    Markers,
}

const TRACE_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[bon]
impl ClimateVis {
    /// Plots one or more series against time.
    ///
    /// Series are grouped by unit: the first unit goes on the left y axis, a
    /// second one on a right-hand axis. All series must share the same index.
    ///
    /// # Arguments
    ///
    /// * `series` - A series or a list of series with identical datetime indexes.
    /// * `style` - Registered style name. Defaults to `"base"`.
    /// * `paper_size` - Optional paper size name, e.g. `"A4_LANDSCAPE"`.
    /// * `y_title` - Y axis title; the unit is appended in parentheses.
    /// * `mode` - Drawing mode. Defaults to [`PlotMode::Line`].
    /// * `show_days` - Adds a vertical grid line per day.
    ///
    /// # Errors
    ///
    /// Validation errors, [`ChartError::IndexMismatch`] if the indexes differ,
    /// [`ChartError::TooManyUnits`] for more than two distinct units.
    #[builder]
    pub fn time_series<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        y_title: Option<&str>,
        mode: Option<PlotMode>,
        #[builder(default)] show_days: bool,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "time_series";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;

        let figure = time_series_figure(
            &series,
            y_title.unwrap_or_default(),
            mode.unwrap_or_default(),
            show_days,
            CALLER,
        )?;
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// Plots every column of `frame` except the index column as its own series.
    ///
    /// Each series is named after its column. Accepts the same options as
    /// [`ClimateVis::time_series`].
    ///
    /// # Errors
    ///
    /// [`crate::SeriesError`] if `index_column` is missing, plus the errors of
    /// [`ClimateVis::time_series`].
    #[builder]
    pub fn frame_time_series(
        &self,
        frame: &DataFrame,
        #[builder(default = "datetime")] index_column: &str,
        style: Option<&str>,
        paper_size: Option<&str>,
        y_title: Option<&str>,
        mode: Option<PlotMode>,
        #[builder(default)] show_days: bool,
    ) -> Result<Figure, ClimateVisError> {
        let columns = frame_columns(frame, index_column)?;
        self.time_series()
            .series(&columns)
            .maybe_style(style)
            .maybe_paper_size(paper_size)
            .maybe_y_title(y_title)
            .maybe_mode(mode)
            .show_days(show_days)
            .call()
    }
}

fn time_series_figure(
    series: &[&dyn TimeSeries],
    y_title: &str,
    mode: PlotMode,
    show_days: bool,
    caller: &str,
) -> Result<Figure, ChartError> {
    let reference = series
        .first()
        .and_then(|s| s.datetime_index())
        .unwrap_or_default();
    if series.iter().any(|s| s.datetime_index() != Some(reference)) {
        return Err(ChartError::IndexMismatch {
            caller: caller.to_string(),
        });
    }

    let mut units: Vec<Option<&str>> = Vec::new();
    for s in series {
        if !units.contains(&s.unit()) {
            units.push(s.unit());
        }
    }
    if units.len() > 2 {
        return Err(ChartError::TooManyUnits {
            caller: caller.to_string(),
            found: units.len(),
        });
    }
    let secondary_unit = units.get(1).copied();

    let mut figure = Figure::new();
    for (position, s) in series.iter().enumerate() {
        let axis = match secondary_unit {
            Some(unit) if s.unit() == unit => "y2",
            _ => "y",
        };
        let mut trace = json!({
            "x": reference,
            "y": s.numeric_values().unwrap_or_default(),
            "name": s.label(position),
            "yaxis": axis,
            "marker": { "color": TRACE_COLORS[position % TRACE_COLORS.len()] },
        });
        extend(&mut trace, mode_attributes(mode));
        figure.add_trace(trace);
    }

    figure.update_layout(json!({
        "xaxis": { "title": { "text": "Time" } },
        "yaxis": {
            "title": { "text": axis_title(y_title, units.first().copied().flatten()) },
            "side": "left",
            "showgrid": true,
        },
    }));
    if mode == PlotMode::Bar {
        figure.update_layout(json!({ "barmode": "overlay" }));
    }
    if let Some(unit) = secondary_unit {
        figure.update_layout(json!({
            "yaxis2": {
                "title": { "text": axis_title(y_title, unit) },
                "overlaying": "y",
                "side": "right",
                "showgrid": false,
            }
        }));
    }
    if show_days {
        figure.update_layout(json!({
            "xaxis": {
                "tickmode": "array",
                "tickvals": day_ticks(reference),
                "tickformat": "%Y-%m-%d",
                "showgrid": true,
                "gridcolor": "lightgray",
            }
        }));
    }
    Ok(figure)
}

fn mode_attributes(mode: PlotMode) -> Value {
    match mode {
        PlotMode::Line => json!({ "type": "scatter", "mode": "lines" }),
        PlotMode::Area => json!({ "type": "scatter", "mode": "lines", "fill": "tozeroy" }),
        PlotMode::Bar => json!({ "type": "bar" }),
        PlotMode::Markers => json!({ "type": "scatter", "mode": "markers" }),
    }
}

fn extend(trace: &mut Value, attributes: Value) {
    if let (Value::Object(trace), Value::Object(attributes)) = (trace, attributes) {
        trace.extend(attributes);
    }
}

fn axis_title(title: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) if title.is_empty() => format!("({unit})"),
        Some(unit) => format!("{title} ({unit})"),
        None => title.to_string(),
    }
}

/// One tick per day from the first timestamp through the last.
fn day_ticks(index: &[NaiveDateTime]) -> Vec<NaiveDateTime> {
    let (Some(start), Some(end)) = (index.iter().min(), index.iter().max()) else {
        return Vec::new();
    };
    std::iter::successors(Some(*start), |tick| Some(*tick + TimeDelta::days(1)))
        .take_while(|tick| tick <= end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::NamedSeries;
    use chrono::NaiveDate;
    use polars::prelude::df;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hourly(name: &str, unit: &str) -> NamedSeries {
        NamedSeries::hourly(start(), (0..72u32).map(|h| f64::from(h % 24)).collect())
            .with_name(name)
            .with_unit(unit)
    }

    #[test]
    fn test_two_units_use_secondary_axis() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let temp = hourly("Temperature", "°C");
        let rh = hourly("Humidity", "%");

        let figure = vis
            .time_series()
            .series([&temp, &rh])
            .y_title("Value")
            .call()?;

        let document = figure.to_value();
        assert_eq!(document["data"][0]["yaxis"], "y");
        assert_eq!(document["data"][1]["yaxis"], "y2");
        assert_eq!(document["layout"]["yaxis"]["title"]["text"], "Value (°C)");
        assert_eq!(document["layout"]["yaxis2"]["title"]["text"], "Value (%)");
        assert_eq!(figure.style_name(), Some("base"));
        Ok(())
    }

    #[test]
    fn test_three_units_are_rejected() {
        let vis = ClimateVis::new();
        let series = [
            hourly("a", "°C"),
            hourly("b", "%"),
            hourly("c", "m/s"),
        ];

        let result = vis.time_series().series(&series[..]).call();

        assert!(matches!(
            result,
            Err(ClimateVisError::Chart(ChartError::TooManyUnits { found: 3, .. }))
        ));
    }

    #[test]
    fn test_bar_mode_overlays() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let rain = hourly("Rain", "mm");

        let figure = vis.time_series().series(&rain).mode(PlotMode::Bar).call()?;

        assert_eq!(figure.traces()[0]["type"], "bar");
        assert_eq!(figure.layout()["barmode"], "overlay");
        Ok(())
    }

    #[test]
    fn test_area_mode_fills_to_zero() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let rain = hourly("Rain", "mm");

        let figure = vis.time_series().series(&rain).mode(PlotMode::Area).call()?;

        assert_eq!(figure.traces()[0]["fill"], "tozeroy");
        assert_eq!(figure.traces()[0]["mode"], "lines");
        Ok(())
    }

    #[test]
    fn test_show_days_adds_daily_ticks() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let temp = hourly("Temperature", "°C");

        let figure = vis.time_series().series(&temp).show_days(true).call()?;

        let ticks = figure.layout()["xaxis"]["tickvals"].as_array().map(Vec::len);
        assert_eq!(ticks, Some(3));
        assert_eq!(figure.layout()["xaxis"]["title"]["text"], "Time");
        Ok(())
    }

    #[test]
    fn test_shifted_index_is_a_mismatch() {
        let vis = ClimateVis::new();
        let temp = hourly("Temperature", "°C");
        let shifted = NamedSeries::hourly(start() + TimeDelta::hours(1), vec![1.0; 72])
            .with_name("Shifted")
            .with_unit("°C");

        let result = vis.time_series().series([&temp, &shifted]).call();

        assert!(matches!(
            result,
            Err(ClimateVisError::Chart(ChartError::IndexMismatch { .. }))
        ));
    }

    #[test]
    fn test_paper_size_is_applied() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let temp = hourly("Temperature", "°C");

        let figure = vis
            .time_series()
            .series(&temp)
            .style("test")
            .paper_size("A4_PORTRAIT")
            .call()?;

        assert_eq!(figure.style_name(), Some("test"));
        assert_eq!((figure.width(), figure.height()), (Some(794), Some(1123)));
        Ok(())
    }

    #[test]
    fn test_frame_columns_become_series() -> Result<(), Box<dyn std::error::Error>> {
        let vis = ClimateVis::new();
        let stamps: Vec<NaiveDateTime> = (0..3).map(|h| start() + TimeDelta::hours(h)).collect();
        let frame = df!(
            "datetime" => stamps,
            "temp" => [20.0, 21.0, 22.5],
            "dwpt" => [12.0, 12.5, 13.0],
        )?;

        let figure = vis.frame_time_series().frame(&frame).call()?;

        assert_eq!(figure.traces().len(), 2);
        assert_eq!(figure.traces()[1]["name"], "dwpt");
        Ok(())
    }
}
