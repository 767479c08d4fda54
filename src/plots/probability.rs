//! Exceedance and cumulative probability curves.

use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::error::ChartError;
use crate::plots::stats;
use crate::series::{finite_values, PlotInput, TimeSeries};
use crate::style::DEFAULT_STYLE;
use bon::bon;
use serde_json::{json, Value};

/// Values sorted high to low, paired with exceedance probabilities `1 - i/n`.
pub(crate) struct ExceedanceCurve {
    pub probabilities: Vec<f64>,
    pub values: Vec<f64>,
}

impl ExceedanceCurve {
    pub(crate) fn new(values: &[f64]) -> Self {
        let values = stats::sorted_descending(&finite_values(values));
        let n = values.len() as f64;
        let probabilities = (0..values.len()).map(|i| 1.0 - i as f64 / n).collect();
        Self {
            probabilities,
            values,
        }
    }

    /// Point at `floor(n * (1 - percentile/100))`, clamped to the curve.
    fn percentile_point(&self, percentile: f64) -> Option<(f64, f64)> {
        let last = self.values.len().checked_sub(1)?;
        let index = (self.values.len() as f64 * (1.0 - percentile / 100.0)).floor();
        let index = (index.max(0.0) as usize).min(last);
        Some((self.probabilities[index], self.values[index]))
    }
}

fn check_percentile(caller: &str, percentile: Option<f64>) -> Result<(), ChartError> {
    match percentile {
        Some(p) if !(0.0..=100.0).contains(&p) => Err(ChartError::invalid(
            caller,
            format!("selected_percentile must be between 0 and 100, got {p}"),
        )),
        _ => Ok(()),
    }
}

fn percentile_marker(x: f64, y: f64, name: String) -> Value {
    json!({
        "type": "scatter",
        "x": [x],
        "y": [y],
        "mode": "markers",
        "marker": { "size": 8, "color": "red" },
        "name": name,
    })
}

fn exceedance_axis(x_title: &str) -> Value {
    json!({
        "title": { "text": x_title, "standoff": 5 },
        "autorange": "reversed",
        "tickformat": ".0%",
    })
}

#[bon]
impl ClimateVis {
    /// Exceedance curve of one series: values sorted high to low against the
    /// fraction of observations at or above them.
    ///
    /// The x axis runs from 100% on the left to 0% on the right. With
    /// `selected_percentile`, a red marker shows that percentile on the curve.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`ChartError::InvalidParameter`] for a percentile
    /// outside `0..=100`.
    #[builder]
    pub fn exceedance(
        &self,
        series: &dyn TimeSeries,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Exceedance Probability")] x_title: &str,
        #[builder(default = "")] y_title: &str,
        selected_percentile: Option<f64>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "exceedance";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(PlotInput::Single(series), style, paper_size, CALLER)?;
        check_percentile(CALLER, selected_percentile)?;

        let curve = ExceedanceCurve::new(series[0].numeric_values().unwrap_or_default());
        let mut figure = Figure::new();
        figure.add_trace(json!({
            "type": "scatter",
            "x": curve.probabilities,
            "y": curve.values,
            "mode": "lines",
        }));
        if let Some(percentile) = selected_percentile {
            if let Some((x, y)) = curve.percentile_point(percentile) {
                figure.add_trace(percentile_marker(x, y, format!("{percentile}th Percentile")));
            }
        }

        figure.update_layout(json!({
            "xaxis": exceedance_axis(x_title),
            "yaxis": { "title": { "text": y_title } },
            "showlegend": false,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// Exceedance curves of several series on one chart, with a legend.
    ///
    /// # Errors
    ///
    /// Same as [`ClimateVis::exceedance`].
    #[builder]
    pub fn exceedance_bands<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Exceedance Probability")] x_title: &str,
        #[builder(default = "")] y_title: &str,
        selected_percentile: Option<f64>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "exceedance_bands";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;
        check_percentile(CALLER, selected_percentile)?;

        let mut figure = Figure::new();
        for (position, s) in series.iter().enumerate() {
            let label = s.label(position);
            let curve = ExceedanceCurve::new(s.numeric_values().unwrap_or_default());
            let marker = selected_percentile
                .and_then(|p| curve.percentile_point(p).map(|point| (p, point)));

            figure.add_trace(json!({
                "type": "scatter",
                "x": curve.probabilities,
                "y": curve.values,
                "mode": "lines",
                "name": label,
            }));
            if let Some((percentile, (x, y))) = marker {
                figure.add_trace(percentile_marker(
                    x,
                    y,
                    format!("{percentile}th Percentile ({label})"),
                ));
            }
        }

        figure.update_layout(json!({
            "xaxis": exceedance_axis(x_title),
            "yaxis": { "title": { "text": y_title } },
            "showlegend": true,
            "legend": {
                "x": 0.99,
                "y": 0.99,
                "xanchor": "right",
                "yanchor": "top",
                "bgcolor": "rgba(255, 255, 255, 0.8)",
                "bordercolor": "black",
                "borderwidth": 1,
            },
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// Cumulative probability (empirical CDF) curves: values sorted low to high
    /// against `i / (n - 1)`.
    ///
    /// # Arguments
    ///
    /// * `y_grid_spacing` - Spacing of the y grid lines in percent, `1..=100`. Defaults to 10.
    /// * `selected_percentile` - Marks this percentile on every curve, with an annotation.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`ChartError::InvalidParameter`] for a grid spacing
    /// or percentile out of range.
    #[builder]
    pub fn cumulative_probability<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Value")] x_title: &str,
        #[builder(default = "Cumulative Probability")] y_title: &str,
        selected_percentile: Option<f64>,
        #[builder(default = 10)] y_grid_spacing: u32,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "cumulative_probability";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;
        if !(1..=100).contains(&y_grid_spacing) {
            return Err(ChartError::invalid(
                CALLER,
                "y_grid_spacing must be an integer between 1 and 100",
            )
            .into());
        }
        check_percentile(CALLER, selected_percentile)?;

        let mut figure = Figure::new();
        for (position, s) in series.iter().enumerate() {
            let label = s.label(position);
            let values = stats::sorted_ascending(&finite_values(s.numeric_values().unwrap_or_default()));
            let steps = values.len().saturating_sub(1).max(1) as f64;
            let probabilities: Vec<f64> = (0..values.len()).map(|i| i as f64 / steps).collect();

            figure.add_trace(json!({
                "type": "scatter",
                "x": values,
                "y": probabilities,
                "mode": "lines",
                "name": label,
            }));

            let Some(percentile) = selected_percentile else {
                continue;
            };
            let Some(last) = values.len().checked_sub(1) else {
                continue;
            };
            let index = ((values.len() as f64 * percentile / 100.0).floor() as usize).min(last);
            let (x, y) = (values[index], probabilities[index]);
            figure.add_trace(percentile_marker(
                x,
                y,
                format!("{percentile}th Percentile ({label})"),
            ));
            figure.add_annotation(json!({
                "x": 0.1,
                "y": 0.9 - position as f64 * 0.05,
                "xref": "paper",
                "yref": "paper",
                "text": format!("<b>{percentile}th Percentile ({label})</b><br>Value: {x:.2}"),
                "showarrow": false,
                "bgcolor": "white",
                "bordercolor": "black",
                "font": { "size": 12 },
            }));
        }

        let tick_values: Vec<f64> = (0..=100u32)
            .step_by(y_grid_spacing as usize)
            .map(|percent| f64::from(percent) / 100.0)
            .collect();
        figure.update_layout(json!({
            "xaxis": { "title": { "text": x_title } },
            "yaxis": {
                "title": { "text": y_title, "standoff": 5 },
                "tickformat": ".0%",
                "tickmode": "array",
                "tickvals": tick_values,
            },
            "showlegend": true,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }
}
