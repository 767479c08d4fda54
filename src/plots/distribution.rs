use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::error::ChartError;
use crate::plots::stats;
use crate::series::{finite_values, PlotInput};
use crate::style::DEFAULT_STYLE;
use bon::bon;
use serde_json::json;

#[bon]
impl ClimateVis {
    /// Overlaid, probability-normalized histograms with a statistics box per series.
    ///
    /// Without `bins`, the bin count is `floor(max - min + 1)` of the first
    /// series, i.e. roughly one bin per unit. Each series gets an annotation
    /// with its mean, mode and sample standard deviation.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`ChartError::InvalidParameter`] if `bins` is zero.
    #[builder]
    pub fn histogram<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        bins: Option<usize>,
        #[builder(default = "Value")] x_title: &str,
        #[builder(default = "Count")] y_title: &str,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "histogram";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;
        if bins == Some(0) {
            return Err(ChartError::invalid(CALLER, "bins must be at least 1").into());
        }

        let mut figure = Figure::new();
        let mut bins = bins;
        for (position, s) in series.iter().enumerate() {
            let values = finite_values(s.numeric_values().unwrap_or_default());
            let label = s.label(position);
            let nbins = *bins.get_or_insert_with(|| default_bins(&values));

            figure.add_trace(json!({
                "type": "histogram",
                "x": values,
                "name": label,
                "nbinsx": nbins,
                "opacity": 0.75,
                "histnorm": "probability",
                "marker": { "line": { "width": 1 } },
            }));

            let describe = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
            figure.add_annotation(json!({
                "x": 0.95,
                "y": 0.95 - 0.1 * position as f64,
                "xref": "paper",
                "yref": "paper",
                "text": format!(
                    "<b>{label} Statistics</b><br>Mean: {}<br>Mode: {}<br>Std Dev: {}",
                    describe(stats::mean(&values)),
                    describe(stats::mode(&values)),
                    describe(stats::sample_std(&values)),
                ),
                "showarrow": false,
                "bgcolor": "white",
                "bordercolor": "black",
                "font": { "size": 12 },
            }));
        }

        figure.update_layout(json!({
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": y_title } },
            "barmode": "overlay",
            "legend": { "title": { "text": "Series" }, "orientation": "h", "x": 0.5, "xanchor": "center" },
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }
}

/// One bin per unit of range, at least one.
fn default_bins(values: &[f64]) -> usize {
    stats::extent(values)
        .map(|(min, max)| (max - min + 1.0).floor().max(1.0) as usize)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::NamedSeries;
    use chrono::NaiveDate;

    fn series(name: &str, values: Vec<f64>) -> NamedSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        NamedSeries::hourly(start, values).with_name(name).with_unit("°C")
    }

    #[test]
    fn test_default_bins_follow_first_series_range() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let narrow = series("narrow", vec![0.0, 2.5, 4.9, f64::NAN]);
        let wide = series("wide", vec![-10.0, 0.0, 30.0, 12.0]);

        let figure = vis.histogram().series([&narrow, &wide]).call()?;

        assert_eq!(figure.traces()[0]["nbinsx"], 5);
        assert_eq!(figure.traces()[1]["nbinsx"], 5);
        assert_eq!(figure.traces()[0]["histnorm"], "probability");
        assert_eq!(figure.traces()[0]["x"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[test]
    fn test_statistics_annotation() -> Result<(), ClimateVisError> {
        let vis = ClimateVis::new();
        let temp = series("Temp", vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        let figure = vis.histogram().series(&temp).bins(10).call()?;

        let text = figure.layout()["annotations"][0]["text"].as_str().unwrap_or_default();
        assert_eq!(
            text,
            "<b>Temp Statistics</b><br>Mean: 5.00<br>Mode: 4.00<br>Std Dev: 2.14"
        );
        assert_eq!(figure.traces()[0]["nbinsx"], 10);
        assert_eq!(figure.layout()["xaxis"]["title"]["text"], "Value");
        Ok(())
    }

    #[test]
    fn test_zero_bins_rejected() {
        let vis = ClimateVis::new();
        let temp = series("Temp", vec![1.0, 2.0]);

        let result = vis.histogram().series(&temp).bins(0).call();

        assert!(matches!(
            result,
            Err(ClimateVisError::Chart(ChartError::InvalidParameter { .. }))
        ));
    }
}
