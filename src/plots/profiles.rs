//! Annual and monthly profiles: statistics per calendar bucket.

use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::aggregate::{grouped_stats, GroupStats, TimeKey};
use crate::plots::error::ChartError;
use crate::plots::colors::Rgb;
use crate::plots::{month_annotation, month_label_days, stats, Statistic, MONTH_LABELS};
use crate::series::{finite_values, PlotInput, TimeSeries};
use crate::style::DEFAULT_STYLE;
use bon::bon;
use serde_json::{json, Value};

fn series_min(series: &dyn TimeSeries) -> f64 {
    stats::extent(&finite_values(series.numeric_values().unwrap_or_default()))
        .map_or(0.0, |(min, _)| min)
}

fn line_style(statistic: Statistic) -> Value {
    match statistic {
        Statistic::Min => json!({ "color": "blue" }),
        Statistic::Mean => json!({ "color": "grey", "width": 1 }),
        Statistic::Max => json!({ "color": "red" }),
    }
}

fn capitalized(statistic: Statistic) -> &'static str {
    match statistic {
        Statistic::Min => "Min",
        Statistic::Mean => "Mean",
        Statistic::Max => "Max",
    }
}

const BAND_MIN: Rgb = Rgb(0, 123, 255);
const BAND_MEAN: Rgb = Rgb(0, 0, 0);
const BAND_MAX: Rgb = Rgb(255, 0, 0);
const BAND_ALPHA: f64 = 0.2;

/// Splits hourly groups into runs of consecutive hours.
///
/// A jump of more than one hour between neighbours starts a new run, so lines
/// and bands are not drawn across missing hours.
fn split_at_gaps<'g>(groups: &[&'g GroupStats]) -> Vec<Vec<&'g GroupStats>> {
    let mut segments: Vec<Vec<&GroupStats>> = Vec::new();
    for group in groups {
        let starts_new = segments
            .last()
            .and_then(|segment| segment.last())
            .map_or(true, |last| group.key[1] - last.key[1] > 1);
        if starts_new {
            segments.push(Vec::new());
        }
        if let Some(segment) = segments.last_mut() {
            segment.push(*group);
        }
    }
    segments
}

/// Closed outline of the min-max range: along the minimum, back along the maximum.
fn band_outline(segment: &[&GroupStats], offset: i32) -> (Vec<i32>, Vec<f64>) {
    let forward = segment.iter().map(|group| (group.key[1] + offset, group.min));
    let back = segment.iter().rev().map(|group| (group.key[1] + offset, group.max));
    forward.chain(back).unzip()
}

fn add_month_labels(figure: &mut Figure, y: f64) {
    for (label, day) in month_label_days() {
        figure.add_annotation(month_annotation(label, f64::from(day), y));
    }
}

#[bon]
impl ClimateVis {
    /// Min, mean and max of a series for every day of the year.
    ///
    /// Month names are placed on the 15th of each month, along the series minimum.
    ///
    /// # Arguments
    ///
    /// * `series` - Usually one or more years of hourly data.
    /// * `show` - Statistics to draw. Defaults to all three.
    /// * `x_title` - Defaults to `"Day of Year"`.
    /// * `y_title` - Defaults to `"Value"`; also used in the trace names.
    #[builder]
    pub fn annual_profile_daily(
        &self,
        series: &dyn TimeSeries,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Day of Year")] x_title: &str,
        #[builder(default = "Value")] y_title: &str,
        show: Option<Vec<Statistic>>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "annual_profile_daily";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(PlotInput::Single(series), style, paper_size, CALLER)?;
        let show = show.unwrap_or_else(|| Statistic::ALL.to_vec());

        let daily = grouped_stats(series[0], &[TimeKey::DayOfYear]).map_err(ChartError::from)?;
        let days: Vec<i32> = daily.iter().map(|group| group.key[0]).collect();

        let mut figure = Figure::new();
        for statistic in Statistic::ALL.into_iter().filter(|s| show.contains(s)) {
            figure.add_trace(json!({
                "type": "scatter",
                "x": days,
                "y": daily.iter().map(|group| statistic.pick(group)).collect::<Vec<_>>(),
                "mode": "lines",
                "name": format!("{} {y_title}", capitalized(statistic)),
                "line": line_style(statistic),
            }));
        }
        add_month_labels(&mut figure, series_min(series[0]));

        figure.update_layout(json!({
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": y_title } },
            "showlegend": false,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// One statistic per day of year for several series, one line each.
    ///
    /// # Arguments
    ///
    /// * `statistic` - The statistic to draw. Defaults to [`Statistic::Max`].
    #[builder]
    pub fn annual_profile_multiple<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Day of Year")] x_title: &str,
        #[builder(default = "Value")] y_title: &str,
        statistic: Option<Statistic>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "annual_profile_multiple";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;
        let statistic = statistic.unwrap_or(Statistic::Max);

        let mut figure = Figure::new();
        let mut overall_min = f64::INFINITY;
        for (position, s) in series.iter().enumerate() {
            let daily = grouped_stats(*s, &[TimeKey::DayOfYear]).map_err(ChartError::from)?;
            overall_min = overall_min.min(series_min(*s));
            figure.add_trace(json!({
                "type": "scatter",
                "x": daily.iter().map(|group| group.key[0]).collect::<Vec<_>>(),
                "y": daily.iter().map(|group| statistic.pick(group)).collect::<Vec<_>>(),
                "mode": "lines",
                "name": format!("{} ({statistic})", s.label(position)),
            }));
        }
        add_month_labels(&mut figure, overall_min);

        figure.update_layout(json!({
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": y_title } },
            "showlegend": true,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// A 24-hour profile per month: min, mean and max for every (month, hour),
    /// with the months laid out side by side.
    ///
    /// Month `m` occupies x positions `(m - 1) * 24 ..= (m - 1) * 24 + 23`.
    #[builder]
    pub fn monthly_profiles(
        &self,
        series: &dyn TimeSeries,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Hour of Day")] x_title: &str,
        #[builder(default = "Value")] y_title: &str,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "monthly_profiles";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(PlotInput::Single(series), style, paper_size, CALLER)?;

        let hourly = grouped_stats(series[0], &[TimeKey::Month, TimeKey::Hour]).map_err(ChartError::from)?;

        let mut figure = Figure::new();
        for (offset, label) in MONTH_LABELS.into_iter().enumerate() {
            let month = offset as i32 + 1;
            let groups: Vec<&GroupStats> = hourly.iter().filter(|group| group.key[0] == month).collect();
            let x: Vec<i32> = groups
                .iter()
                .map(|group| group.key[1] + offset as i32 * 24)
                .collect();

            for (statistic, line) in [
                (Statistic::Min, json!({ "color": "blue" })),
                (Statistic::Mean, json!({ "color": "black", "dash": "dot" })),
                (Statistic::Max, json!({ "color": "red" })),
            ] {
                figure.add_trace(json!({
                    "type": "scatter",
                    "x": x,
                    "y": groups.iter().map(|group| statistic.pick(group)).collect::<Vec<_>>(),
                    "mode": "lines",
                    "name": format!("{label} {}", capitalized(statistic)),
                    "line": line,
                    "showlegend": offset == 0,
                }));
            }
        }

        let y = series_min(series[0]);
        for (offset, label) in MONTH_LABELS.into_iter().enumerate() {
            figure.add_annotation(month_annotation(label, (offset * 24 + 12) as f64, y));
        }

        figure.update_layout(json!({
            "xaxis": {
                "title": { "text": x_title },
                "tickmode": "array",
                "tickvals": (0..12).map(|month| month * 24).collect::<Vec<i32>>(),
                "showticklabels": false,
            },
            "yaxis": { "title": { "text": y_title } },
            "showlegend": false,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }

    /// Monthly 24-hour profiles of several series, with the min-max range shaded.
    ///
    /// Every series gets, per month, a filled band between its hourly minimum
    /// and maximum plus dashed min, dotted mean and solid max lines. Hours with
    /// no data break the lines and bands instead of being bridged.
    ///
    /// # Arguments
    ///
    /// * `colors` - One color per series, used for its band and all three
    ///   lines. Series without one get blue minimum, black mean and red maximum.
    #[builder]
    pub fn monthly_profiles_bands<'a>(
        &self,
        #[builder(into)] series: PlotInput<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
        #[builder(default = "Hour of Day")] x_title: &str,
        #[builder(default = "Value")] y_title: &str,
        colors: Option<Vec<Rgb>>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "monthly_profiles_bands";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(series, style, paper_size, CALLER)?;
        let colors = colors.unwrap_or_default();

        let mut figure = Figure::new();
        let mut overall_min = f64::INFINITY;
        for (position, s) in series.iter().enumerate() {
            let label = s.name().unwrap_or("Unnamed Series");
            let (min_color, mean_color, max_color) = match colors.get(position) {
                Some(color) => (*color, *color, *color),
                None => (BAND_MIN, BAND_MEAN, BAND_MAX),
            };
            let hourly = grouped_stats(*s, &[TimeKey::Month, TimeKey::Hour]).map_err(ChartError::from)?;
            overall_min = overall_min.min(series_min(*s));

            for (offset, month_label) in MONTH_LABELS.into_iter().enumerate() {
                let month = offset as i32 + 1;
                let x_offset = offset as i32 * 24;
                let groups: Vec<&GroupStats> = hourly.iter().filter(|group| group.key[0] == month).collect();
                let segments = split_at_gaps(&groups);

                for segment in &segments {
                    let (x, y) = band_outline(segment, x_offset);
                    figure.add_trace(json!({
                        "type": "scatter",
                        "x": x,
                        "y": y,
                        "fill": "toself",
                        "mode": "lines",
                        "fillcolor": min_color.rgba(BAND_ALPHA),
                        "line": { "color": "rgba(255,255,255,0)" },
                        "name": format!("{month_label} Range ({label})"),
                        "showlegend": offset == 0,
                    }));
                }

                for (statistic, color, dash) in [
                    (Statistic::Min, min_color, "dash"),
                    (Statistic::Mean, mean_color, "dot"),
                    (Statistic::Max, max_color, "solid"),
                ] {
                    for segment in &segments {
                        figure.add_trace(json!({
                            "type": "scatter",
                            "x": segment.iter().map(|group| group.key[1] + x_offset).collect::<Vec<_>>(),
                            "y": segment.iter().map(|group| statistic.pick(group)).collect::<Vec<_>>(),
                            "mode": "lines",
                            "name": format!("{month_label} {} ({label})", capitalized(statistic)),
                            "line": { "color": color.rgba(1.0), "dash": dash },
                            "showlegend": offset == 0,
                        }));
                    }
                }
            }
        }

        if overall_min.is_finite() {
            for (offset, label) in MONTH_LABELS.into_iter().enumerate() {
                figure.add_annotation(month_annotation(label, (offset * 24 + 12) as f64, overall_min));
            }
        }

        figure.update_layout(json!({
            "xaxis": {
                "title": { "text": x_title },
                "tickmode": "array",
                "tickvals": (0..12).map(|month| month * 24).collect::<Vec<i32>>(),
                "showticklabels": false,
            },
            "yaxis": { "title": { "text": y_title } },
            "showlegend": false,
            "legend": { "yanchor": "top", "y": 0.99, "xanchor": "right", "x": 0.99 },
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }
}
