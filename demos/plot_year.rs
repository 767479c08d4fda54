//! Builds a synthetic year of hourly temperatures and prints a few figure documents.

use chrono::NaiveDate;
use climatevis::{exceedance_summary, ClimateVis, ExceedanceBand, NamedSeries, Statistic, TimeSeries};
use std::f64::consts::TAU;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let temperature: Vec<f64> = (0..8760u32)
        .map(|h| {
            let season = -8.0 * (f64::from(h / 24) / 365.0 * TAU).cos();
            let daily = 4.0 * (f64::from(h % 24) / 24.0 * TAU - TAU / 4.0).sin();
            10.0 + season + daily
        })
        .collect();
    let temperature = NamedSeries::hourly(start, temperature)
        .with_name("Dry bulb temperature")
        .with_unit("°C");

    let vis = ClimateVis::new();
    for style in vis.registry().available_styles() {
        println!("registered style: {style}");
    }

    let validated = vis
        .validator()
        .validate()
        .input(&temperature)
        .style("base")
        .paper_size("A4_LANDSCAPE")
        .call()?;
    for warning in validated.warnings() {
        println!("warning: {warning}");
    }

    let profile = vis
        .annual_profile_daily()
        .series(&temperature)
        .y_title("Temperature")
        .show(vec![Statistic::Min, Statistic::Max])
        .paper_size("A4_LANDSCAPE")
        .call()?;
    println!("{}", profile.to_json()?);

    let summary = exceedance_summary(
        temperature.numeric_values().unwrap_or_default(),
        &[ExceedanceBand::new(0.0, 0.1), ExceedanceBand::new(0.9, 1.0)],
    )?;
    for band in summary {
        println!("{band:?}");
    }

    let heatmap = vis
        .annual_heatmap()
        .series(&temperature)
        .paper_size("A4_LANDSCAPE")
        .call()?;
    println!("heatmap height: {:?}", heatmap.height());

    Ok(())
}
