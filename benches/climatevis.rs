use chrono::NaiveDate;
use climatevis::{ClimateVis, NamedSeries};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn hourly_year() -> NamedSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let values = (0..8760u32)
        .map(|h| {
            let hour = f64::from(h % 24);
            let day = f64::from(h / 24);
            10.0 - 8.0 * (day / 365.0 * std::f64::consts::TAU).cos() + 4.0 * (hour / 24.0 * std::f64::consts::TAU).sin()
        })
        .collect();
    NamedSeries::hourly(start, values)
        .with_name("Dry bulb temperature")
        .with_unit("°C")
}

fn bench_charts(c: &mut Criterion) {
    let vis = ClimateVis::new();
    let year = hourly_year();

    c.bench_function("validate_year", |b| {
        b.iter(|| {
            vis.validator()
                .validate()
                .input(black_box(&year))
                .style("base")
                .paper_size("A4_LANDSCAPE")
                .call()
        })
    });
    c.bench_function("annual_heatmap_year", |b| {
        b.iter(|| vis.annual_heatmap().series(black_box(&year)).call())
    });
    c.bench_function("exceedance_year", |b| {
        b.iter(|| vis.exceedance().series(black_box(&year)).call())
    });
}

criterion_group!(benches, bench_charts);
criterion_main!(benches);
