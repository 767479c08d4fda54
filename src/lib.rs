mod chart;
mod climatevis;
mod error;
mod plots;
mod series;
mod style;
mod validation;

pub use climatevis::ClimateVis;
pub use error::ClimateVisError;

pub use chart::{Chart, Figure};

pub use series::{
    frame_columns, parse_series_document, read_series_document, FrameColumn, IndexColumn,
    NamedSeries, PlotInput, SeriesError, SeriesIndex, TimeSeries, ValueColumn,
};

pub use style::{
    resolve_paper_size, Dimensions, PaperSize, StyleDefinition, StyleError, StyleLoadFailure,
    StyleRegistry, BUILTIN_STYLE_NAMES, DEFAULT_STYLE,
};

pub use validation::{
    summarize, SeriesSummary, TimeRange, ValidatedInput, ValidationError, ValidationSummary,
    ValidationWarning, Validator,
};

pub use plots::{
    add_exceedance_bands, add_value_range_bands, exceedance_summary, value_range_summary,
    ChartError, ColorScale, ExceedanceBand, ExceedanceBandSummary, PlotMode, Rgb, Sector,
    SectorSeries, Statistic, ValueBand, ValueBandSummary, WindDirection,
};
