//! The entry point that owns the style registry and builds charts.

use crate::chart::Figure;
use crate::series::{PlotInput, TimeSeries};
use crate::style::{StyleError, StyleRegistry};
use crate::validation::{ValidationError, Validator};

/// Builds styled weather and climate charts.
///
/// A `ClimateVis` owns one [`StyleRegistry`], loaded with the bundled styles on
/// construction. Every chart builder validates its input against that
/// registry, builds a [`Figure`] and applies the requested style and paper size.
///
/// The chart builders are the `#[builder]` methods: [`ClimateVis::time_series`],
/// [`ClimateVis::frame_time_series`], [`ClimateVis::histogram`],
/// [`ClimateVis::exceedance`], [`ClimateVis::exceedance_bands`],
/// [`ClimateVis::cumulative_probability`], [`ClimateVis::annual_profile_daily`],
/// [`ClimateVis::annual_profile_multiple`], [`ClimateVis::monthly_profiles`],
/// [`ClimateVis::monthly_profiles_bands`], [`ClimateVis::annual_heatmap`] and
/// [`ClimateVis::wind_rose`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use climatevis::{ClimateVis, NamedSeries};
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let temperature = NamedSeries::hourly(start, (0..48).map(|h| (h % 24) as f64).collect())
///     .with_name("Dry bulb temperature")
///     .with_unit("°C");
///
/// let vis = ClimateVis::new();
/// let figure = vis
///     .exceedance()
///     .series(&temperature)
///     .paper_size("A5_LANDSCAPE")
///     .selected_percentile(90.0)
///     .call()?;
///
/// assert_eq!(figure.width(), Some(794));
/// # Ok::<(), climatevis::ClimateVisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClimateVis {
    registry: StyleRegistry,
}

impl ClimateVis {
    /// Creates an instance with the bundled styles registered.
    pub fn new() -> Self {
        Self::with_registry(StyleRegistry::with_builtin_styles())
    }

    /// Creates an instance around an existing registry.
    pub fn with_registry(registry: StyleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Mutable access, e.g. to register additional styles.
    pub fn registry_mut(&mut self) -> &mut StyleRegistry {
        &mut self.registry
    }

    /// A validator bound to this instance's registry.
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.registry)
    }

    pub(crate) fn validated<'a>(
        &self,
        input: PlotInput<'a>,
        style: &str,
        paper_size: Option<&str>,
        caller: &str,
    ) -> Result<Vec<&'a dyn TimeSeries>, ValidationError> {
        self.validator()
            .validate()
            .input(input)
            .style(style)
            .maybe_paper_size(paper_size)
            .caller(caller)
            .call()
            .map(|validated| validated.into_series())
    }

    pub(crate) fn finish(
        &self,
        mut figure: Figure,
        style: &str,
        paper_size: Option<&str>,
    ) -> Result<Figure, StyleError> {
        self.registry.apply(&mut figure, style, paper_size)?;
        Ok(figure)
    }
}

impl Default for ClimateVis {
    fn default() -> Self {
        Self::new()
    }
}
