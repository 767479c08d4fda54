//! Wind rose: frequency of wind speed classes per compass sector.

use crate::chart::Figure;
use crate::climatevis::ClimateVis;
use crate::error::ClimateVisError;
use crate::plots::error::ChartError;
use crate::series::{
    FrameColumn, IndexColumn, NamedSeries, PlotInput, SeriesError, TimeSeries, ValueColumn,
};
use crate::style::DEFAULT_STYLE;
use crate::validation::ValidationError;
use bon::bon;
use chrono::NaiveDateTime;
use log::debug;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Upper edges of the speed classes in m/s. Classes are right-open and start at 0.
const SPEED_EDGES: [f64; 6] = [0.0, 2.0, 5.0, 10.0, 15.0, 20.0];
const SPEED_COLORS: [&str; 5] = ["blue", "dodgerblue", "deepskyblue", "orange", "red"];

const SECTOR_WIDTH: f64 = 22.5;

/// One of the 16 compass points, each covering 22.5°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

impl Sector {
    /// Clockwise from north.
    pub const ALL: [Sector; 16] = [
        Sector::N,
        Sector::Nne,
        Sector::Ne,
        Sector::Ene,
        Sector::E,
        Sector::Ese,
        Sector::Se,
        Sector::Sse,
        Sector::S,
        Sector::Ssw,
        Sector::Sw,
        Sector::Wsw,
        Sector::W,
        Sector::Wnw,
        Sector::Nw,
        Sector::Nnw,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sector::N => "N",
            Sector::Nne => "NNE",
            Sector::Ne => "NE",
            Sector::Ene => "ENE",
            Sector::E => "E",
            Sector::Ese => "ESE",
            Sector::Se => "SE",
            Sector::Sse => "SSE",
            Sector::S => "S",
            Sector::Ssw => "SSW",
            Sector::Sw => "SW",
            Sector::Wsw => "WSW",
            Sector::W => "W",
            Sector::Wnw => "WNW",
            Sector::Nw => "NW",
            Sector::Nnw => "NNW",
        }
    }

    /// Center of the sector in degrees clockwise from north.
    pub fn degrees(self) -> f64 {
        self.position() as f64 * SECTOR_WIDTH
    }

    /// The sector whose center is nearest to `degrees`. `None` for non-finite input.
    pub fn from_degrees(degrees: f64) -> Option<Sector> {
        if !degrees.is_finite() {
            return None;
        }
        let position = (degrees.rem_euclid(360.0) / SECTOR_WIDTH).round() as usize % Self::ALL.len();
        Some(Self::ALL[position])
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sector {
    type Err = String;

    /// Parses a compass label such as `"NNE"`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| format!("unknown compass sector '{s}'"))
    }
}

/// Wind direction given as compass sectors, one per timestamp.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use climatevis::{Sector, SectorSeries};
///
/// let hour = |h| NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap();
/// let direction = SectorSeries::from_labels(vec![hour(0), hour(1)], &["NNE", "calm"])?;
///
/// assert_eq!(direction.sectors(), &[Some(Sector::Nne), None]);
/// # Ok::<(), climatevis::SeriesError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSeries {
    index: Vec<NaiveDateTime>,
    sectors: Vec<Option<Sector>>,
}

impl SectorSeries {
    /// Pairs timestamps with sectors. `None` marks a missing observation.
    ///
    /// # Errors
    ///
    /// [`SeriesError::LengthMismatch`] if the lengths differ.
    pub fn new(index: Vec<NaiveDateTime>, sectors: Vec<Option<Sector>>) -> Result<Self, SeriesError> {
        if index.len() != sectors.len() {
            return Err(SeriesError::LengthMismatch {
                values: sectors.len(),
                index: index.len(),
            });
        }
        Ok(Self { index, sectors })
    }

    /// Parses compass labels. Labels that are not a compass point become `None`.
    pub fn from_labels<S: AsRef<str>>(index: Vec<NaiveDateTime>, labels: &[S]) -> Result<Self, SeriesError> {
        let sectors: Vec<Option<Sector>> = labels
            .iter()
            .map(|label| label.as_ref().parse().ok())
            .collect();
        let unknown = sectors.iter().filter(|sector| sector.is_none()).count();
        if unknown > 0 {
            debug!("{} direction labels are not compass sectors", unknown);
        }
        Self::new(index, sectors)
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn sectors(&self) -> &[Option<Sector>] {
        &self.sectors
    }
}

/// Direction input of [`ClimateVis::wind_rose`].
#[derive(Clone, Copy)]
pub enum WindDirection<'a> {
    /// Compass sector labels.
    Sectors(&'a SectorSeries),
    /// Degrees clockwise from north, binned to the nearest sector.
    Degrees(&'a dyn TimeSeries),
}

impl<'a> From<&'a SectorSeries> for WindDirection<'a> {
    fn from(series: &'a SectorSeries) -> Self {
        WindDirection::Sectors(series)
    }
}

impl<'a> From<&'a dyn TimeSeries> for WindDirection<'a> {
    fn from(series: &'a dyn TimeSeries) -> Self {
        WindDirection::Degrees(series)
    }
}

impl<'a> From<&'a NamedSeries> for WindDirection<'a> {
    fn from(series: &'a NamedSeries) -> Self {
        WindDirection::Degrees(series)
    }
}

impl<'a> From<&'a FrameColumn> for WindDirection<'a> {
    fn from(series: &'a FrameColumn) -> Self {
        WindDirection::Degrees(series)
    }
}

impl<'a> WindDirection<'a> {
    /// Timestamps and sectors, after checking the input can be read as directions.
    fn resolve(self, caller: &str) -> Result<(&'a [NaiveDateTime], Vec<Option<Sector>>), ValidationError> {
        match self {
            WindDirection::Sectors(series) => Ok((series.index(), series.sectors().to_vec())),
            WindDirection::Degrees(series) => {
                let label = series.name().unwrap_or("direction").to_string();
                let index = series.datetime_index().ok_or_else(|| ValidationError::MissingDatetimeIndex {
                    caller: caller.to_string(),
                    label,
                    found: match series.index() {
                        IndexColumn::Other(kind) => kind.to_string(),
                        IndexColumn::Datetime(_) => "datetime".to_string(),
                    },
                })?;
                let degrees = match series.values() {
                    ValueColumn::Numeric(values) => values,
                    ValueColumn::Unsupported(dtype) => {
                        return Err(ValidationError::InvalidElementType {
                            caller: caller.to_string(),
                            position: 1,
                            found: dtype.to_string(),
                        })
                    }
                };
                Ok((index, degrees.iter().map(|d| Sector::from_degrees(*d)).collect()))
            }
        }
    }
}

fn speed_class(speed: f64) -> Option<usize> {
    SPEED_EDGES
        .windows(2)
        .position(|edges| speed >= edges[0] && speed < edges[1])
}

fn class_label(class: usize) -> String {
    format!("{}-{} m/s", SPEED_EDGES[class], SPEED_EDGES[class + 1])
}

/// Share of each speed class within each sector, in percent.
///
/// `shares[class][sector]` sums to 100 over the classes of a sector that has
/// observations, and is 0 everywhere for an empty sector.
fn sector_shares(speeds: &[f64], sectors: &[Option<Sector>]) -> Vec<[f64; 16]> {
    let classes = SPEED_EDGES.len() - 1;
    let mut counts = vec![[0usize; 16]; classes];
    for (speed, sector) in speeds.iter().zip(sectors) {
        if let (Some(class), Some(sector)) = (speed_class(*speed), sector) {
            counts[class][sector.position()] += 1;
        }
    }

    let totals: Vec<usize> = (0..Sector::ALL.len())
        .map(|sector| counts.iter().map(|class| class[sector]).sum())
        .collect();
    debug!("Wind rose observations per sector: {:?}", totals);

    counts
        .iter()
        .map(|class| {
            let mut shares = [0.0; 16];
            for (sector, share) in shares.iter_mut().enumerate() {
                if totals[sector] > 0 {
                    *share = class[sector] as f64 / totals[sector] as f64 * 100.0;
                }
            }
            shares
        })
        .collect()
}

#[bon]
impl ClimateVis {
    /// Wind rose from a speed series (m/s) and a direction series.
    ///
    /// The direction is either a [`SectorSeries`] of compass labels or a numeric
    /// series in degrees clockwise from north, binned to the nearest of the 16
    /// compass points. Speeds fall into the classes 0-2, 2-5, 5-10, 10-15 and
    /// 15-20 m/s; calmer or stronger values are left out. Bars show, per
    /// sector, the percentage of that sector's observations in each class.
    ///
    /// Only the speed series goes through full validation. The direction must
    /// have a datetime index equal to the speed's.
    ///
    /// # Errors
    ///
    /// Validation errors for the speed series,
    /// [`ValidationError::MissingDatetimeIndex`] for a direction without a
    /// datetime index, or [`ChartError::IndexMismatch`] when the two indexes differ.
    #[builder]
    pub fn wind_rose<'a>(
        &self,
        speed: &dyn TimeSeries,
        #[builder(into)] direction: WindDirection<'a>,
        style: Option<&str>,
        paper_size: Option<&str>,
    ) -> Result<Figure, ClimateVisError> {
        const CALLER: &str = "wind_rose";
        let style = style.unwrap_or(DEFAULT_STYLE);
        let series = self.validated(PlotInput::Single(speed), style, paper_size, CALLER)?;
        let speed = series[0];

        let (direction_index, sectors) = direction.resolve(CALLER)?;
        if speed.datetime_index() != Some(direction_index) {
            return Err(ChartError::IndexMismatch {
                caller: CALLER.to_string(),
            }
            .into());
        }

        let shares = sector_shares(speed.numeric_values().unwrap_or_default(), &sectors);
        let angles: Vec<f64> = Sector::ALL.map(Sector::degrees).to_vec();
        let labels: Vec<&str> = Sector::ALL.map(Sector::label).to_vec();

        let mut figure = Figure::new();
        for (class, (r, color)) in shares.iter().zip(SPEED_COLORS).enumerate() {
            figure.add_trace(json!({
                "type": "barpolar",
                "r": r,
                "theta": angles,
                "name": class_label(class),
                "marker": { "color": color, "line": { "color": "white" } },
                "opacity": 0.7,
            }));
        }

        let radial_ticks: Vec<u32> = (0..=100).step_by(10).collect();
        figure.update_layout(json!({
            "polar": {
                "angularaxis": {
                    "direction": "clockwise",
                    "tickmode": "array",
                    "tickvals": angles,
                    "ticktext": labels,
                    "rotation": 90,
                },
                "radialaxis": {
                    "tickvals": radial_ticks,
                    "ticktext": radial_ticks.iter().map(|t| format!("{t}%")).collect::<Vec<_>>(),
                    "range": [0, 100],
                    "angle": 67,
                    "gridcolor": "lightgray",
                    "gridwidth": 0.5,
                },
            },
            "showlegend": true,
        }));
        Ok(self.finish(figure, style, paper_size)?)
    }
}
