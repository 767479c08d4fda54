use crate::style::error::StyleError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Pixel size of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// ISO A-series paper sizes in landscape and portrait orientation.
///
/// Pixel sizes correspond to 96 dpi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaperSize {
    A6Landscape,
    A6Portrait,
    A5Landscape,
    A5Portrait,
    A4Landscape,
    A4Portrait,
    A3Landscape,
    A3Portrait,
    A2Landscape,
    A2Portrait,
    A1Landscape,
    A1Portrait,
    A0Landscape,
    A0Portrait,
}

impl PaperSize {
    /// Every paper size, smallest first.
    pub const ALL: [PaperSize; 14] = [
        PaperSize::A6Landscape,
        PaperSize::A6Portrait,
        PaperSize::A5Landscape,
        PaperSize::A5Portrait,
        PaperSize::A4Landscape,
        PaperSize::A4Portrait,
        PaperSize::A3Landscape,
        PaperSize::A3Portrait,
        PaperSize::A2Landscape,
        PaperSize::A2Portrait,
        PaperSize::A1Landscape,
        PaperSize::A1Portrait,
        PaperSize::A0Landscape,
        PaperSize::A0Portrait,
    ];

    /// The canonical name, e.g. `"A4_LANDSCAPE"`.
    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A6Landscape => "A6_LANDSCAPE",
            PaperSize::A6Portrait => "A6_PORTRAIT",
            PaperSize::A5Landscape => "A5_LANDSCAPE",
            PaperSize::A5Portrait => "A5_PORTRAIT",
            PaperSize::A4Landscape => "A4_LANDSCAPE",
            PaperSize::A4Portrait => "A4_PORTRAIT",
            PaperSize::A3Landscape => "A3_LANDSCAPE",
            PaperSize::A3Portrait => "A3_PORTRAIT",
            PaperSize::A2Landscape => "A2_LANDSCAPE",
            PaperSize::A2Portrait => "A2_PORTRAIT",
            PaperSize::A1Landscape => "A1_LANDSCAPE",
            PaperSize::A1Portrait => "A1_PORTRAIT",
            PaperSize::A0Landscape => "A0_LANDSCAPE",
            PaperSize::A0Portrait => "A0_PORTRAIT",
        }
    }

    pub fn dimensions(self) -> Dimensions {
        let (long, short) = match self {
            PaperSize::A6Landscape | PaperSize::A6Portrait => (559, 397),
            PaperSize::A5Landscape | PaperSize::A5Portrait => (794, 560),
            PaperSize::A4Landscape | PaperSize::A4Portrait => (1123, 794),
            PaperSize::A3Landscape | PaperSize::A3Portrait => (1587, 1123),
            PaperSize::A2Landscape | PaperSize::A2Portrait => (2245, 1587),
            PaperSize::A1Landscape | PaperSize::A1Portrait => (3175, 2245),
            PaperSize::A0Landscape | PaperSize::A0Portrait => (4494, 3175),
        };
        if self.is_portrait() {
            Dimensions {
                width: short,
                height: long,
            }
        } else {
            Dimensions {
                width: long,
                height: short,
            }
        }
    }

    pub fn is_portrait(self) -> bool {
        matches!(
            self,
            PaperSize::A6Portrait
                | PaperSize::A5Portrait
                | PaperSize::A4Portrait
                | PaperSize::A3Portrait
                | PaperSize::A2Portrait
                | PaperSize::A1Portrait
                | PaperSize::A0Portrait
        )
    }
}

impl FromStr for PaperSize {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaperSize::ALL
            .into_iter()
            .find(|size| size.name() == s)
            .ok_or_else(|| StyleError::UnknownPaperSize(s.to_string()))
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up the pixel dimensions of a paper size by name.
///
/// # Errors
///
/// Returns [`StyleError::UnknownPaperSize`] if `name` is not one of [`PaperSize::ALL`].
///
/// # Examples
///
/// ```
/// use climatevis::{resolve_paper_size, Dimensions};
///
/// let size = resolve_paper_size("A4_PORTRAIT")?;
/// assert_eq!(size, Dimensions { width: 794, height: 1123 });
/// # Ok::<(), climatevis::StyleError>(())
/// ```
pub fn resolve_paper_size(name: &str) -> Result<Dimensions, StyleError> {
    name.parse::<PaperSize>().map(PaperSize::dimensions)
}
