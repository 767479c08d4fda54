use std::fmt;
use std::str::FromStr;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend from `self` (t = 0) to `other` (t = 1), per channel.
    pub fn blend(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (f64::from(a) + t * (f64::from(b) - f64::from(a))).round() as u8;
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    pub fn rgba(self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.0, self.1, self.2, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Plotly's named continuous color scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScale {
    #[default]
    Viridis,
    Cividis,
    Blues,
    Reds,
    YlOrRd,
    Hot,
}

impl ColorScale {
    /// The name Plotly knows the scale by.
    pub fn name(self) -> &'static str {
        match self {
            ColorScale::Viridis => "Viridis",
            ColorScale::Cividis => "Cividis",
            ColorScale::Blues => "Blues",
            ColorScale::Reds => "Reds",
            ColorScale::YlOrRd => "YlOrRd",
            ColorScale::Hot => "Hot",
        }
    }

    /// First and last color of the scale.
    pub fn endpoints(self) -> (Rgb, Rgb) {
        match self {
            ColorScale::Viridis => (Rgb(0x44, 0x01, 0x54), Rgb(0xfd, 0xe7, 0x25)),
            ColorScale::Cividis => (Rgb(0, 32, 76), Rgb(255, 234, 70)),
            ColorScale::Blues => (Rgb(5, 10, 172), Rgb(220, 220, 220)),
            ColorScale::Reds => (Rgb(220, 220, 220), Rgb(178, 10, 28)),
            ColorScale::YlOrRd => (Rgb(128, 0, 38), Rgb(255, 255, 204)),
            ColorScale::Hot => (Rgb(0, 0, 0), Rgb(255, 255, 255)),
        }
    }

    /// `count` colors evenly spaced from the first to the last color of the scale.
    pub fn sample(self, count: usize) -> Vec<Rgb> {
        let (low, high) = self.endpoints();
        let steps = count.saturating_sub(1).max(1) as f64;
        (0..count).map(|i| low.blend(high, i as f64 / steps)).collect()
    }
}

impl FromStr for ColorScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ColorScale::Viridis,
            ColorScale::Cividis,
            ColorScale::Blues,
            ColorScale::Reds,
            ColorScale::YlOrRd,
            ColorScale::Hot,
        ]
        .into_iter()
        .find(|scale| scale.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown color scale '{s}'"))
    }
}
