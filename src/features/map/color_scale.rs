//! Continuous choropleth colour scale.

use thiserror::Error;

/// Stops from the lowest to the highest value
pub const DEFAULT_STOPS: [&str; 6] = [
    "#e0f3f8", "#ffffbf", "#fee090", "#fdae61", "#f46d43", "#d73027",
];

#[derive(Debug, Error, PartialEq)]
pub enum ColorScaleError {
    #[error("Invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("A colour scale needs at least two stops")]
    TooFewStops,

    #[error("Scale domain is empty: min {min} must be below max {max}")]
    EmptyDomain { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse(hex: &str) -> Result<Self, ColorScaleError> {
        let invalid = || ColorScaleError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Maps a value in `[min, max]` onto evenly spaced colour stops
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
    stops: Vec<Rgb>,
}

impl ColorScale {
    pub fn new(min: f64, max: f64, stops: &[&str]) -> Result<Self, ColorScaleError> {
        if !(min < max) {
            return Err(ColorScaleError::EmptyDomain { min, max });
        }
        if stops.len() < 2 {
            return Err(ColorScaleError::TooFewStops);
        }
        let stops = stops
            .iter()
            .map(|s| Rgb::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { min, max, stops })
    }

    /// The default palette over a custom domain
    pub fn with_domain(min: f64, max: f64) -> Result<Self, ColorScaleError> {
        Self::new(min, max, &DEFAULT_STOPS)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn stops_hex(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.to_hex()).collect()
    }

    /// Colour for `value`, clamped to the domain. NaN maps to the lowest stop.
    pub fn color_for(&self, value: f64) -> Rgb {
        let value = if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        };
        let position = (value - self.min) / (self.max - self.min) * (self.stops.len() - 1) as f64;
        let lower = (position.floor() as usize).min(self.stops.len() - 2);
        self.stops[lower].lerp(self.stops[lower + 1], position - lower as f64)
    }

    pub fn hex_for(&self, value: f64) -> String {
        self.color_for(value).to_hex()
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
            stops: vec![
                Rgb(0xe0, 0xf3, 0xf8),
                Rgb(0xff, 0xff, 0xbf),
                Rgb(0xfe, 0xe0, 0x90),
                Rgb(0xfd, 0xae, 0x61),
                Rgb(0xf4, 0x6d, 0x43),
                Rgb(0xd7, 0x30, 0x27),
            ],
        }
    }
}
