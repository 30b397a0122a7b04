//! CSS Values & Units Level 3, §6.2 Absolute lengths (print subset)
//! Spec: <https://www.w3.org/TR/css-values-3/#absolute-lengths>
//!
//! Page margins arrive as the serialized value of a `@page` declaration, so the
//! literal is always `<number><unit>` with a two letter unit. Anything that does
//! not fit that shape converts to zero millimetres instead of failing.

use log::debug;

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;
/// Millimetres per point (1/72 in), rounded to six places.
const MM_PER_POINT: f64 = 0.352_778;
/// Width of every supported unit suffix, in characters.
const UNIT_SUFFIX_CHARS: usize = 2;

/// Supported subset of absolute CSS <length> units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    Inches,
    Points,
}

impl LengthUnit {
    /// Look up a unit by its exact (lowercase) suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "mm" => Some(Self::Millimeters),
            "cm" => Some(Self::Centimeters),
            "in" => Some(Self::Inches),
            "pt" => Some(Self::Points),
            _ => None,
        }
    }

    /// Fixed multiplier converting one unit into millimetres.
    pub const fn millimeters_per_unit(self) -> f64 {
        match self {
            Self::Millimeters => 1.0,
            Self::Centimeters => 10.0,
            Self::Inches => MM_PER_INCH,
            Self::Points => MM_PER_POINT,
        }
    }
}

/// A CSS <length> value with an absolute unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    /// Convert to millimetres using the fixed per-unit multiplier.
    pub fn to_millimeters(self) -> f64 {
        self.value * self.unit.millimeters_per_unit()
    }
}

/// Parse the magnitude in front of the unit. Non-numeric or non-finite text is zero.
fn parse_magnitude(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Split `raw` into magnitude and unit and parse both.
///
/// Returns `None` when the last two characters are not a supported unit or the
/// input is shorter than a unit suffix.
pub fn parse_length(raw: &str) -> Option<Length> {
    let (split_at, _) = raw.char_indices().rev().nth(UNIT_SUFFIX_CHARS - 1)?;
    let (magnitude, suffix) = raw.split_at(split_at);
    let unit = LengthUnit::from_suffix(suffix)?;
    Some(Length {
        value: parse_magnitude(magnitude),
        unit,
    })
}

/// Convert a CSS length literal such as `12.5mm` or `1in` to millimetres.
///
/// Unknown or malformed units yield `0.0`; this never fails.
pub fn to_millimeters(raw: &str) -> f64 {
    parse_length(raw).map_or_else(
        || {
            if !raw.is_empty() {
                debug!("Unsupported CSS length {raw:?}; using 0mm");
            }
            0.0
        },
        Length::to_millimeters,
    )
}
