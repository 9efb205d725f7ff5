//! Conversion of raw box dimensions into the canonical unit (centimetres).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unit a box dimension was entered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeter,
    #[default]
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "inch", alias = "in")]
    Inch,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 3] = [Self::Millimeter, Self::Centimeter, Self::Inch];

    /// Multiplier converting a value in this unit to centimetres.
    pub const fn factor(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.1,
            LengthUnit::Centimeter => 1.0,
            LengthUnit::Inch => 2.54,
        }
    }

    /// Multiplier converting a value in this unit to metres.
    pub const fn factor_to_meters(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Centimeter => 0.01,
            LengthUnit::Inch => 0.0254,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Inch => "inch",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returned when a unit name cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown length unit '{0}', expected one of mm, cm, inch")]
pub struct UnknownUnit(pub String);

impl FromStr for LengthUnit {
    type Err = UnknownUnit;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimetre" => Ok(LengthUnit::Millimeter),
            "cm" | "centimeter" | "centimetre" => Ok(LengthUnit::Centimeter),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inch),
            _ => Err(UnknownUnit(raw.to_string())),
        }
    }
}

/// Converts `value` given in `unit` to centimetres.
///
/// Non-finite input is passed through unchanged in kind (NaN stays NaN); the
/// fitting routines treat such values as incomplete input.
///
/// # Examples
/// ```
/// use pallet_fit::units::{normalize, LengthUnit};
///
/// assert_eq!(normalize(400.0, LengthUnit::Millimeter), 40.0);
/// assert!((normalize(10.0, LengthUnit::Inch) - 25.4).abs() < 1e-9);
/// ```
#[inline]
pub fn normalize(value: f64, unit: LengthUnit) -> f64 {
    value * unit.factor()
}

/// Rounds a canonical value to one decimal for display.
#[inline]
pub fn round_for_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
