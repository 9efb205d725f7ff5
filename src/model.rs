//! Data models for pallet and container load planning.
//!
//! This module defines the input side of every calculation:
//! - `BoxDimensions`: the carton being shipped, in centimetres
//! - `PalletDimensions`: the pallet the cartons are stacked on
//! - `ContainerProfile`: the three supported shipping containers
//!
//! All values are plain snapshots; nothing here is mutated by the solvers.

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::validation::{validate_dimension, validate_non_negative};
use crate::types::{Footprint, HasFootprint};
use crate::units::{LengthUnit, normalize};

/// Reason a calculation could not produce meaningful (non-zero) figures.
///
/// The solvers never return this; they absorb it as zero counts. It is
/// surfaced to callers only as a flag on the result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a positive finite number, got: {value}")]
    Incomplete { field: &'static str, value: f64 },
}

/// Carton dimensions in centimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "length": 40.0, "width": 30.0, "height": 20.0 }))]
pub struct BoxDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxDimensions {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Builds canonical box dimensions from raw values entered in `unit`.
    ///
    /// # Examples
    /// ```
    /// use pallet_fit::model::BoxDimensions;
    /// use pallet_fit::units::LengthUnit;
    ///
    /// let carton = BoxDimensions::from_unit(400.0, 300.0, 200.0, LengthUnit::Millimeter);
    /// assert!((carton.length - 40.0).abs() < 1e-9);
    /// ```
    pub fn from_unit(length: f64, width: f64, height: f64, unit: LengthUnit) -> Self {
        Self::new(
            normalize(length, unit),
            normalize(width, unit),
            normalize(height, unit),
        )
    }

    /// Checks that every side is usable for fitting.
    pub fn check_complete(&self) -> Result<(), InputError> {
        validate_dimension(self.length, "Box length")?;
        validate_dimension(self.width, "Box width")?;
        validate_dimension(self.height, "Box height")?;
        Ok(())
    }
}

impl HasFootprint for BoxDimensions {
    fn footprint(&self) -> Footprint {
        Footprint::new(self.length, self.width)
    }
}

/// Pallet deck dimensions in centimetres.
///
/// `base_height` is the height of the empty pallet; cartons start stacking on top of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "length": 120.0, "width": 100.0, "base_height": 15.0 }))]
pub struct PalletDimensions {
    pub length: f64,
    pub width: f64,
    pub base_height: f64,
}

impl PalletDimensions {
    pub const DEFAULT_BASE_HEIGHT: f64 = 15.0;

    pub const fn new(length: f64, width: f64, base_height: f64) -> Self {
        Self {
            length,
            width,
            base_height,
        }
    }

    pub fn check_complete(&self) -> Result<(), InputError> {
        validate_dimension(self.length, "Pallet length")?;
        validate_dimension(self.width, "Pallet width")?;
        validate_non_negative(self.base_height, "Pallet base height")?;
        Ok(())
    }
}

impl Default for PalletDimensions {
    fn default() -> Self {
        PalletPreset::Standard.dimensions()
    }
}

impl HasFootprint for PalletDimensions {
    fn footprint(&self) -> Footprint {
        Footprint::new(self.length, self.width)
    }
}

/// Named pallet sizes offered to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PalletPreset {
    /// 120 × 100 industrial pallet.
    #[default]
    #[serde(alias = "std")]
    Standard,
    /// 120 × 80 EUR pallet.
    #[serde(alias = "eur")]
    Euro,
    /// 122 × 102 (48" × 40") North American pallet.
    #[serde(alias = "usa")]
    Us,
    /// User-entered dimensions.
    Custom,
}

impl PalletPreset {
    pub const ALL: [PalletPreset; 4] = [Self::Standard, Self::Euro, Self::Us, Self::Custom];

    /// Dimensions of the preset. `Custom` starts from the standard pallet.
    pub const fn dimensions(self) -> PalletDimensions {
        let base = PalletDimensions::DEFAULT_BASE_HEIGHT;
        match self {
            PalletPreset::Standard | PalletPreset::Custom => PalletDimensions::new(120.0, 100.0, base),
            PalletPreset::Euro => PalletDimensions::new(120.0, 80.0, base),
            PalletPreset::Us => PalletDimensions::new(122.0, 102.0, base),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PalletPreset::Standard => "standard",
            PalletPreset::Euro => "euro",
            PalletPreset::Us => "us",
            PalletPreset::Custom => "custom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PalletPreset::Standard => "Standard pallet (120×100)",
            PalletPreset::Euro => "EUR pallet (120×80)",
            PalletPreset::Us => "US pallet (122×102)",
            PalletPreset::Custom => "Custom size",
        }
    }
}

/// Returned when a pallet preset name cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pallet preset '{0}', expected one of standard, euro, us, custom")]
pub struct UnknownPreset(pub String);

impl std::str::FromStr for PalletPreset {
    type Err = UnknownPreset;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" | "std" => Ok(PalletPreset::Standard),
            "euro" | "eur" => Ok(PalletPreset::Euro),
            "us" | "usa" => Ok(PalletPreset::Us),
            "custom" => Ok(PalletPreset::Custom),
            _ => Err(UnknownPreset(raw.to_string())),
        }
    }
}

/// Internal floor length class of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LengthClass {
    /// 20-foot box.
    Short,
    /// 40-foot box.
    Long,
}

impl LengthClass {
    pub const fn inner_length(self) -> f64 {
        match self {
            LengthClass::Short => CONTAINER_SHORT_INNER_LENGTH,
            LengthClass::Long => CONTAINER_LONG_INNER_LENGTH,
        }
    }

    pub const fn floor(self) -> Footprint {
        Footprint::new(self.inner_length(), CONTAINER_INNER_WIDTH)
    }
}

/// Usable stacking height class of a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HeightClass {
    Standard,
    HighCube,
}

impl HeightClass {
    /// Highest point a loaded pallet may reach, door clearance already applied.
    pub const fn height_limit(self) -> f64 {
        match self {
            HeightClass::Standard => CONTAINER_STANDARD_HEIGHT_LIMIT,
            HeightClass::HighCube => CONTAINER_HIGH_CUBE_HEIGHT_LIMIT,
        }
    }
}

// Inner shell figures in centimetres. Heights are door clearances
// (inner heights are 239 and 269).
pub const CONTAINER_SHORT_INNER_LENGTH: f64 = 589.0;
pub const CONTAINER_LONG_INNER_LENGTH: f64 = 1203.0;
pub const CONTAINER_INNER_WIDTH: f64 = 235.0;
pub const CONTAINER_STANDARD_HEIGHT_LIMIT: f64 = 228.0;
pub const CONTAINER_HIGH_CUBE_HEIGHT_LIMIT: f64 = 258.0;

/// The supported shipping containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ContainerKind {
    #[serde(rename = "20GP")]
    Gp20,
    #[serde(rename = "40GP")]
    Gp40,
    #[serde(rename = "40HQ")]
    Hq40,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 3] = [Self::Gp20, Self::Gp40, Self::Hq40];

    pub const fn name(self) -> &'static str {
        match self {
            ContainerKind::Gp20 => "20GP",
            ContainerKind::Gp40 => "40GP",
            ContainerKind::Hq40 => "40HQ",
        }
    }

    pub const fn length_class(self) -> LengthClass {
        match self {
            ContainerKind::Gp20 => LengthClass::Short,
            ContainerKind::Gp40 | ContainerKind::Hq40 => LengthClass::Long,
        }
    }

    pub const fn height_class(self) -> HeightClass {
        match self {
            ContainerKind::Gp20 | ContainerKind::Gp40 => HeightClass::Standard,
            ContainerKind::Hq40 => HeightClass::HighCube,
        }
    }

    /// Nominal loadable volume in cubic metres, used by the quick estimate.
    pub const fn nominal_volume_cbm(self) -> f64 {
        match self {
            ContainerKind::Gp20 => 28.0,
            ContainerKind::Gp40 => 58.0,
            ContainerKind::Hq40 => 68.0,
        }
    }

    pub const fn profile(self) -> ContainerProfile {
        let length = self.length_class();
        let height = self.height_class();
        ContainerProfile {
            kind: self,
            name: self.name(),
            inner_length: length.inner_length(),
            inner_width: CONTAINER_INNER_WIDTH,
            height_limit: height.height_limit(),
            nominal_volume_cbm: self.nominal_volume_cbm(),
        }
    }
}

/// Fixed description of a container type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ContainerProfile {
    pub kind: ContainerKind,
    pub name: &'static str,
    pub inner_length: f64,
    pub inner_width: f64,
    pub height_limit: f64,
    pub nominal_volume_cbm: f64,
}

impl ContainerProfile {
    /// All three profiles in display order.
    pub fn all() -> [ContainerProfile; 3] {
        ContainerKind::ALL.map(ContainerKind::profile)
    }
}
