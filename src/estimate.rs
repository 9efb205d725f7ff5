//! Quick container estimate by volume, without pallets.
//!
//! Divides the nominal loadable volume of each container by the volume of one
//! carton. This ignores geometry entirely and is only meant as a first guess
//! before running the pallet calculation.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::ContainerKind;
use crate::units::LengthUnit;

/// Carton count for one container by volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct VolumeCount {
    pub kind: ContainerKind,
    /// `None` when the carton volume is not positive.
    pub boxes: Option<u64>,
}

/// Result of the quick volume estimate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VolumeEstimate {
    /// Volume of one carton in cubic metres, unrounded.
    pub box_cbm: f64,
    pub per_container: [VolumeCount; 3],
}

impl VolumeEstimate {
    pub fn boxes_for(&self, kind: ContainerKind) -> Option<u64> {
        self.per_container
            .iter()
            .find(|entry| entry.kind == kind)
            .and_then(|entry| entry.boxes)
    }
}

/// Estimates cartons per container from raw dimensions in `unit`.
///
/// # Examples
/// ```
/// use pallet_fit::estimate::estimate_by_volume;
/// use pallet_fit::model::ContainerKind;
/// use pallet_fit::units::LengthUnit;
///
/// let estimate = estimate_by_volume(50.0, 40.0, 30.0, LengthUnit::Centimeter);
/// assert_eq!(estimate.boxes_for(ContainerKind::Gp20), Some(466));
/// ```
pub fn estimate_by_volume(length: f64, width: f64, height: f64, unit: LengthUnit) -> VolumeEstimate {
    let factor = unit.factor_to_meters();
    let box_cbm = (length * factor) * (width * factor) * (height * factor);
    let usable = box_cbm.is_finite() && box_cbm > 0.0;

    let per_container = ContainerKind::ALL.map(|kind| VolumeCount {
        kind,
        boxes: usable.then(|| {
            let count = (kind.nominal_volume_cbm() / box_cbm).floor();
            // Saturating float-to-int cast.
            count as u64
        }),
    });

    VolumeEstimate {
        box_cbm: if usable { box_cbm } else { 0.0 },
        per_container,
    }
}

/// Rounds a volume to four decimals for display.
pub fn round_cbm(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
