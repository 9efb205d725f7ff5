//! Common types and traits for 2D footprint geometry.
//!
//! Every fitting decision in this crate works on rectangles: a pallet on a
//! container floor, a box on a pallet. The [`Footprint`] type and the
//! [`HasFootprint`] trait let both call sites share one fitting routine.

/// Length × width rectangle of an item, ignoring its height.
///
/// # Examples
/// ```
/// use pallet_fit::model::PalletPreset;
/// use pallet_fit::types::{Footprint, HasFootprint};
///
/// let euro = PalletPreset::Euro.dimensions();
/// assert_eq!(euro.footprint(), Footprint::new(120.0, 80.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub length: f64,
    pub width: f64,
}

impl Footprint {
    #[inline]
    pub const fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

/// Trait for objects that occupy a rectangle on the plane they rest on.
pub trait HasFootprint {
    /// Returns the length × width rectangle of the object.
    fn footprint(&self) -> Footprint;
}

impl HasFootprint for Footprint {
    fn footprint(&self) -> Footprint {
        *self
    }
}

/// Returns `true` for strictly positive, finite values.
#[inline]
pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Validation helpers shared by the input models.
pub mod validation {
    use crate::model::InputError;

    use super::is_positive_finite;

    /// Validates a single dimension that must be strictly positive.
    ///
    /// # Parameters
    /// * `value` - The value to validate
    /// * `name` - Name of the dimension for error messages
    pub fn validate_dimension(value: f64, name: &'static str) -> Result<(), InputError> {
        if is_positive_finite(value) {
            Ok(())
        } else {
            Err(InputError::Incomplete { field: name, value })
        }
    }

    /// Validates a dimension that may be zero, such as the pallet deck height.
    pub fn validate_non_negative(value: f64, name: &'static str) -> Result<(), InputError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(InputError::Incomplete { field: name, value })
        }
    }
}
