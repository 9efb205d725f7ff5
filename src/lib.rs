//! Pallet stacking and container loading calculator.
//!
//! Given carton and pallet dimensions, computes boxes per pallet layer, layers
//! per container height class, and pallets (hence boxes) per container floor.
//!
//! ```
//! use pallet_fit::model::{BoxDimensions, ContainerKind, PalletPreset};
//! use pallet_fit::solver::{CalculationInput, calculate};
//!
//! let result = calculate(&CalculationInput::new(
//!     BoxDimensions::new(40.0, 30.0, 20.0),
//!     PalletPreset::Standard.dimensions(),
//! ));
//! assert_eq!(result.container(ContainerKind::Gp40).total_boxes, 20 * 9 * 10);
//! ```

pub mod api;
pub mod config;
pub mod estimate;
pub mod fit;
pub mod model;
pub mod solver;
pub mod types;
pub mod units;
