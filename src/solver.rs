//! Pallet and container load calculation.
//!
//! A calculation runs the whole pipeline in one synchronous pass:
//! 1. boxes per layer on the pallet ([`fit_footprints`])
//! 2. layers per height class ([`stack_layers`])
//! 3. pallets on the floor per length class ([`fit_footprints`] again)
//! 4. totals for each container profile
//!
//! Every stage takes an immutable snapshot and returns a fresh value, so
//! calling [`calculate`] twice with the same input gives identical results.

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::fit::{LayerFit, Orientation, StackFit, fit_footprints, stack_layers};
use crate::model::{
    BoxDimensions, ContainerKind, HeightClass, LengthClass, PalletDimensions, PalletPreset,
};
use crate::units::LengthUnit;

/// Settings applied when a request leaves pallet or unit details open.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CalculatorConfig {
    /// Pallet used when the request names none.
    pub default_preset: PalletPreset,
    /// Deck height used when the request gives none.
    pub default_base_height: f64,
    /// Unit assumed for box dimensions without an explicit unit.
    pub default_unit: LengthUnit,
}

impl CalculatorConfig {
    pub const DEFAULT_PRESET: PalletPreset = PalletPreset::Standard;
    pub const DEFAULT_BASE_HEIGHT: f64 = PalletDimensions::DEFAULT_BASE_HEIGHT;
    pub const DEFAULT_UNIT: LengthUnit = LengthUnit::Centimeter;

    /// Creates a builder for a custom configuration.
    pub fn builder() -> CalculatorConfigBuilder {
        CalculatorConfigBuilder::default()
    }

    /// Pallet for a request.
    ///
    /// Named presets fix length and width; only `Custom` takes the given sides.
    /// The deck height override applies to every preset.
    pub fn resolve_pallet(
        &self,
        preset: Option<PalletPreset>,
        length: Option<f64>,
        width: Option<f64>,
        base_height: Option<f64>,
    ) -> PalletDimensions {
        let preset = preset.unwrap_or(self.default_preset);
        let mut pallet = preset.dimensions();
        pallet.base_height = base_height.unwrap_or(self.default_base_height);
        if preset == PalletPreset::Custom {
            pallet.length = length.unwrap_or(pallet.length);
            pallet.width = width.unwrap_or(pallet.width);
        }
        pallet
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_preset: Self::DEFAULT_PRESET,
            default_base_height: Self::DEFAULT_BASE_HEIGHT,
            default_unit: Self::DEFAULT_UNIT,
        }
    }
}

/// Builder for [`CalculatorConfig`].
#[derive(Clone, Debug, Default)]
pub struct CalculatorConfigBuilder {
    config: CalculatorConfig,
}

impl CalculatorConfigBuilder {
    pub fn default_preset(mut self, preset: PalletPreset) -> Self {
        self.config.default_preset = preset;
        self
    }

    pub fn default_base_height(mut self, height: f64) -> Self {
        self.config.default_base_height = height;
        self
    }

    pub fn default_unit(mut self, unit: LengthUnit) -> Self {
        self.config.default_unit = unit;
        self
    }

    pub fn build(self) -> CalculatorConfig {
        self.config
    }
}

/// Input snapshot of one calculation, already in centimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalculationInput {
    pub carton: BoxDimensions,
    pub pallet: PalletDimensions,
}

impl CalculationInput {
    pub fn new(carton: BoxDimensions, pallet: PalletDimensions) -> Self {
        Self { carton, pallet }
    }

    /// `true` when every dimension is usable.
    ///
    /// Otherwise stack depth and box totals are zero, while layer capacity and
    /// pallets on the floor are still reported from whichever sides are valid.
    pub fn is_complete(&self) -> bool {
        self.carton.check_complete().is_ok() && self.pallet.check_complete().is_ok()
    }
}

/// Stacking result of one pallet for one height class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct ClassStack {
    /// Whole box layers on the pallet ("HI").
    pub layers: u64,
    /// Pallet deck plus stacked boxes.
    pub stack_height: f64,
    pub boxes_per_pallet: u64,
}

impl ClassStack {
    fn new(layer_capacity: u64, stack: StackFit) -> Self {
        Self {
            layers: stack.layers,
            stack_height: stack.stack_height,
            boxes_per_pallet: layer_capacity.saturating_mul(stack.layers),
        }
    }
}

/// Boxes on a single pallet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct PalletFit {
    /// Box grid of one layer; `layer.count` is the layer capacity ("TI").
    pub layer: LayerFit,
    pub standard: ClassStack,
    pub high_cube: ClassStack,
}

impl PalletFit {
    pub fn layer_capacity(&self) -> u64 {
        self.layer.count
    }

    pub fn for_class(&self, class: HeightClass) -> &ClassStack {
        match class {
            HeightClass::Standard => &self.standard,
            HeightClass::HighCube => &self.high_cube,
        }
    }
}

/// Load of one container profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContainerFit {
    pub kind: ContainerKind,
    pub pallets_on_floor: u64,
    pub orientation: Orientation,
    /// Pallets along the container length.
    pub cols: u64,
    /// Pallets across the container width.
    pub rows: u64,
    /// Pallets are loaded single-deck, so this equals `pallets_on_floor`.
    pub total_pallets: u64,
    pub total_boxes: u64,
}

/// Full result of one calculation pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Calculation {
    pub pallet: PalletFit,
    /// 20GP, 40GP and 40HQ in that order.
    pub containers: [ContainerFit; 3],
    /// `false` when some dimension was missing; stack depth and box totals
    /// are then zero, layer and floor counts only where their sides are valid.
    pub complete: bool,
}

impl Calculation {
    pub fn container(&self, kind: ContainerKind) -> &ContainerFit {
        match kind {
            ContainerKind::Gp20 => &self.containers[0],
            ContainerKind::Gp40 => &self.containers[1],
            ContainerKind::Hq40 => &self.containers[2],
        }
    }
}

/// Boxes on one pallet for both height classes.
pub fn solve_pallet(carton: &BoxDimensions, pallet: &PalletDimensions) -> PalletFit {
    let layer = fit_footprints(pallet, carton);
    let stack_for = |class: HeightClass| {
        ClassStack::new(
            layer.count,
            stack_layers(class.height_limit(), pallet.base_height, carton.height),
        )
    };

    PalletFit {
        layer,
        standard: stack_for(HeightClass::Standard),
        high_cube: stack_for(HeightClass::HighCube),
    }
}

/// Pallets on the floor of a container of the given length class.
pub fn solve_floor(pallet: &PalletDimensions, class: LengthClass) -> LayerFit {
    fit_footprints(&class.floor(), pallet)
}

/// Runs the full pipeline for one input snapshot.
///
/// # Examples
/// ```
/// use pallet_fit::model::{BoxDimensions, ContainerKind, PalletPreset};
/// use pallet_fit::solver::{calculate, CalculationInput};
///
/// let input = CalculationInput::new(
///     BoxDimensions::new(40.0, 30.0, 20.0),
///     PalletPreset::Standard.dimensions(),
/// );
/// let result = calculate(&input);
/// assert_eq!(result.pallet.layer_capacity(), 9);
/// assert_eq!(result.container(ContainerKind::Hq40).pallets_on_floor, 20);
/// ```
pub fn calculate(input: &CalculationInput) -> Calculation {
    let CalculationInput { carton, pallet } = input;

    if let Err(err) = carton.check_complete().and(pallet.check_complete()) {
        debug!("Incomplete input, stack and totals will be zero: {}", err);
    }

    let pallet_fit = solve_pallet(carton, pallet);
    let short_floor = solve_floor(pallet, LengthClass::Short);
    let long_floor = solve_floor(pallet, LengthClass::Long);

    let containers = ContainerKind::ALL.map(|kind| {
        let floor = match kind.length_class() {
            LengthClass::Short => short_floor,
            LengthClass::Long => long_floor,
        };
        let per_pallet = pallet_fit.for_class(kind.height_class()).boxes_per_pallet;
        ContainerFit {
            kind,
            pallets_on_floor: floor.count,
            orientation: floor.orientation(),
            cols: floor.cols,
            rows: floor.rows,
            total_pallets: floor.count,
            total_boxes: floor.count.saturating_mul(per_pallet),
        }
    });

    Calculation {
        pallet: pallet_fit,
        containers,
        complete: input.is_complete(),
    }
}

/// Calculation entry point carrying the request defaults.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    config: CalculatorConfig,
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Recomputes everything for the given snapshot.
    pub fn recalculate(&self, input: &CalculationInput) -> Calculation {
        calculate(input)
    }

    /// Normalizes raw box values and resolves the pallet before calculating.
    pub fn calculate_raw(
        &self,
        (length, width, height): (f64, f64, f64),
        unit: Option<LengthUnit>,
        pallet: PalletDimensions,
    ) -> (CalculationInput, Calculation) {
        let unit = unit.unwrap_or(self.config.default_unit);
        let input = CalculationInput::new(
            BoxDimensions::from_unit(length, width, height, unit),
            pallet,
        );
        let result = self.recalculate(&input);
        (input, result)
    }
}
