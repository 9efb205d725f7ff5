//! Fitting primitives shared by every load-planning step.
//!
//! Two closed-form routines live here:
//! - [`fit_rectangle`]: how many items fit on a rectangular surface, comparing
//!   the item placed as-is against the item turned by 90°
//! - [`stack_layers`]: how many whole layers fit below a height limit
//!
//! Boxes on a pallet and pallets on a container floor both go through
//! [`fit_footprints`], so the orientation choice is identical at both sites.

use serde::Serialize;
use utoipa::ToSchema;

use crate::types::{Footprint, HasFootprint, is_positive_finite};

/// Direction in which items are laid out on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Item length runs along the surface length.
    #[default]
    Standard,
    /// Item width runs along the surface length.
    Rotated,
}

/// Grid of items on one surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct LayerFit {
    /// Items along the surface length.
    pub cols: u64,
    /// Items along the surface width.
    pub rows: u64,
    /// `cols * rows`
    pub count: u64,
    pub rotated: bool,
}

impl LayerFit {
    pub const EMPTY: LayerFit = LayerFit {
        cols: 0,
        rows: 0,
        count: 0,
        rotated: false,
    };

    fn grid(cols: u64, rows: u64, rotated: bool) -> Self {
        Self {
            cols,
            rows,
            count: cols.saturating_mul(rows),
            rotated,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.rotated {
            Orientation::Rotated
        } else {
            Orientation::Standard
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Whole layers under a height limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, ToSchema)]
pub struct StackFit {
    pub layers: u64,
    /// Base height plus all stacked layers.
    pub stack_height: f64,
}

/// Number of whole `part`s in `span`, zero for empty or unusable spans.
///
/// Callers guarantee `part` is positive and finite.
#[inline]
fn whole_count(span: f64, part: f64) -> u64 {
    let ratio = (span / part).floor();
    if ratio.is_finite() && ratio > 0.0 {
        // Float-to-int `as` saturates at u64::MAX.
        ratio as u64
    } else {
        0
    }
}

/// Fits `item` onto `surface` and keeps the orientation holding more items.
///
/// The rotated layout wins only when it holds strictly more; on a tie the
/// standard layout is returned. An item side that is zero, negative or not
/// finite yields [`LayerFit::EMPTY`] without dividing.
///
/// # Examples
/// ```
/// use pallet_fit::fit::fit_rectangle;
///
/// let layer = fit_rectangle(120.0, 100.0, 40.0, 30.0);
/// assert_eq!((layer.cols, layer.rows, layer.count), (3, 3, 9));
/// assert!(!layer.rotated);
/// ```
pub fn fit_rectangle(
    container_length: f64,
    container_width: f64,
    item_length: f64,
    item_width: f64,
) -> LayerFit {
    if !is_positive_finite(item_length) || !is_positive_finite(item_width) {
        return LayerFit::EMPTY;
    }

    let standard = LayerFit::grid(
        whole_count(container_length, item_length),
        whole_count(container_width, item_width),
        false,
    );
    let rotated = LayerFit::grid(
        whole_count(container_length, item_width),
        whole_count(container_width, item_length),
        true,
    );

    if rotated.count > standard.count {
        rotated
    } else {
        standard
    }
}

/// [`fit_rectangle`] for anything with a footprint.
pub fn fit_footprints(surface: &impl HasFootprint, item: &impl HasFootprint) -> LayerFit {
    let Footprint {
        length: surface_length,
        width: surface_width,
    } = surface.footprint();
    let Footprint {
        length: item_length,
        width: item_width,
    } = item.footprint();
    fit_rectangle(surface_length, surface_width, item_length, item_width)
}

/// Stacks layers of `item_height` on a base of `base_height` below `height_limit`.
///
/// A negative or non-finite base stacks nothing, like an unusable item height.
///
/// # Examples
/// ```
/// use pallet_fit::fit::stack_layers;
///
/// let stack = stack_layers(228.0, 15.0, 20.0);
/// assert_eq!(stack.layers, 10);
/// assert_eq!(stack.stack_height, 215.0);
/// ```
pub fn stack_layers(height_limit: f64, base_height: f64, item_height: f64) -> StackFit {
    let available = height_limit - base_height;
    let usable_base = base_height.is_finite() && base_height >= 0.0;
    let layers = if usable_base && is_positive_finite(item_height) && available > 0.0 {
        whole_count(available, item_height)
    } else {
        0
    };

    StackFit {
        layers,
        stack_height: base_height + layers as f64 * item_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_standard_when_rotation_does_not_help() {
        // 3×3 standard against 4×2 rotated
        let layer = fit_rectangle(120.0, 100.0, 40.0, 30.0);
        assert_eq!(
            layer,
            LayerFit {
                cols: 3,
                rows: 3,
                count: 9,
                rotated: false
            }
        );
        assert_eq!(layer.orientation(), Orientation::Standard);
    }

    #[test]
    fn rotates_when_strictly_better() {
        // standard 1×1 = 1, rotated 2×1 = 2
        let layer = fit_rectangle(100.0, 60.0, 60.0, 45.0);
        assert_eq!(
            layer,
            LayerFit {
                cols: 2,
                rows: 1,
                count: 2,
                rotated: true
            }
        );
        assert_eq!(layer.orientation(), Orientation::Rotated);
    }

    #[test]
    fn ties_resolve_to_standard() {
        let layer = fit_rectangle(100.0, 100.0, 50.0, 25.0);
        // standard 2×4 = 8, rotated 4×2 = 8
        assert_eq!(layer.count, 8);
        assert!(!layer.rotated);
        assert_eq!((layer.cols, layer.rows), (2, 4));
    }

    #[test]
    fn pallets_on_long_container_floor() {
        let layer = fit_rectangle(1203.0, 235.0, 120.0, 100.0);
        // standard 10×2 = 20, rotated 12×1 = 12
        assert_eq!(
            layer,
            LayerFit {
                cols: 10,
                rows: 2,
                count: 20,
                rotated: false
            }
        );
    }

    #[test]
    fn degenerate_items_yield_empty_fit() {
        assert_eq!(fit_rectangle(120.0, 100.0, 0.0, 30.0), LayerFit::EMPTY);
        assert_eq!(fit_rectangle(120.0, 100.0, 40.0, 0.0), LayerFit::EMPTY);
        assert_eq!(fit_rectangle(120.0, 100.0, -40.0, 30.0), LayerFit::EMPTY);
        assert_eq!(fit_rectangle(120.0, 100.0, f64::NAN, 30.0), LayerFit::EMPTY);
        assert_eq!(
            fit_rectangle(120.0, 100.0, 40.0, f64::INFINITY),
            LayerFit::EMPTY
        );
    }

    #[test]
    fn unusable_surface_yields_zero_count() {
        assert_eq!(fit_rectangle(0.0, 100.0, 40.0, 30.0).count, 0);
        assert_eq!(fit_rectangle(-120.0, 100.0, 40.0, 30.0).count, 0);
        assert_eq!(fit_rectangle(f64::NAN, 100.0, 40.0, 30.0).count, 0);
    }

    #[test]
    fn item_larger_than_surface_fits_nothing() {
        let layer = fit_rectangle(50.0, 50.0, 60.0, 70.0);
        assert!(layer.is_empty());
        assert!(!layer.rotated);
    }

    #[test]
    fn fit_footprints_matches_fit_rectangle() {
        let surface = Footprint::new(589.0, 235.0);
        let item = Footprint::new(120.0, 80.0);
        assert_eq!(
            fit_footprints(&surface, &item),
            fit_rectangle(589.0, 235.0, 120.0, 80.0)
        );
    }

    #[test]
    fn stack_fills_available_height() {
        assert_eq!(
            stack_layers(228.0, 15.0, 20.0),
            StackFit {
                layers: 10,
                stack_height: 215.0
            }
        );
        assert_eq!(stack_layers(258.0, 15.0, 20.0).layers, 12);
    }

    #[test]
    fn stack_is_empty_when_base_reaches_limit() {
        assert_eq!(
            stack_layers(228.0, 228.0, 20.0),
            StackFit {
                layers: 0,
                stack_height: 228.0
            }
        );
        assert_eq!(
            stack_layers(228.0, 240.0, 20.0),
            StackFit {
                layers: 0,
                stack_height: 240.0
            }
        );
    }

    #[test]
    fn stack_ignores_unusable_item_height() {
        assert_eq!(stack_layers(228.0, 15.0, 0.0).layers, 0);
        assert_eq!(stack_layers(228.0, 15.0, -5.0).layers, 0);
        assert_eq!(stack_layers(228.0, 15.0, f64::NAN).layers, 0);
        assert_eq!(stack_layers(228.0, 15.0, 0.0).stack_height, 15.0);
    }

    #[test]
    fn stack_ignores_unusable_base_height() {
        assert_eq!(
            stack_layers(228.0, -40.0, 20.0),
            StackFit {
                layers: 0,
                stack_height: -40.0
            }
        );
        assert_eq!(stack_layers(228.0, f64::NAN, 20.0).layers, 0);
        assert_eq!(stack_layers(228.0, f64::NEG_INFINITY, 20.0).layers, 0);
        // a bare floor is still a usable base
        assert_eq!(stack_layers(228.0, 0.0, 20.0).layers, 11);
    }

    #[test]
    fn stack_with_item_taller_than_span() {
        let stack = stack_layers(228.0, 15.0, 300.0);
        assert_eq!(stack.layers, 0);
        assert_eq!(stack.stack_height, 15.0);
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn side() -> impl Strategy<Value = f64> {
            0.5f64..2000.0
        }

        proptest! {
            #[test]
            fn picks_larger_candidate_with_standard_on_ties(
                cl in side(), cw in side(), il in side(), iw in side(),
            ) {
                let standard = ((cl / il).floor() as u64) * ((cw / iw).floor() as u64);
                let rotated = ((cl / iw).floor() as u64) * ((cw / il).floor() as u64);
                let layer = fit_rectangle(cl, cw, il, iw);

                prop_assert_eq!(layer.count, standard.max(rotated));
                prop_assert_eq!(layer.rotated, rotated > standard);
                prop_assert_eq!(layer.count, layer.cols * layer.rows);
            }

            #[test]
            fn larger_surface_never_holds_fewer(
                cl in side(), cw in side(), il in side(), iw in side(),
                grow_l in 0.0f64..500.0, grow_w in 0.0f64..500.0,
            ) {
                let base = fit_rectangle(cl, cw, il, iw);
                let grown = fit_rectangle(cl + grow_l, cw + grow_w, il, iw);
                prop_assert!(grown.count >= base.count);
            }

            #[test]
            fn larger_item_never_fits_more(
                cl in side(), cw in side(), il in side(), iw in side(),
                grow_l in 0.0f64..500.0, grow_w in 0.0f64..500.0,
            ) {
                let base = fit_rectangle(cl, cw, il, iw);
                let grown = fit_rectangle(cl, cw, il + grow_l, iw + grow_w);
                prop_assert!(grown.count <= base.count);
            }

            #[test]
            fn stack_never_exceeds_limit(
                limit in 1.0f64..400.0, base in 0.0f64..100.0, item in 0.5f64..200.0,
            ) {
                let stack = stack_layers(limit, base, item);
                prop_assert!(stack.stack_height <= limit.max(base) + 1e-9);
                let expected = if limit - base <= 0.0 {
                    0
                } else {
                    ((limit - base) / item).floor() as u64
                };
                prop_assert_eq!(stack.layers, expected);
            }

            #[test]
            fn fitting_is_idempotent(
                cl in side(), cw in side(), il in side(), iw in side(),
            ) {
                prop_assert_eq!(fit_rectangle(cl, cw, il, iw), fit_rectangle(cl, cw, il, iw));
            }
        }
    }
}
