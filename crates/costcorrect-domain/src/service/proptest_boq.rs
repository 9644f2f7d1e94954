//! Property-based tests for the BOQ calculator invariants.

use proptest::prelude::*;

use super::boq_calculator::{compute, validate_input, MaterialKind};
use crate::model::{BoqInput, BrickConstants};

/// Linear meters for a realistic house, up to a large commercial plan
fn linear_meters() -> impl Strategy<Value = f64> {
    0.0f64..5_000.0
}

fn wall_height() -> impl Strategy<Value = f64> {
    0.5f64..12.0
}

/// Mostly near the accepted ceilings, sometimes anywhere in the f64 range
fn untrusted_length() -> impl Strategy<Value = f64> {
    prop_oneof![0.0f64..200_000.0, 0.0f64..f64::MAX]
}

fn untrusted_height() -> impl Strategy<Value = f64> {
    prop_oneof![0.001f64..200.0, 0.001f64..f64::MAX]
}

fn untrusted_floors() -> impl Strategy<Value = u32> {
    prop_oneof![1u32..400, 1u32..=u32::MAX]
}

fn input_strategy() -> impl Strategy<Value = BoqInput> {
    (
        linear_meters(),
        linear_meters(),
        wall_height(),
        1u32..20,
        any::<bool>(),
    )
        .prop_map(|(walls_230, walls_110, height, floors, prices)| {
            BoqInput::new("plan.pdf", "1:100", walls_230, walls_110)
                .with_wall_height(height)
                .with_floors(floors)
                .with_prices(prices)
        })
}

proptest! {
    /// Property: total bricks is exactly the sum of both wall types.
    #[test]
    fn prop_total_is_sum_of_parts(input in input_strategy()) {
        let boq = compute(&input, &BrickConstants::default());
        prop_assert_eq!(boq.total_bricks, boq.bricks_230mm + boq.bricks_110mm);
    }

    /// Property: ceiling never under-provisions the wasted raw count.
    #[test]
    fn prop_bricks_never_below_raw(input in input_strategy()) {
        let c = BrickConstants::default();
        let boq = compute(&input, &c);
        let height = input.wall_height_m.unwrap_or(c.default_wall_height_m);
        let floors = input.floors as f64;

        let raw_230 = input.walls_230mm_linear_m * height * floors * c.bricks_per_sqm_double;
        let raw_110 = input.walls_110mm_linear_m * height * floors * c.bricks_per_sqm_single;

        prop_assert!(boq.bricks_230mm as f64 >= raw_230);
        prop_assert!(boq.bricks_110mm as f64 >= raw_110);
        prop_assert!((boq.bricks_230mm as f64) < raw_230 * c.wastage_multiplier() + 1.0 + 1e-6);
    }

    /// Property: the materials table is always four lines in fixed order.
    #[test]
    fn prop_four_materials_in_order(input in input_strategy()) {
        let boq = compute(&input, &BrickConstants::default());
        prop_assert_eq!(boq.materials.len(), 4);
        for (line, kind) in boq.materials.iter().zip(MaterialKind::ALL.iter()) {
            prop_assert_eq!(line.item.as_str(), kind.item());
            prop_assert_eq!(line.unit.as_str(), kind.unit());
        }
    }

    /// Property: cost fields are all present or all absent, driven by one flag.
    #[test]
    fn prop_costs_follow_flag(input in input_strategy()) {
        let boq = compute(&input, &BrickConstants::default());
        if input.estimate_prices {
            prop_assert!(boq.materials.iter().all(|m| m.estimated_cost.is_some()));
            let sum: f64 = boq.materials.iter().filter_map(|m| m.estimated_cost).sum();
            let total = boq.total_estimated_cost.unwrap_or(f64::NAN);
            prop_assert!((total - sum).abs() <= 1e-6 * sum.max(1.0));
        } else {
            prop_assert!(boq.materials.iter().all(|m| m.estimated_cost.is_none()));
            prop_assert!(boq.total_estimated_cost.is_none());
        }
    }

    /// Property: derived continuous quantities are never negative.
    #[test]
    fn prop_quantities_non_negative(input in input_strategy()) {
        let boq = compute(&input, &BrickConstants::default());
        prop_assert!(boq.walls_230mm_area_sqm >= 0.0);
        prop_assert!(boq.walls_110mm_area_sqm >= 0.0);
        prop_assert!(boq.cement_bags >= 0.0);
        prop_assert!(boq.sand_cubes >= 0.0);
    }

    /// Property: identical input yields identical output.
    #[test]
    fn prop_deterministic(input in input_strategy()) {
        let c = BrickConstants::default();
        prop_assert_eq!(compute(&input, &c), compute(&input, &c));
    }

    /// Property: generated input is always inside the validated domain.
    #[test]
    fn prop_generated_input_validates(input in input_strategy()) {
        prop_assert!(validate_input(&input).is_ok());
    }

    /// Property: any negative length is rejected before calculation.
    #[test]
    fn prop_negative_length_rejected(len in -5_000.0f64..-0.001) {
        let input = BoqInput::new("plan.pdf", "1:100", len, 0.0);
        prop_assert!(validate_input(&input).is_err());
        let input = BoqInput::new("plan.pdf", "1:100", 0.0, len);
        prop_assert!(validate_input(&input).is_err());
    }

    /// Property: untrusted input is either rejected or yields finite,
    /// non-negative quantities whose total is the sum of its parts.
    #[test]
    fn prop_untrusted_input_rejected_or_finite(
        walls_230 in untrusted_length(),
        walls_110 in untrusted_length(),
        height in untrusted_height(),
        floors in untrusted_floors(),
        prices in any::<bool>(),
    ) {
        let input = BoqInput::new("plan.pdf", "1:100", walls_230, walls_110)
            .with_wall_height(height)
            .with_floors(floors)
            .with_prices(prices);
        let c = BrickConstants::default();

        if validate_input(&input).is_ok() {
            let boq = compute(&input, &c);
            prop_assert_eq!(boq.total_bricks, boq.bricks_230mm + boq.bricks_110mm);
            for value in [
                boq.walls_230mm_area_sqm,
                boq.walls_110mm_area_sqm,
                boq.cement_bags,
                boq.sand_cubes,
            ] {
                prop_assert!(value.is_finite() && value >= 0.0);
            }
            if let Some(total) = boq.total_estimated_cost {
                prop_assert!(total.is_finite() && total >= 0.0);
            }
        }
    }

    /// Property: compute never panics, even on input validation would reject.
    #[test]
    fn prop_compute_total_on_any_finite_input(
        walls_230 in untrusted_length(),
        walls_110 in untrusted_length(),
        floors in untrusted_floors(),
    ) {
        let input = BoqInput::new("plan.pdf", "1:100", walls_230, walls_110).with_floors(floors);
        let boq = compute(&input, &BrickConstants::default());
        prop_assert_eq!(
            boq.total_bricks,
            boq.bricks_230mm.saturating_add(boq.bricks_110mm)
        );
    }
}
