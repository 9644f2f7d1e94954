//! Bill of Quantities calculation
//!
//! Pure, side-effect free. The same input and constants always produce the
//! same result, so it is safe to call from any number of threads.
//!
//! # Formula
//! - area = linear meters x wall height x floors
//! - bricks = ceil(area x bricks/m² x (1 + wastage))
//! - cement = round((total bricks / 1000) x bags/1000 x (1 + wastage), 1)
//! - sand = round((total bricks / 1000) x m³/1000 x (1 + wastage), 2)

use crate::model::{BoqInput, BrickConstants};
use costcorrect_types::{BoqResult, Error, MaterialLine, Result};

/// The four fixed lines of the materials table, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Bricks230mm,
    Bricks110mm,
    Cement,
    Sand,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 4] = [
        MaterialKind::Bricks230mm,
        MaterialKind::Bricks110mm,
        MaterialKind::Cement,
        MaterialKind::Sand,
    ];

    pub fn item(&self) -> &'static str {
        match self {
            MaterialKind::Bricks230mm => "Bricks — 230 mm double skin",
            MaterialKind::Bricks110mm => "Bricks — 110 mm single skin",
            MaterialKind::Cement => "Cement (50 kg bags)",
            MaterialKind::Sand => "Building sand",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MaterialKind::Bricks230mm | MaterialKind::Bricks110mm => "bricks",
            MaterialKind::Cement => "bags",
            MaterialKind::Sand => "m³",
        }
    }

    pub fn unit_price(&self, constants: &BrickConstants) -> f64 {
        match self {
            MaterialKind::Bricks230mm | MaterialKind::Bricks110mm => constants.price_brick,
            MaterialKind::Cement => constants.price_cement_bag,
            MaterialKind::Sand => constants.price_sand_cube,
        }
    }
}

/// Longest run of one wall type accepted, in meters
pub const MAX_LINEAR_M: f64 = 100_000.0;

/// Tallest wall accepted, in meters
pub const MAX_WALL_HEIGHT_M: f64 = 100.0;

pub const MAX_FLOORS: u32 = 200;

/// Round half away from zero to `decimals` places.
///
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Reject input outside the calculator's domain.
///
/// Lengths must be finite, non-negative and at most [`MAX_LINEAR_M`]; the
/// height (when given) positive and at most [`MAX_WALL_HEIGHT_M`]; floors
/// between 1 and [`MAX_FLOORS`]. Inside these bounds wall area stays under
/// 2e9 m² and every count fits comfortably in a `u64`.
pub fn validate_input(input: &BoqInput) -> Result<()> {
    for (field, value) in [
        ("walls_230mm_linear_m", input.walls_230mm_linear_m),
        ("walls_110mm_linear_m", input.walls_110mm_linear_m),
    ] {
        if !value.is_finite() {
            return Err(Error::invalid_input(field, "must be a finite number"));
        }
        if value < 0.0 {
            return Err(Error::invalid_input(
                field,
                format!("must not be negative (got {})", value),
            ));
        }
        if value > MAX_LINEAR_M {
            return Err(Error::invalid_input(
                field,
                format!("must be at most {} m (got {})", MAX_LINEAR_M, value),
            ));
        }
    }

    if let Some(height) = input.wall_height_m {
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::invalid_input(
                "wall_height_m",
                format!("must be a positive number (got {})", height),
            ));
        }
        if height > MAX_WALL_HEIGHT_M {
            return Err(Error::invalid_input(
                "wall_height_m",
                format!("must be at most {} m (got {})", MAX_WALL_HEIGHT_M, height),
            ));
        }
    }

    if input.floors == 0 {
        return Err(Error::invalid_input("floors", "must be at least 1"));
    }
    if input.floors > MAX_FLOORS {
        return Err(Error::invalid_input(
            "floors",
            format!("must be at most {} (got {})", MAX_FLOORS, input.floors),
        ));
    }

    Ok(())
}

/// Ceiling to a whole brick count. Out-of-domain values saturate: negative
/// and NaN to zero, anything past `u64::MAX` to `u64::MAX`.
fn whole_bricks(raw: f64) -> u64 {
    raw.ceil() as u64
}

/// Compute the full Bill of Quantities.
///
/// Callers are expected to run [`validate_input`] first; this function is
/// total and never fails.
pub fn compute(input: &BoqInput, constants: &BrickConstants) -> BoqResult {
    let wall_height_m = input
        .wall_height_m
        .unwrap_or(constants.default_wall_height_m);
    let floors = input.floors as f64;
    let wastage = constants.wastage_multiplier();

    // Wall areas
    let area_230 = input.walls_230mm_linear_m * wall_height_m * floors;
    let area_110 = input.walls_110mm_linear_m * wall_height_m * floors;

    // Brick counts before wastage
    let bricks_230_raw = area_230 * constants.bricks_per_sqm_double;
    let bricks_110_raw = area_110 * constants.bricks_per_sqm_single;

    let bricks_230 = whole_bricks(bricks_230_raw * wastage);
    let bricks_110 = whole_bricks(bricks_110_raw * wastage);
    let total_bricks = bricks_230.saturating_add(bricks_110);

    let thousands = total_bricks as f64 / 1000.0;

    let cement_bags_raw = thousands * constants.cement_bags_per_1000_bricks;
    let cement_bags = round_to(cement_bags_raw * wastage, 1);

    let sand_cubes_raw = thousands * constants.sand_cubes_per_1000_bricks;
    let sand_cubes = round_to(sand_cubes_raw * wastage, 2);

    let materials: Vec<MaterialLine> = MaterialKind::ALL
        .iter()
        .map(|kind| {
            let quantity = match kind {
                MaterialKind::Bricks230mm => bricks_230 as f64,
                MaterialKind::Bricks110mm => bricks_110 as f64,
                MaterialKind::Cement => cement_bags,
                MaterialKind::Sand => sand_cubes,
            };
            MaterialLine {
                item: kind.item().to_string(),
                quantity,
                unit: kind.unit().to_string(),
                estimated_cost: input
                    .estimate_prices
                    .then(|| quantity * kind.unit_price(constants)),
            }
        })
        .collect();

    let total_estimated_cost = input.estimate_prices.then(|| {
        materials
            .iter()
            .filter_map(|m| m.estimated_cost)
            .sum::<f64>()
    });

    BoqResult {
        filename: input.filename.clone(),
        scale: input.scale.clone(),
        wall_height_m,
        walls_230mm_linear_m: round_to(input.walls_230mm_linear_m, 2),
        walls_110mm_linear_m: round_to(input.walls_110mm_linear_m, 2),
        walls_230mm_area_sqm: round_to(area_230, 2),
        walls_110mm_area_sqm: round_to(area_110, 2),
        bricks_230mm: bricks_230,
        bricks_110mm: bricks_110,
        total_bricks,
        cement_bags,
        sand_cubes,
        wastage_percent: constants.wastage_percent(),
        materials,
        total_estimated_cost,
        confidence_note: input.confidence_note.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> BrickConstants {
        BrickConstants::default()
    }

    fn input(walls_230: f64, walls_110: f64) -> BoqInput {
        BoqInput::new("test.pdf", "1:100", walls_230, walls_110).with_wall_height(2.7)
    }

    // ==========================================
    // Brick counts
    // ==========================================

    #[test]
    fn test_double_skin_only() {
        // 10m x 2.7m = 27m², 27 x 104 = 2808, ceil(2808 x 1.10) = 3089
        let boq = compute(&input(10.0, 0.0), &constants());

        assert_eq!(boq.bricks_230mm, 3089);
        assert_eq!(boq.bricks_110mm, 0);
        assert_eq!(boq.total_bricks, 3089);
        assert_eq!(boq.walls_230mm_area_sqm, 27.0);
        assert_eq!(boq.walls_110mm_area_sqm, 0.0);
        assert_eq!(boq.wastage_percent, 10.0);
    }

    #[test]
    fn test_single_skin_only() {
        // 15m x 2.7m = 40.5m², 40.5 x 52 = 2106, ceil(2106 x 1.10) = 2317
        let boq = compute(&input(0.0, 15.0), &constants());

        assert_eq!(boq.bricks_110mm, 2317);
        assert_eq!(boq.bricks_230mm, 0);
        assert_eq!(boq.total_bricks, 2317);
        assert_eq!(boq.walls_110mm_area_sqm, 40.5);
    }

    #[test]
    fn test_mixed_walls() {
        let boq = compute(&input(20.0, 10.0), &constants());

        let b230 = (20.0 * 2.7 * 104.0 * 1.10_f64).ceil() as u64;
        let b110 = (10.0 * 2.7 * 52.0 * 1.10_f64).ceil() as u64;

        assert_eq!(boq.bricks_230mm, b230);
        assert_eq!(boq.bricks_110mm, b110);
        assert_eq!(boq.bricks_230mm, 6178);
        assert_eq!(boq.bricks_110mm, 1545);
        assert_eq!(boq.total_bricks, 7723);
    }

    // ==========================================
    // Cement and sand
    // ==========================================

    #[test]
    fn test_cement_and_sand_include_wastage() {
        let boq = compute(&input(10.0, 5.0), &constants());

        let total = boq.total_bricks as f64;
        let cement_expected = round_to((total / 1000.0) * 7.0 * 1.10, 1);
        let sand_expected = round_to((total / 1000.0) * 0.5 * 1.10, 2);

        assert_eq!(boq.total_bricks, 3862);
        assert_eq!(boq.cement_bags, cement_expected);
        assert_eq!(boq.sand_cubes, sand_expected);
        assert_eq!(boq.cement_bags, 29.7);
        assert_eq!(boq.sand_cubes, 2.12);
    }

    #[test]
    fn test_cement_rounds_to_one_decimal() {
        // 3089 bricks -> 3.089 x 7 x 1.1 = 23.7853 -> 23.8
        let boq = compute(&input(10.0, 0.0), &constants());
        assert_eq!(boq.cement_bags, 23.8);
        // 3.089 x 0.5 x 1.1 = 1.69895 -> 1.70
        assert_eq!(boq.sand_cubes, 1.7);
    }

    // ==========================================
    // Materials table
    // ==========================================

    #[test]
    fn test_materials_table_has_four_lines_in_order() {
        let boq = compute(
            &BoqInput::new("test.pdf", "1:100", 5.0, 5.0),
            &constants(),
        );
        let items: Vec<&str> = boq.materials.iter().map(|m| m.item.as_str()).collect();
        assert_eq!(
            items,
            vec![
                "Bricks — 230 mm double skin",
                "Bricks — 110 mm single skin",
                "Cement (50 kg bags)",
                "Building sand",
            ]
        );
        let units: Vec<&str> = boq.materials.iter().map(|m| m.unit.as_str()).collect();
        assert_eq!(units, vec!["bricks", "bricks", "bags", "m³"]);
    }

    #[test]
    fn test_material_quantities_match_summary() {
        let boq = compute(&input(20.0, 10.0), &constants());
        assert_eq!(boq.materials[0].quantity, boq.bricks_230mm as f64);
        assert_eq!(boq.materials[1].quantity, boq.bricks_110mm as f64);
        assert_eq!(boq.materials[2].quantity, boq.cement_bags);
        assert_eq!(boq.materials[3].quantity, boq.sand_cubes);
    }

    // ==========================================
    // Cost estimation
    // ==========================================

    #[test]
    fn test_no_prices_by_default() {
        let boq = compute(&input(20.0, 10.0), &constants());
        assert!(boq.materials.iter().all(|m| m.estimated_cost.is_none()));
        assert!(boq.total_estimated_cost.is_none());
        assert!(!boq.has_costs());
    }

    #[test]
    fn test_prices_when_requested() {
        let c = constants();
        let boq = compute(&input(20.0, 10.0).with_prices(true), &c);

        for line in &boq.materials {
            assert!(line.estimated_cost.is_some());
        }
        assert!((boq.materials[0].estimated_cost.unwrap() - 6178.0 * c.price_brick).abs() < 1e-9);
        assert!((boq.materials[1].estimated_cost.unwrap() - 1545.0 * c.price_brick).abs() < 1e-9);
        assert!((boq.materials[2].estimated_cost.unwrap() - 59.5 * c.price_cement_bag).abs() < 1e-9);
        assert!((boq.materials[3].estimated_cost.unwrap() - 4.25 * c.price_sand_cube).abs() < 1e-9);

        let sum: f64 = boq.materials.iter().filter_map(|m| m.estimated_cost).sum();
        let total = boq.total_estimated_cost.unwrap();
        assert!((total - sum).abs() < 1e-9);
        assert_eq!(boq.material_cost_total(), Some(total));
        // 11429.30 + 2858.25 + 6247.50 + 1912.50
        assert!((total - 22447.55).abs() < 1e-6);
    }

    #[test]
    fn test_zero_prices_still_present() {
        let c = BrickConstants {
            price_brick: 0.0,
            ..BrickConstants::default()
        };
        let boq = compute(&input(1.0, 1.0).with_prices(true), &c);
        assert_eq!(boq.materials[0].estimated_cost, Some(0.0));
        assert!(boq.total_estimated_cost.is_some());
    }

    // ==========================================
    // Height, floors, and echoed values
    // ==========================================

    #[test]
    fn test_default_wall_height_from_constants() {
        let boq = compute(&BoqInput::new("a.png", "1:100", 10.0, 0.0), &constants());
        assert_eq!(boq.wall_height_m, 2.7);
        assert_eq!(boq.bricks_230mm, 3089);

        let tall = BrickConstants {
            default_wall_height_m: 3.0,
            ..BrickConstants::default()
        };
        let boq = compute(&BoqInput::new("a.png", "1:100", 10.0, 0.0), &tall);
        assert_eq!(boq.wall_height_m, 3.0);
        assert_eq!(boq.walls_230mm_area_sqm, 30.0);
        assert_eq!(boq.bricks_230mm, 3433);
    }

    #[test]
    fn test_floors_multiply_area() {
        let single = compute(&input(20.0, 10.0), &constants());
        let double = compute(&input(20.0, 10.0).with_floors(2), &constants());

        assert_eq!(double.walls_230mm_area_sqm, 2.0 * single.walls_230mm_area_sqm);
        assert_eq!(double.walls_110mm_area_sqm, 2.0 * single.walls_110mm_area_sqm);
        assert_eq!(double.bricks_230mm, 12356);
        assert_eq!(double.bricks_110mm, 3089);
        assert_eq!(double.total_bricks, 15445);
        assert_eq!(double.cement_bags, 118.9);
        assert_eq!(double.sand_cubes, 8.49);
    }

    #[test]
    fn test_echoed_values_are_rounded() {
        let boq = compute(&input(12.345, 6.789), &constants());
        assert_eq!(boq.walls_230mm_linear_m, 12.35);
        assert_eq!(boq.walls_110mm_linear_m, 6.79);
        assert_eq!(boq.walls_230mm_area_sqm, 33.33);
        assert_eq!(boq.walls_110mm_area_sqm, 18.33);
        assert_eq!(boq.bricks_230mm, 3814);
        assert_eq!(boq.bricks_110mm, 1049);
    }

    #[test]
    fn test_filename_scale_and_note_echoed() {
        let boq = compute(
            &input(1.0, 1.0).with_confidence_note("Dimensions inferred from door widths"),
            &constants(),
        );
        assert_eq!(boq.filename, "test.pdf");
        assert_eq!(boq.scale, "1:100");
        assert_eq!(
            boq.confidence_note.as_deref(),
            Some("Dimensions inferred from door widths")
        );
    }

    // ==========================================
    // Edge cases
    // ==========================================

    #[test]
    fn test_zero_walls() {
        let boq = compute(&BoqInput::new("empty.pdf", "1:100", 0.0, 0.0), &constants());
        assert_eq!(boq.total_bricks, 0);
        assert_eq!(boq.cement_bags, 0.0);
        assert_eq!(boq.sand_cubes, 0.0);
        assert_eq!(boq.materials.len(), 4);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let i = input(48.6, 22.3).with_floors(3).with_prices(true);
        assert_eq!(compute(&i, &constants()), compute(&i, &constants()));
    }

    #[test]
    fn test_negative_length_saturates_to_zero_bricks() {
        // Out of domain; compute must still not panic
        let boq = compute(&input(-5.0, 0.0), &constants());
        assert_eq!(boq.bricks_230mm, 0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(23.7853, 1), 23.8);
        assert_eq!(round_to(1.27435, 2), 1.27);
        assert_eq!(round_to(0.25, 1), 0.3);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_round_to_huge_value_unchanged() {
        assert_eq!(round_to(1e307, 2), 1e307);
    }

    #[test]
    fn test_huge_lengths_saturate_instead_of_overflowing() {
        // Out of domain; the total saturates rather than wrapping
        let boq = compute(&BoqInput::new("p.pdf", "1:100", 1e17, 1e17), &constants());
        assert_eq!(boq.bricks_230mm, u64::MAX);
        assert_eq!(boq.total_bricks, u64::MAX);
        assert!(boq.cement_bags.is_finite());
    }

    #[test]
    fn test_huge_length_keeps_area_finite() {
        let boq = compute(&BoqInput::new("p.pdf", "1:100", 1e307, 0.0), &constants());
        assert!(boq.walls_230mm_area_sqm.is_finite());
        assert_eq!(boq.bricks_230mm, u64::MAX);
        assert_eq!(boq.bricks_110mm, 0);
    }

    // ==========================================
    // Validation
    // ==========================================

    #[test]
    fn test_validate_accepts_normal_input() {
        assert!(validate_input(&input(10.0, 5.0)).is_ok());
        assert!(validate_input(&BoqInput::new("a", "b", 0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_length() {
        let err = validate_input(&input(-1.0, 5.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "walls_230mm_linear_m"));
    }

    #[test]
    fn test_validate_rejects_non_finite_length() {
        assert!(validate_input(&input(0.0, f64::NAN)).is_err());
        assert!(validate_input(&input(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_height() {
        assert!(validate_input(&input(1.0, 1.0).with_wall_height(0.0)).is_err());
        assert!(validate_input(&input(1.0, 1.0).with_wall_height(-2.7)).is_err());
        assert!(validate_input(&input(1.0, 1.0).with_wall_height(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_rejects_lengths_past_ceiling() {
        let err = validate_input(&BoqInput::new("p.pdf", "1:100", 1e17, 1e17)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "walls_230mm_linear_m"));
        assert!(validate_input(&input(0.0, 1e307)).is_err());
        assert!(validate_input(&input(MAX_LINEAR_M, MAX_LINEAR_M)).is_ok());
    }

    #[test]
    fn test_validate_rejects_height_and_floors_past_ceiling() {
        assert!(validate_input(&input(1.0, 1.0).with_wall_height(MAX_WALL_HEIGHT_M + 1.0)).is_err());
        assert!(validate_input(&input(1.0, 1.0).with_floors(MAX_FLOORS + 1)).is_err());
        assert!(validate_input(&input(1.0, 1.0).with_floors(MAX_FLOORS)).is_ok());
    }

    #[test]
    fn test_largest_valid_input_stays_finite() {
        let i = BoqInput::new("p.pdf", "1:100", MAX_LINEAR_M, MAX_LINEAR_M)
            .with_wall_height(MAX_WALL_HEIGHT_M)
            .with_floors(MAX_FLOORS)
            .with_prices(true);
        assert!(validate_input(&i).is_ok());

        let boq = compute(&i, &constants());
        assert_eq!(boq.total_bricks, boq.bricks_230mm + boq.bricks_110mm);
        assert!(boq.total_bricks < u64::MAX / 1000);
        assert!(boq.walls_230mm_area_sqm.is_finite());
        assert!(boq.total_estimated_cost.unwrap().is_finite());
    }

    #[test]
    fn test_validate_rejects_zero_floors() {
        let err = validate_input(&input(1.0, 1.0).with_floors(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "floors"));
    }
}
