//! South African brickwork constants
//!
//! Standard brick: 222 x 106 x 73 mm.
//! - Single skin (110 mm): ~52 bricks/m²
//! - Double skin (230 mm): ~104 bricks/m²
//! - Cement 1:4 mix: ~7 bags (50 kg) per 1 000 bricks
//! - Sand: ~0.5 m³ per 1 000 bricks
//!
//! Values are set once at startup (defaults, then a TOML file, then
//! `COSTCORRECT_*` environment variables) and never change afterwards.

use crate::service::boq_calculator::MAX_WALL_HEIGHT_M;
use costcorrect_types::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Prefix for environment overrides, e.g. `COSTCORRECT_WASTAGE_FACTOR`
pub const ENV_PREFIX: &str = "COSTCORRECT_";

/// Physical and economic constants used by the BOQ calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickConstants {
    /// Bricks per m² of 110 mm single-skin wall
    pub bricks_per_sqm_single: f64,
    /// Bricks per m² of 230 mm double-skin wall
    pub bricks_per_sqm_double: f64,
    /// Fractional overage applied to every quantity (0.10 = +10 %)
    pub wastage_factor: f64,
    /// Floor-to-ceiling height used when none is supplied
    pub default_wall_height_m: f64,
    pub cement_bags_per_1000_bricks: f64,
    pub sand_cubes_per_1000_bricks: f64,
    /// Unit prices in ZAR
    pub price_brick: f64,
    pub price_cement_bag: f64,
    pub price_sand_cube: f64,
}

impl Default for BrickConstants {
    fn default() -> Self {
        Self {
            bricks_per_sqm_single: 52.0,
            bricks_per_sqm_double: 104.0,
            wastage_factor: 0.10,
            default_wall_height_m: 2.7,
            cement_bags_per_1000_bricks: 7.0,
            sand_cubes_per_1000_bricks: 0.5,
            price_brick: 1.85,
            price_cement_bag: 105.0,
            price_sand_cube: 450.0,
        }
    }
}

impl BrickConstants {
    /// Load constants from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read constants file {}: {}",
                path.display(),
                e
            )))
        })?;

        Self::from_toml_str(&content)
    }

    /// Load constants from a flat TOML table. Missing keys keep their defaults.
    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse constants TOML: {}",
                e
            )))
        })
    }

    /// Mutable access to every field by its snake_case name
    fn fields_mut(&mut self) -> [(&'static str, &mut f64); 9] {
        [
            ("bricks_per_sqm_single", &mut self.bricks_per_sqm_single),
            ("bricks_per_sqm_double", &mut self.bricks_per_sqm_double),
            ("wastage_factor", &mut self.wastage_factor),
            ("default_wall_height_m", &mut self.default_wall_height_m),
            ("cement_bags_per_1000_bricks", &mut self.cement_bags_per_1000_bricks),
            ("sand_cubes_per_1000_bricks", &mut self.sand_cubes_per_1000_bricks),
            ("price_brick", &mut self.price_brick),
            ("price_cement_bag", &mut self.price_cement_bag),
            ("price_sand_cube", &mut self.price_sand_cube),
        ]
    }

    /// Override fields from `COSTCORRECT_<FIELD>` variables.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    /// Returns the names of the fields that were overridden.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<Vec<&'static str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();

        for (name, slot) in self.fields_mut() {
            let var = format!("{}{}", ENV_PREFIX, name.to_uppercase());
            let Some(raw) = lookup(&var) else {
                continue;
            };
            let value = raw.trim().parse::<f64>().map_err(|_| {
                Error::Config(ConfigError::InvalidValue {
                    field: var.clone(),
                    reason: format!("'{}' is not a number", raw),
                })
            })?;
            *slot = value;
            applied.push(name);
        }

        Ok(applied)
    }

    /// Reject constants that would make a calculation meaningless
    pub fn validate(&self) -> Result<()> {
        let strictly_positive = [
            ("bricks_per_sqm_single", self.bricks_per_sqm_single),
            ("bricks_per_sqm_double", self.bricks_per_sqm_double),
            ("default_wall_height_m", self.default_wall_height_m),
            ("cement_bags_per_1000_bricks", self.cement_bags_per_1000_bricks),
            ("sand_cubes_per_1000_bricks", self.sand_cubes_per_1000_bricks),
        ];
        for (field, value) in strictly_positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, value, "must be a positive number"));
            }
        }

        let non_negative = [
            ("wastage_factor", self.wastage_factor),
            ("price_brick", self.price_brick),
            ("price_cement_bag", self.price_cement_bag),
            ("price_sand_cube", self.price_sand_cube),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, value, "must be zero or greater"));
            }
        }

        if self.default_wall_height_m > MAX_WALL_HEIGHT_M {
            return Err(invalid(
                "default_wall_height_m",
                self.default_wall_height_m,
                &format!("must be at most {} m", MAX_WALL_HEIGHT_M),
            ));
        }

        Ok(())
    }

    /// Multiplier applied for wastage, e.g. 1.10
    pub fn wastage_multiplier(&self) -> f64 {
        1.0 + self.wastage_factor
    }

    pub fn wastage_percent(&self) -> f64 {
        self.wastage_factor * 100.0
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> Error {
    Error::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("{} (got {})", reason, value),
    })
}

impl std::fmt::Display for BrickConstants {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Brick Constants")?;
        writeln!(f, "===============")?;
        writeln!(f)?;
        writeln!(f, "Bricks/m² (110 mm):      {}", self.bricks_per_sqm_single)?;
        writeln!(f, "Bricks/m² (230 mm):      {}", self.bricks_per_sqm_double)?;
        writeln!(f, "Wastage:                 {:.0}%", self.wastage_percent())?;
        writeln!(f, "Default wall height:     {} m", self.default_wall_height_m)?;
        writeln!(f, "Cement bags/1000 bricks: {}", self.cement_bags_per_1000_bricks)?;
        writeln!(f, "Sand m³/1000 bricks:     {}", self.sand_cubes_per_1000_bricks)?;
        writeln!(f, "Price per brick:         R {:.2}", self.price_brick)?;
        writeln!(f, "Price per cement bag:    R {:.2}", self.price_cement_bag)?;
        write!(f, "Price per sand m³:       R {:.2}", self.price_sand_cube)
    }
}
