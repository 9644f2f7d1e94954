//! Core types for Bill of Quantities estimation

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a length that the model may emit as a number, a numeric
/// string ("12.5"), or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .trim_end_matches('m')
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
    }
}

fn default_scale() -> String {
    "unknown".to_string()
}

/// Raw measurements extracted from a floor plan by the vision model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallMeasurement {
    /// Drawing scale as read from the plan (e.g. "1:100")
    #[serde(default = "default_scale")]
    pub scale: String,

    /// Total linear meters of 230 mm (double skin) walls
    #[serde(default, deserialize_with = "lenient_f64")]
    pub walls_230mm_linear_m: f64,

    /// Total linear meters of 110 mm (single skin) walls
    #[serde(default, deserialize_with = "lenient_f64")]
    pub walls_110mm_linear_m: f64,

    /// Caveats reported alongside the measurement
    #[serde(default)]
    pub confidence_note: Option<String>,
}

impl Default for WallMeasurement {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            walls_230mm_linear_m: 0.0,
            walls_110mm_linear_m: 0.0,
            confidence_note: None,
        }
    }
}

/// A single line item in the Bill of Quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    /// Present only when cost estimation was requested; serialized as null otherwise
    #[serde(default)]
    pub estimated_cost: Option<f64>,
}

/// Full Bill of Quantities returned to the caller.
///
/// Field order is the wire contract consumed by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqResult {
    pub filename: String,
    pub scale: String,
    pub wall_height_m: f64,

    pub walls_230mm_linear_m: f64,
    pub walls_110mm_linear_m: f64,
    pub walls_230mm_area_sqm: f64,
    pub walls_110mm_area_sqm: f64,

    pub bricks_230mm: u64,
    pub bricks_110mm: u64,
    pub total_bricks: u64,

    pub cement_bags: f64,
    pub sand_cubes: f64,

    pub wastage_percent: f64,

    /// Always four lines: 230 mm bricks, 110 mm bricks, cement, sand
    pub materials: Vec<MaterialLine>,

    #[serde(default)]
    pub total_estimated_cost: Option<f64>,

    #[serde(default)]
    pub confidence_note: Option<String>,
}

impl BoqResult {
    /// Sum of the line costs that are present
    pub fn material_cost_total(&self) -> Option<f64> {
        let costs: Vec<f64> = self
            .materials
            .iter()
            .filter_map(|m| m.estimated_cost)
            .collect();
        if costs.is_empty() {
            None
        } else {
            Some(costs.iter().sum())
        }
    }

    pub fn has_costs(&self) -> bool {
        self.total_estimated_cost.is_some()
    }
}

/// Subscription tier of the requesting user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    /// Parse a tier label. Anything unrecognised is treated as free.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "pro" => Tier::Pro,
            _ => Tier::Free,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
