//! Input record for a single BOQ calculation

use costcorrect_types::WallMeasurement;
use serde::{Deserialize, Serialize};

/// Wall measurements plus the caller's options for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqInput {
    /// Name of the plan the measurements came from, echoed in the result
    pub filename: String,
    pub scale: String,
    pub walls_230mm_linear_m: f64,
    pub walls_110mm_linear_m: f64,
    /// Floor-to-ceiling height; `None` uses the configured default
    pub wall_height_m: Option<f64>,
    /// Number of storeys with the same wall layout
    pub floors: u32,
    pub estimate_prices: bool,
    pub confidence_note: Option<String>,
}

impl BoqInput {
    pub fn new(
        filename: impl Into<String>,
        scale: impl Into<String>,
        walls_230mm_linear_m: f64,
        walls_110mm_linear_m: f64,
    ) -> Self {
        Self {
            filename: filename.into(),
            scale: scale.into(),
            walls_230mm_linear_m,
            walls_110mm_linear_m,
            wall_height_m: None,
            floors: 1,
            estimate_prices: false,
            confidence_note: None,
        }
    }

    /// Build an input from a vision extraction result
    pub fn from_measurement(filename: impl Into<String>, measurement: &WallMeasurement) -> Self {
        let mut input = Self::new(
            filename,
            measurement.scale.clone(),
            measurement.walls_230mm_linear_m,
            measurement.walls_110mm_linear_m,
        );
        input.confidence_note = measurement.confidence_note.clone();
        input
    }

    pub fn with_wall_height(mut self, wall_height_m: f64) -> Self {
        self.wall_height_m = Some(wall_height_m);
        self
    }

    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floors = floors;
        self
    }

    pub fn with_prices(mut self, estimate_prices: bool) -> Self {
        self.estimate_prices = estimate_prices;
        self
    }

    pub fn with_confidence_note(mut self, note: impl Into<String>) -> Self {
        self.confidence_note = Some(note.into());
        self
    }
}
