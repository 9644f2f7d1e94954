//! BOQ Service - core use cases
//!
//! Plan analysis runs:
//! 1. Check the caller's tier may use the requested options
//! 2. Validate the plan file type
//! 3. Extract wall measurements (cache first)
//! 4. Validate the measurements
//! 5. Compute the Bill of Quantities
//!
//! Constants and the extractor are built once at startup and passed in.

use crate::access::authorize;
use crate::scanner::{display_name, validate_plan};
use costcorrect_domain::{compute, validate_input, BoqInput, BrickConstants};
use costcorrect_types::{BoqResult, Error, Tier, WallMeasurement};
use costcorrect_vision::{extract_with_cache, Cache, WallExtractor};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced to the user, grouped by who has to act on them
#[derive(Debug, Error)]
pub enum BoqServiceError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payment Required: {0}")]
    PaymentRequired(String),

    #[error("Vision analysis failed: {0}")]
    UpstreamFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoqServiceError {
    /// HTTP status a web front-end would map this error to
    pub fn status_code(&self) -> u16 {
        match self {
            BoqServiceError::BadRequest(_) => 400,
            BoqServiceError::PaymentRequired(_) => 402,
            BoqServiceError::UpstreamFailed(_) => 502,
            BoqServiceError::Internal(_) => 500,
        }
    }
}

impl From<Error> for BoqServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::PaymentRequired(msg) => BoqServiceError::PaymentRequired(msg),
            Error::InvalidInput { .. }
            | Error::UnsupportedFileType { .. }
            | Error::FileNotFound(_) => BoqServiceError::BadRequest(err.to_string()),
            Error::Extraction(msg) => BoqServiceError::UpstreamFailed(msg),
            Error::Http(e) => BoqServiceError::UpstreamFailed(e.to_string()),
            _ => BoqServiceError::Internal(err.to_string()),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, BoqServiceError>;

/// Options for plan analysis
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub floors: u32,
    pub estimate_prices: bool,
    /// Wall height override; `None` uses the configured default
    pub wall_height_m: Option<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            floors: 1,
            estimate_prices: false,
            wall_height_m: None,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floors = floors;
        self
    }

    pub fn with_prices(mut self, estimate_prices: bool) -> Self {
        self.estimate_prices = estimate_prices;
        self
    }

    pub fn with_wall_height(mut self, wall_height_m: Option<f64>) -> Self {
        self.wall_height_m = wall_height_m;
        self
    }

    fn apply(&self, input: BoqInput) -> BoqInput {
        let input = input
            .with_floors(self.floors)
            .with_prices(self.estimate_prices);
        match self.wall_height_m {
            Some(h) => input.with_wall_height(h),
            None => input,
        }
    }
}

/// BOQ use cases bound to one set of constants and one caller tier
pub struct BoqService {
    constants: BrickConstants,
    tier: Tier,
}

impl BoqService {
    pub fn new(constants: BrickConstants, tier: Tier) -> Self {
        Self { constants, tier }
    }

    pub fn constants(&self) -> &BrickConstants {
        &self.constants
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Compute a BOQ from known measurements
    pub fn calculate(&self, input: &BoqInput) -> ServiceResult<BoqResult> {
        authorize(self.tier, input.floors, input.estimate_prices)?;
        validate_input(input)?;
        Ok(compute(input, &self.constants))
    }

    /// Compute a BOQ from a saved vision result
    pub fn calculate_from_measurement(
        &self,
        filename: &str,
        measurement: &WallMeasurement,
        options: &AnalysisOptions,
    ) -> ServiceResult<BoqResult> {
        let input = options.apply(BoqInput::from_measurement(filename, measurement));
        self.calculate(&input)
    }

    /// Analyze a plan file end to end
    pub fn analyze_plan(
        &self,
        plan: &Path,
        extractor: &dyn WallExtractor,
        cache: Option<&Cache>,
        options: &AnalysisOptions,
    ) -> ServiceResult<BoqResult> {
        authorize(self.tier, options.floors, options.estimate_prices)?;
        validate_plan(plan)?;

        let measurement = extract_with_cache(extractor, cache, plan)
            .map_err(|e| match e {
                Error::Extraction(_) | Error::Http(_) => BoqServiceError::from(e),
                other => BoqServiceError::UpstreamFailed(other.to_string()),
            })?;

        info!(
            plan = %plan.display(),
            scale = %measurement.scale,
            walls_230mm = measurement.walls_230mm_linear_m,
            walls_110mm = measurement.walls_110mm_linear_m,
            "walls extracted"
        );

        let boq = self.calculate_from_measurement(&display_name(plan), &measurement, options);
        if let Err(ref e) = boq {
            warn!(error = %e, "extracted measurements rejected");
        }
        boq
    }
}
