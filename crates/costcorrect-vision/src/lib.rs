//! Vision module - AI-powered floor plan analysis
//!
//! This module provides:
//! - The `WallExtractor` seam the application calls to measure a plan
//! - A Gemini REST backend
//! - Robust parsing of the model's JSON reply
//! - Result caching keyed by file content

pub mod ai;
pub mod cache;

pub use ai::gemini::GeminiExtractor;
pub use ai::prompts::build_plan_prompt;
pub use cache::Cache;

use costcorrect_types::{Error, Result, WallMeasurement};
use std::path::Path;
use tracing::{debug, warn};

/// Anything that can turn a plan file into wall measurements
pub trait WallExtractor: Send + Sync {
    /// Measure the walls drawn in `plan`
    fn extract(&self, plan: &Path) -> Result<WallMeasurement>;

    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Identifies whose answers a cache entry holds; include the model
    /// when the backend has more than one
    fn cache_tag(&self) -> String {
        self.name().to_string()
    }
}

/// Vision configuration resolved from the application config
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub backend: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            backend: "gemini".to_string(),
            model: None,
            api_key: None,
        }
    }
}

impl VisionConfig {
    pub fn with_backend(mut self, backend: &str) -> Self {
        self.backend = backend.to_lowercase();
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Construct the configured extractor
    pub fn build_extractor(&self) -> Result<Box<dyn WallExtractor>> {
        match self.backend.as_str() {
            "gemini" => {
                let key = self.api_key.clone().unwrap_or_default();
                Ok(Box::new(GeminiExtractor::new(key, self.model.clone())?))
            }
            other => Err(Error::Extraction(format!(
                "Unknown vision backend '{}'. Supported: gemini",
                other
            ))),
        }
    }
}

/// Extract measurements, consulting the cache first when one is given
pub fn extract_with_cache(
    extractor: &dyn WallExtractor,
    cache: Option<&Cache>,
    plan: &Path,
) -> Result<WallMeasurement> {
    let tag = extractor.cache_tag();

    if let Some(cache) = cache {
        match cache.get(plan, &tag) {
            Ok(Some(cached)) => {
                debug!(plan = %plan.display(), "using cached measurement");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "cache lookup failed, analysing anyway"),
        }
    }

    debug!(backend = extractor.name(), plan = %plan.display(), "extracting walls");
    let measurement = extractor.extract(plan)?;

    if let Some(cache) = cache {
        if let Err(e) = cache.set(plan, &tag, &measurement) {
            warn!(error = %e, "failed to cache measurement");
        }
    }

    Ok(measurement)
}

/// Parse the model's reply into a measurement.
///
/// Tries, in order: the reply as-is (fences stripped), the outermost
/// `{...}` block, then the same block with trailing commas removed.
pub fn parse_measurement(response: &str) -> Result<WallMeasurement> {
    let stripped = strip_code_fence(response);

    let first_error = match serde_json::from_str::<WallMeasurement>(&stripped) {
        Ok(m) => return Ok(m),
        Err(e) => e,
    };

    let block = extract_json_from_response(&stripped);
    if let Ok(m) = serde_json::from_str::<WallMeasurement>(&block) {
        return Ok(m);
    }

    serde_json::from_str::<WallMeasurement>(&remove_trailing_commas(&block)).map_err(|_| {
        let truncated: String = response.chars().take(500).collect();
        Error::Extraction(format!(
            "could not parse model response: {} | raw: {}",
            first_error, truncated
        ))
    })
}

/// Remove a surrounding markdown code fence, if any
fn strip_code_fence(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        let body = response
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or("");
        let body = match body.rfind("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim().to_string();
    }

    response.to_string()
}

/// Extract the outermost JSON object from a response
pub fn extract_json_from_response(response: &str) -> String {
    let response = strip_code_fence(response);

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response
}

/// Drop commas that directly precede a closing `}` or `]`, outside strings
fn remove_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}
