//! Gemini `generateContent` backend
//!
//! The plan file is sent as inline base64 data. PDFs go through as-is;
//! Gemini reads the first pages itself, so no rasterisation happens here.

use crate::ai::prompts::build_plan_prompt;
use crate::{parse_measurement, WallExtractor};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use costcorrect_types::{ConfigError, Error, Result, WallMeasurement};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const TEMPERATURE: f64 = 0.1;
const MAX_OUTPUT_TOKENS: u32 = 2048;

/// MIME type Gemini expects for a plan file
pub fn mime_type_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok("application/pdf"),
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        _ => Err(Error::UnsupportedFileType {
            extension: format!(".{}", ext),
            allowed: ".pdf, .png, .jpg, .jpeg".to_string(),
        }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Wall extractor backed by the Gemini REST API
pub struct GeminiExtractor {
    api_key: String,
    model: String,
    api_base_url: String,
    http_client: reqwest::blocking::Client,
}

impl GeminiExtractor {
    /// Create an extractor against the public Gemini endpoint
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Result<Self> {
        Self::new_with_api_base_url(api_key, model, DEFAULT_API_BASE_URL)
    }

    pub fn new_with_api_base_url(
        api_key: impl Into<String>,
        model: Option<String>,
        api_base_url: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config(ConfigError::InvalidValue {
                field: "api_key".to_string(),
                reason: "must not be empty (set GOOGLE_API_KEY)".to_string(),
            }));
        }

        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model)
    }

    fn build_request(plan: &Path) -> Result<GenerateContentRequest> {
        let mime_type = mime_type_for(plan)?;
        let bytes = std::fs::read(plan)?;

        Ok(GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(build_plan_prompt()),
                        ..Default::default()
                    },
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: STANDARD.encode(bytes),
                        }),
                        ..Default::default()
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json".to_string(),
            },
        })
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(response: GenerateContentResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::Extraction("Gemini returned no text".to_string()));
    }
    Ok(text)
}

impl WallExtractor for GeminiExtractor {
    fn extract(&self, plan: &Path) -> Result<WallMeasurement> {
        let request = Self::build_request(plan)?;

        info!(plan = %plan.display(), model = %self.model, "sending plan to Gemini");
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let truncated: String = body.chars().take(500).collect();
            return Err(Error::Extraction(format!(
                "Gemini returned {}: {}",
                status, truncated
            )));
        }

        let text = response_text(response.json()?)?;
        debug!(chars = text.len(), "Gemini response received");
        parse_measurement(&text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn cache_tag(&self) -> String {
        format!("gemini:{}", self.model)
    }
}
