//! Vision module - AI-powered image analysis for cleanable surface estimation

pub mod ai;

// Re-export main types for convenience
pub use ai::backend::{BackendError, VisionBackend};
pub use ai::openai::{OpenAiBackend, OpenAiSettings};
pub use ai::prompts::{build_estimation_prompt, SYSTEM_PROMPT};

use serde_json::Value;
use tracing::{info, warn};
use washquote_domain::{clamp_complexity, smart_estimate, SmartEstimatorTable};
use washquote_types::{EstimationMethod, ImagePayload, ServiceType, SurfaceEstimate};

/// Complexity used when the model does not report one
pub const DEFAULT_COMPLEXITY: f64 = 2.5;

/// Notes used when the model does not report any
pub const DEFAULT_AI_NOTES: &str = "Estimate generated from the provided photos.";

/// Fields read from the model's JSON answer.
///
/// `None` means the field was missing, null, non-numeric or non-finite. A
/// reported complexity of `0` is not on the scale and counts as unreported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedEstimate {
    pub area_sqft: Option<f64>,
    pub complexity: Option<f64>,
    pub notes: Option<String>,
}

impl ParsedEstimate {
    /// Names of the fields that will fall back to defaults
    pub fn defaulted_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.area_sqft.is_none() {
            fields.push("area_sqft");
        }
        if self.reported_complexity().is_none() {
            fields.push("complexity");
        }
        if self.notes.is_none() {
            fields.push("notes");
        }
        fields
    }

    fn reported_complexity(&self) -> Option<f64> {
        self.complexity.filter(|c| *c != 0.0)
    }

    /// Apply defaults and range limits
    pub fn into_estimate(self) -> SurfaceEstimate {
        let complexity = self.reported_complexity().unwrap_or(DEFAULT_COMPLEXITY);
        SurfaceEstimate {
            area_sqft: self.area_sqft.unwrap_or(0.0).max(0.0),
            complexity: clamp_complexity(complexity),
            notes: self.notes.unwrap_or_else(|| DEFAULT_AI_NOTES.to_string()),
            method: EstimationMethod::Ai,
        }
    }
}

/// Parse the model's message content. Never fails: anything unreadable
/// yields an empty `ParsedEstimate`.
pub fn parse_response(content: Option<&str>) -> ParsedEstimate {
    let Some(content) = content else {
        return ParsedEstimate::default();
    };

    let json_str = extract_json_from_response(content);
    let value: Value = match serde_json::from_str(&json_str) {
        Ok(v) => v,
        Err(e) => {
            let truncated: String = content.chars().take(200).collect();
            warn!(error = %e, raw = %truncated, "model content is not valid JSON");
            return ParsedEstimate::default();
        }
    };

    let Some(obj) = value.as_object() else {
        return ParsedEstimate::default();
    };

    ParsedEstimate {
        area_sqft: obj.get("area_sqft").and_then(number_field),
        complexity: obj.get("complexity").and_then(number_field),
        notes: obj.get("notes").and_then(text_field),
    }
}

/// Accept JSON numbers and numeric strings
fn number_field(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn text_field(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Extract JSON from response (handles markdown code blocks)
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|i| i + 1).unwrap_or(3);
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

/// Estimate the cleanable surface for a job.
///
/// Asks the vision model first; if the call fails the Smart Estimator table
/// answers instead, so this never returns an error.
pub async fn estimate_surface(
    backend: &dyn VisionBackend,
    service: &ServiceType,
    images: &[ImagePayload],
    fallback: &SmartEstimatorTable,
) -> SurfaceEstimate {
    let prompt = build_estimation_prompt(service);

    match backend.send_prompt(SYSTEM_PROMPT, &prompt, images).await {
        Ok(content) => {
            let parsed = parse_response(content.as_deref());
            let defaulted = parsed.defaulted_fields();
            if !defaulted.is_empty() {
                warn!(fields = ?defaulted, "model answer missing fields, using defaults");
            }
            let estimate = parsed.into_estimate();
            info!(
                model = backend.model_name(),
                area_sqft = estimate.area_sqft,
                complexity = estimate.complexity,
                "AI estimate"
            );
            estimate
        }
        Err(e) => {
            warn!(
                error = %e,
                service = %service,
                "vision model unavailable, using smart estimator"
            );
            smart_estimate(fallback, service)
        }
    }
}
