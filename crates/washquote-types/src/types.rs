//! Core types for surface estimation and pricing

use serde::{Deserialize, Serialize};

/// Media type assumed when an upload does not declare one
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Cleaning job category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    #[default]
    House,
    Windows,
    Roof,
    Driveway,
    Gutters,
    /// Tag not in the built-in set, kept as received (trimmed)
    Other(String),
}

impl ServiceType {
    /// Parse a service tag. Blank input resolves to `House`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "house" => ServiceType::House,
            "windows" => ServiceType::Windows,
            "roof" => ServiceType::Roof,
            "driveway" => ServiceType::Driveway,
            "gutters" => ServiceType::Gutters,
            _ => ServiceType::Other(trimmed.to_string()),
        }
    }

    /// Tag used in prompts, lookups and responses
    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::House => "house",
            ServiceType::Windows => "windows",
            ServiceType::Roof => "roof",
            ServiceType::Driveway => "driveway",
            ServiceType::Gutters => "gutters",
            ServiceType::Other(tag) => tag.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ServiceType::Other(_))
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        ServiceType::parse(&value)
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded photo held in memory for the duration of a request
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    /// Declared content type, if the client sent one
    pub media_type: Option<String>,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, media_type: Option<String>) -> Self {
        Self { bytes, media_type }
    }

    /// Declared media type, or `image/jpeg` when absent or blank
    pub fn media_type(&self) -> &str {
        match self.media_type.as_deref().map(str::trim) {
            Some(mt) if !mt.is_empty() => mt,
            _ => DEFAULT_MEDIA_TYPE,
        }
    }
}

/// One estimate submission: a service tag plus the uploaded photos
#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub service: ServiceType,
    pub images: Vec<ImagePayload>,
}

impl EstimateRequest {
    pub fn new(service: ServiceType, images: Vec<ImagePayload>) -> Self {
        Self { service, images }
    }
}

/// Where an estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimationMethod {
    /// Parsed from the vision model's answer
    Ai,
    /// Static lookup used when the vision model could not be reached
    Smart,
}

impl EstimationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            EstimationMethod::Ai => "ai",
            EstimationMethod::Smart => "smart",
        }
    }
}

/// Cleanable surface estimate for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEstimate {
    /// Visible cleanable area in square feet (>= 0)
    pub area_sqft: f64,
    /// Job complexity, 1 (easy) to 5 (hard)
    pub complexity: f64,
    pub notes: String,
    pub method: EstimationMethod,
}

/// Price breakdown for an estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub rate: f64,
    pub complexity_factor: f64,
    /// Final price rounded to cents
    pub total: f64,
}

/// Body of a successful `/api/estimate` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    pub service: ServiceType,
    pub area_sqft: f64,
    pub complexity: f64,
    pub rate: f64,
    pub complexity_factor: f64,
    pub total: f64,
    pub notes: String,
    pub images_analyzed: usize,
    pub estimation_method: EstimationMethod,
}

impl EstimateResponse {
    pub fn new(
        service: ServiceType,
        estimate: SurfaceEstimate,
        quote: Quote,
        images_analyzed: usize,
    ) -> Self {
        Self {
            service,
            area_sqft: estimate.area_sqft,
            complexity: estimate.complexity,
            rate: quote.rate,
            complexity_factor: quote.complexity_factor,
            total: quote.total,
            notes: estimate.notes,
            images_analyzed,
            estimation_method: estimate.method,
        }
    }
}
