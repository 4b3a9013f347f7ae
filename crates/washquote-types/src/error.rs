//! Error types for washquote

use thiserror::Error;

/// Message returned when a request carries no image parts
pub const NO_IMAGES_MESSAGE: &str = "No images uploaded";

/// Message returned when no inference credential is configured
pub const MISSING_API_KEY_MESSAGE: &str = "Missing OPENAI_API_KEY on server";

/// Fallback message for errors that carry no text of their own
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error";

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client sent a request the handler cannot act on
    #[error("{0}")]
    Validation(String),

    #[error("{}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    /// Anything else; the message is passed through to the caller as-is
    #[error("{0}")]
    Unexpected(String),
}

impl Error {
    pub fn no_images() -> Self {
        Error::Validation(NO_IMAGES_MESSAGE.to_string())
    }

    /// Message suitable for an `{"error": ...}` response body
    pub fn public_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
