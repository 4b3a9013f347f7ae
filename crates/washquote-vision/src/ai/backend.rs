//! Seam between the estimation pipeline and a vision model provider

use async_trait::async_trait;
use thiserror::Error;
use washquote_types::ImagePayload;

/// Failure to get an answer out of the vision model
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request never completed (connect, TLS, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// A vision-capable chat model.
///
/// `Ok(None)` means the call succeeded but carried no message content.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn send_prompt(
        &self,
        system: &str,
        prompt: &str,
        images: &[ImagePayload],
    ) -> Result<Option<String>, BackendError>;

    fn model_name(&self) -> &str;
}
