//! OpenAI chat-completions backend
//!
//! Images travel inline as base64 data URIs, one `image_url` content part per
//! photo, so nothing is uploaded or stored elsewhere.

use super::backend::{BackendError, VisionBackend};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use washquote_types::{ConfigError, Error, ImagePayload, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Provider error bodies are truncated to this many characters in errors and logs
const ERROR_BODY_LIMIT: usize = 500;

/// Connection settings for the OpenAI backend
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub temperature: f32,
    pub timeout: Option<Duration>,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full chat-completions endpoint URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.api_base_url.trim_end_matches('/')
        )
    }
}

/// Encode an image as `data:<media type>;base64,<payload>`
pub fn to_data_uri(image: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        image.media_type(),
        STANDARD.encode(&image.bytes)
    )
}

/// Build the chat-completions request body
pub fn build_request_body(
    model: &str,
    temperature: f32,
    system: &str,
    prompt: &str,
    images: &[ImagePayload],
) -> Value {
    let mut user_content = Vec::with_capacity(images.len() + 1);
    user_content.push(json!({ "type": "text", "text": prompt }));
    for image in images {
        user_content.push(json!({
            "type": "image_url",
            "image_url": { "url": to_data_uri(image) },
        }));
    }

    json!({
        "model": model,
        "temperature": temperature,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user_content },
        ],
    })
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a response body.
///
/// An envelope that does not decode is treated like one without content.
pub fn extract_message_content(body: &str) -> Option<String> {
    match serde_json::from_str::<ChatCompletionResponse>(body) {
        Ok(parsed) => parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content),
        Err(e) => {
            warn!(error = %e, "chat completion envelope did not decode");
            None
        }
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(ERROR_BODY_LIMIT).collect()
}

/// VisionBackend over the OpenAI HTTP API
pub struct OpenAiBackend {
    client: reqwest::Client,
    settings: OpenAiSettings,
    endpoint: String,
}

impl OpenAiBackend {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "washquote/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;

        let endpoint = settings.endpoint();
        Ok(Self {
            client,
            settings,
            endpoint,
        })
    }
}

#[async_trait]
impl VisionBackend for OpenAiBackend {
    async fn send_prompt(
        &self,
        system: &str,
        prompt: &str,
        images: &[ImagePayload],
    ) -> std::result::Result<Option<String>, BackendError> {
        let body = build_request_body(
            &self.settings.model,
            self.settings.temperature,
            system,
            prompt,
            images,
        );

        debug!(
            endpoint = %self.endpoint,
            model = %self.settings.model,
            images = images.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate(&text),
            });
        }

        Ok(extract_message_content(&text))
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> ImagePayload {
        ImagePayload::new(vec![0xFF, 0xD8, 0xFF], None)
    }

    #[test]
    fn test_data_uri_default_media_type() {
        assert_eq!(to_data_uri(&jpeg()), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_data_uri_declared_media_type() {
        let png = ImagePayload::new(b"png".to_vec(), Some("image/png".to_string()));
        assert_eq!(to_data_uri(&png), "data:image/png;base64,cG5n");
    }

    #[test]
    fn test_request_body_shape() {
        let images = vec![jpeg(), jpeg()];
        let body = build_request_body("gpt-4o-mini", 0.2, "sys", "estimate", &images);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "sys");
        assert_eq!(messages[1]["role"], "user");

        let content = messages[1]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "estimate");
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[2]["image_url"]["url"], "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let settings = OpenAiSettings::new("k").with_api_base_url("http://localhost:9000/v1/");
        assert_eq!(settings.endpoint(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(
            OpenAiSettings::new("k").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_extract_message_content() {
        let body =
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"area_sqft\":10}"}}]}"#;
        assert_eq!(
            extract_message_content(body).as_deref(),
            Some("{\"area_sqft\":10}")
        );
    }

    #[test]
    fn test_extract_message_content_absent() {
        assert_eq!(extract_message_content(r#"{"choices":[]}"#), None);
        assert_eq!(extract_message_content(r#"{"choices":[{"message":{"content":null}}]}"#), None);
        assert_eq!(extract_message_content("not json"), None);
    }

    #[test]
    fn test_blank_api_key_rejected() {
        assert!(matches!(
            OpenAiBackend::new(OpenAiSettings::new("  ")),
            Err(Error::MissingApiKey)
        ));
    }

    // ==========================================
    // Round trips against a local completions server
    // ==========================================

    use axum::extract::State;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    /// Authorization header and JSON body of each request received
    type Received = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    #[derive(Clone)]
    struct StubReply {
        status: StatusCode,
        body: &'static str,
        received: Received,
    }

    async fn stub_completions(
        State(reply): State<StubReply>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, &'static str) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        reply.received.lock().unwrap().push((auth, body));
        (reply.status, reply.body)
    }

    /// Serve one fixed reply on 127.0.0.1; returns the API base URL
    async fn spawn_stub(status: StatusCode, body: &'static str) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/chat/completions", post(stub_completions))
            .with_state(StubReply {
                status,
                body,
                received: received.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1", addr), received)
    }

    fn backend_for(base_url: &str) -> OpenAiBackend {
        let settings = OpenAiSettings::new("sk-test-key")
            .with_api_base_url(base_url)
            .with_timeout(Some(Duration::from_secs(10)));
        OpenAiBackend::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_send_prompt_success() {
        let (base_url, received) = spawn_stub(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"area_sqft\":900}"}}]}"#,
        )
        .await;

        let images = vec![jpeg(), ImagePayload::new(b"png".to_vec(), Some("image/png".into()))];
        let content = backend_for(&base_url)
            .send_prompt("sys", "estimate the roof", &images)
            .await
            .unwrap();
        assert_eq!(content.as_deref(), Some("{\"area_sqft\":900}"));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (auth, body) = &received[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test-key"));
        assert_eq!(body["model"], DEFAULT_MODEL);

        let parts = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["text"], "estimate the roof");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,/9j/");
        assert_eq!(parts[2]["image_url"]["url"], "data:image/png;base64,cG5n");
    }

    #[tokio::test]
    async fn test_send_prompt_error_status() {
        let (base_url, _) = spawn_stub(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;

        let result = backend_for(&base_url)
            .send_prompt("sys", "prompt", &[jpeg()])
            .await;

        match result {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_prompt_undecodable_envelope() {
        let (base_url, _) = spawn_stub(StatusCode::OK, "<html>gateway</html>").await;

        let content = backend_for(&base_url)
            .send_prompt("sys", "prompt", &[jpeg()])
            .await
            .unwrap();
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn test_send_prompt_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = backend_for(&format!("http://{}/v1", addr))
            .send_prompt("sys", "prompt", &[jpeg()])
            .await;
        assert!(matches!(result, Err(BackendError::Transport(_))));
    }
}
