//! The remote call: the only network I/O in the crate.
//!
//! [`GenerationBackend`] is the seam between request building and transport.
//! [`GeminiBackend`] speaks the Google Generative Language REST API; tests
//! substitute an in-process implementation.

use crate::error::BackendError;
use crate::pipeline::wire::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Default REST endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Sends one `generateContent` request and returns the parsed response.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BackendError>;
}

/// HTTP backend for `generativelanguage.googleapis.com`.
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiBackend {
    /// Build a backend. A missing key is not an error here; the call fails
    /// instead.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self::with_client(builder.build()?, base_url, api_key))
    }

    /// Build a backend around an existing HTTP client.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, BackendError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BackendError::new(format!(
                "API key not set. Export {} or pass --api-key.",
                API_KEY_ENV_VARS.join(" or ")
            ))
        })?;

        let url = self.endpoint(model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = parse_error_message(&text);
            warn!("Generation endpoint returned HTTP {}", status.as_u16());
            return Err(BackendError::http(status.as_u16(), message));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| BackendError::new(format!("Malformed response from model: {e}")))
    }
}

/// Pull the human-readable message out of an error body.
///
/// Falls back to the raw body when it is not the usual JSON envelope, and to
/// `None` when the body is empty.
pub fn parse_error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if let Some(msg) = envelope.error.message.filter(|m| !m.is_empty()) {
            return Some(msg);
        }
        return envelope.error.status;
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First non-empty API key from [`API_KEY_ENV_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}
