//! Configuration for sketch-to-render generation.
//!
//! All knobs live in [`RenderConfig`], built via [`RenderConfigBuilder`].
//! The API key is read from the environment when the builder is created, but
//! a missing key is not rejected here: the first remote call reports it.

use crate::error::RenderError;
use crate::pipeline::input::SketchFormat;
use crate::pipeline::remote::{api_key_from_env, GenerationBackend, DEFAULT_BASE_URL};
use std::fmt;
use std::sync::Arc;

/// Image model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Configuration for a [`crate::client::RenderClient`].
///
/// # Example
/// ```rust
/// use sketch2render::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .model("gemini-2.5-flash-image")
///     .api_key("test-key")
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gemini-2.5-flash-image");
/// ```
#[derive(Clone)]
pub struct RenderConfig {
    /// Remote model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// API key. Default: first non-empty of `API_KEY`, `GEMINI_API_KEY`.
    pub api_key: Option<String>,

    /// Endpoint root. Default: the public Generative Language API.
    pub base_url: String,

    /// Replacement for [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Media type declared for the uploaded sketch. Default: `image/jpeg`.
    ///
    /// Every sketch is sent as JPEG regardless of its real format; the model
    /// has been tuned against that framing.
    pub upload_mime_type: String,

    /// Transport timeout in seconds. Default: none.
    pub api_timeout_secs: Option<u64>,

    /// Pre-constructed backend. Takes precedence over `base_url`/`api_key`.
    pub backend: Option<Arc<dyn GenerationBackend>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key_from_env(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: None,
            upload_mime_type: SketchFormat::Jpeg.mime_type().to_string(),
            api_timeout_secs: None,
            backend: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("upload_mime_type", &self.upload_mime_type)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "backend",
                &self.backend.as_ref().map(|_| "<dyn GenerationBackend>"),
            )
            .finish()
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn upload_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.config.upload_mime_type = mime.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(RenderError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(RenderError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                c.base_url
            )));
        }
        if SketchFormat::from_mime_type(&c.upload_mime_type).is_none() {
            return Err(RenderError::InvalidConfig(format!(
                "upload media type must be image/png, image/jpeg or image/webp, got '{}'",
                c.upload_mime_type
            )));
        }
        if c.api_timeout_secs == Some(0) {
            return Err(RenderError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RenderConfig::default();
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.upload_mime_type, "image/jpeg");
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.api_timeout_secs.is_none());
        assert!(c.system_prompt.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = RenderConfig::builder()
            .model("other-model")
            .api_key("k")
            .base_url("http://localhost:9000")
            .system_prompt("be brief")
            .upload_mime_type("image/png")
            .api_timeout_secs(30)
            .build()
            .unwrap();
        assert_eq!(c.model, "other-model");
        assert_eq!(c.api_key.as_deref(), Some("k"));
        assert_eq!(c.system_prompt.as_deref(), Some("be brief"));
        assert_eq!(c.upload_mime_type, "image/png");
        assert_eq!(c.api_timeout_secs, Some(30));
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(RenderConfig::builder().model(" ").build().is_err());
        assert!(RenderConfig::builder().base_url("ftp://x").build().is_err());
        assert!(RenderConfig::builder()
            .upload_mime_type("image/gif")
            .build()
            .is_err());
        assert!(RenderConfig::builder().api_timeout_secs(0).build().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = RenderConfig::builder().api_key("super-secret").build().unwrap();
        assert!(!format!("{c:?}").contains("super-secret"));
    }
}
