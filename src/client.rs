//! The generation client: sketch + style + details in, render out.
//!
//! One call is one remote request. Nothing is retried, cached or
//! deduplicated; concurrent calls share only the read-only configuration.
//!
//! ```text
//! EncodedImage ──▶ normalise ──▶ compose prompt ──▶ remote ──▶ extract
//!                  (strip URI)   (rules+style+text)  (1 call)   (1st image)
//! ```

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::output::ImageDataUri;
use crate::pipeline::encode::{encode_sketch, strip_data_uri_prefix, EncodedImage};
use crate::pipeline::extract::extract_image;
use crate::pipeline::input::load_sketch;
use crate::pipeline::remote::{GeminiBackend, GenerationBackend};
use crate::pipeline::wire::{GenerateContentRequest, InlineData, RequestContent, RequestPart};
use crate::prompts::{compose_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::styles::DesignStyle;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything that goes into one remote request. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub image: EncodedImage,
    pub style_fragment: String,
    pub user_details: String,
}

impl GenerationRequest {
    /// Normalises the image payload to raw base64.
    pub fn new(image: &EncodedImage, style: DesignStyle, user_details: &str) -> Self {
        Self {
            image: EncodedImage {
                base64_payload: strip_data_uri_prefix(&image.base64_payload).to_string(),
                mime_type: image.mime_type.clone(),
            },
            style_fragment: style.prompt_fragment().to_string(),
            user_details: user_details.to_string(),
        }
    }

    /// Wire form: the image part first, then the instruction text.
    ///
    /// The image is declared as `upload_mime_type` whatever its real format.
    pub fn to_wire(&self, system_prompt: &str, upload_mime_type: &str) -> GenerateContentRequest {
        let text = compose_prompt(system_prompt, &self.style_fragment, &self.user_details);
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: upload_mime_type.to_string(),
                            data: self.image.base64_payload.clone(),
                        },
                    },
                    RequestPart::Text { text },
                ],
            }],
        }
    }
}

/// Sends sketches to the image model.
pub struct RenderClient {
    backend: Arc<dyn GenerationBackend>,
    config: RenderConfig,
}

impl RenderClient {
    /// Create a client, using `config.backend` when set and an HTTP
    /// [`GeminiBackend`] otherwise.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let backend: Arc<dyn GenerationBackend> = match config.backend {
            Some(ref b) => Arc::clone(b),
            None => Arc::new(
                GeminiBackend::new(
                    config.base_url.clone(),
                    config.api_key.clone(),
                    config.api_timeout_secs.map(Duration::from_secs),
                )
                .map_err(|e| RenderError::Internal(format!("HTTP client: {e}")))?,
            ),
        };
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The exact request [`RenderClient::generate`] would send.
    pub fn build_request(
        &self,
        image: &EncodedImage,
        user_details: &str,
        style: DesignStyle,
    ) -> GenerateContentRequest {
        let system_prompt = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        GenerationRequest::new(image, style, user_details)
            .to_wire(system_prompt, &self.config.upload_mime_type)
    }

    /// Generate a render of `image` in `style`, honouring `user_details`.
    ///
    /// # Errors
    /// - [`RenderError::NoImageReturned`] when the first candidate has no
    ///   inline image
    /// - [`RenderError::Generation`] for every other remote failure, carrying
    ///   the remote message or a generic fallback
    pub async fn generate(
        &self,
        image: &EncodedImage,
        user_details: &str,
        style: DesignStyle,
    ) -> Result<ImageDataUri, RenderError> {
        let start = Instant::now();
        let request = self.build_request(image, user_details, style);
        info!(
            "Requesting render: model={} style=\"{}\"",
            self.config.model,
            style.label()
        );
        debug!("Sketch payload: {} bytes base64", image.base64_payload.len());

        let response = self
            .backend
            .generate_content(&self.config.model, &request)
            .await
            .map_err(|e| {
                warn!("Generation failed: {}", e);
                RenderError::from(e)
            })?;

        let uri = extract_image(&response).inspect_err(|e| warn!("{}", e))?;
        info!(
            "Render received in {}ms ({} bytes base64)",
            start.elapsed().as_millis(),
            uri.payload().len()
        );
        Ok(uri)
    }
}

/// Load, encode and render a sketch file in one call.
pub async fn render_sketch(
    path: impl AsRef<Path>,
    user_details: &str,
    style: DesignStyle,
    config: &RenderConfig,
) -> Result<ImageDataUri, RenderError> {
    let input = load_sketch(path).await?;
    let encoded = encode_sketch(&input)?;
    RenderClient::new(config.clone())?
        .generate(&encoded, user_details, style)
        .await
}

/// [`render_sketch`], then write the PNG to `output`.
pub async fn render_to_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    user_details: &str,
    style: DesignStyle,
    config: &RenderConfig,
) -> Result<ImageDataUri, RenderError> {
    let uri = render_sketch(input, user_details, style, config).await?;
    uri.save(output).await?;
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch() -> EncodedImage {
        EncodedImage::from_base64("QUJD", "image/png")
    }

    #[test]
    fn request_strips_prefix_and_keeps_details() {
        let img = EncodedImage {
            base64_payload: "data:image/png;base64,QUJD".into(),
            mime_type: "image/png".into(),
        };
        let req = GenerationRequest::new(&img, DesignStyle::Cyberpunk, "a kettle");
        assert_eq!(req.image.base64_payload, "QUJD");
        assert_eq!(req.style_fragment, DesignStyle::Cyberpunk.prompt_fragment());
        assert_eq!(req.user_details, "a kettle");
    }

    #[test]
    fn wire_text_matches_prompt_composition() {
        let req = GenerationRequest::new(&sketch(), DesignStyle::WoodNatural, "stool");
        let wire = req.to_wire(DEFAULT_SYSTEM_PROMPT, "image/jpeg");
        let text = wire.contents[0].parts[1].text().unwrap();
        assert_eq!(
            text,
            compose_prompt(
                DEFAULT_SYSTEM_PROMPT,
                DesignStyle::WoodNatural.prompt_fragment(),
                "stool"
            )
        );
    }

    #[test]
    fn image_part_comes_first_and_is_declared_jpeg() {
        let client = RenderClient::new(RenderConfig::builder().api_key("k").build().unwrap())
            .unwrap();
        let wire = client.build_request(&sketch(), "", DesignStyle::default());
        let parts = &wire.contents[0].parts;
        assert_eq!(parts.len(), 2);
        let inline = parts[0].inline_data().unwrap();
        assert_eq!(inline.mime_type, "image/jpeg");
        assert_eq!(inline.data, "QUJD");
        assert!(parts[1].text().is_some());
    }

    #[test]
    fn custom_system_prompt_replaces_rules() {
        let config = RenderConfig::builder()
            .api_key("k")
            .system_prompt("Draw it as a blueprint.")
            .build()
            .unwrap();
        let client = RenderClient::new(config).unwrap();
        let wire = client.build_request(&sketch(), "chair", DesignStyle::Minimalist);
        let text = wire.contents[0].parts[1].text().unwrap();
        assert!(text.starts_with("Draw it as a blueprint."));
        assert!(!text.contains("Follow these strict rules"));
        assert!(text.contains(DesignStyle::Minimalist.prompt_fragment()));
    }
}
