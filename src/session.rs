//! Front-end state for one user working on one sketch.
//!
//! A [`Session`] holds the selected style, the loaded sketch, the free-text
//! details and the outcome of the last request. It drives a
//! [`RenderClient`] and moves through
//! `Idle → Requesting → {Succeeded | Failed}` per request.

use crate::client::RenderClient;
use crate::error::RenderError;
use crate::output::ImageDataUri;
use crate::pipeline::encode::{encode_sketch, EncodedImage};
use crate::pipeline::input::SketchInput;
use crate::progress::ObserverHandle;
use crate::styles::DesignStyle;
use std::time::Instant;
use tracing::debug;

/// Error shown when a request is made before any sketch is loaded.
pub const NO_SKETCH_MESSAGE: &str = "Please upload a sketch first.";

/// Outcome of the most recent request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Requesting,
    Succeeded(ImageDataUri),
    /// Message shown to the user.
    Failed(String),
}

/// UI state for sketch-to-render generation.
#[derive(Default)]
pub struct Session {
    style: DesignStyle,
    sketch: Option<EncodedImage>,
    details: String,
    state: GenerationState,
    observer: Option<ObserverHandle>,
}

impl Session {
    /// Photorealistic style, no sketch, idle.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn select_style(&mut self, style: DesignStyle) {
        self.style = style;
    }

    pub fn style(&self) -> DesignStyle {
        self.style
    }

    pub fn set_details(&mut self, details: impl Into<String>) {
        self.details = details.into();
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    /// Encode and hold a new sketch, clearing any previous result.
    ///
    /// A rejected sketch leaves the session in `Failed` with the rejection
    /// message; a previously loaded sketch stays loaded.
    pub fn load_sketch(&mut self, input: &SketchInput) -> Result<(), RenderError> {
        match encode_sketch(input) {
            Ok(encoded) => {
                self.sketch = Some(encoded);
                self.state = GenerationState::Idle;
                Ok(())
            }
            Err(e) => {
                self.state = GenerationState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn sketch(&self) -> Option<&EncodedImage> {
        self.sketch.as_ref()
    }

    /// Drop the sketch and return to `Idle`.
    pub fn clear_sketch(&mut self) {
        self.sketch = None;
        self.state = GenerationState::Idle;
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GenerationState::Requesting)
    }

    pub fn result(&self) -> Option<&ImageDataUri> {
        match &self.state {
            GenerationState::Succeeded(uri) => Some(uri),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            GenerationState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Run one request for the loaded sketch.
    ///
    /// Without a sketch no request is made and the session moves to
    /// `Failed` with [`NO_SKETCH_MESSAGE`].
    pub async fn generate(&mut self, client: &RenderClient) -> &GenerationState {
        let Some(sketch) = self.sketch.clone() else {
            debug!("generate called with no sketch loaded");
            self.state = GenerationState::Failed(NO_SKETCH_MESSAGE.to_string());
            return &self.state;
        };

        self.state = GenerationState::Requesting;
        if let Some(obs) = &self.observer {
            obs.on_request_start(self.style);
        }

        let start = Instant::now();
        let outcome = client.generate(&sketch, &self.details, self.style).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.state = match outcome {
            Ok(uri) => {
                if let Some(obs) = &self.observer {
                    obs.on_success(uri.payload().len(), elapsed_ms);
                }
                GenerationState::Succeeded(uri)
            }
            Err(e) => {
                let message = e.to_string();
                if let Some(obs) = &self.observer {
                    obs.on_failure(&message, elapsed_ms);
                }
                GenerationState::Failed(message)
            }
        };
        &self.state
    }
}
