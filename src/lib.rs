//! # sketch2render
//!
//! Turn a rough product sketch into a photorealistic render using a
//! multimodal image model.
//!
//! ## Pipeline Overview
//!
//! ```text
//! sketch file
//!  │
//!  ├─ 1. Input    read bytes, declare png/jpeg/webp
//!  ├─ 2. Encode   5 MiB ceiling, base64
//!  ├─ 3. Prompt   system rules + style fragment + user details
//!  ├─ 4. Remote   one generateContent call (image part, then text part)
//!  └─ 5. Extract  first inline image of the first candidate → PNG data URI
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sketch2render::{render_to_file, DesignStyle, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from API_KEY or GEMINI_API_KEY
//!     let config = RenderConfig::default();
//!     let uri = render_to_file(
//!         "sketch.png",
//!         "render.png",
//!         "cordless kettle, brushed steel",
//!         DesignStyle::Minimalist,
//!         &config,
//!     )
//!     .await?;
//!     eprintln!("{} bytes of base64", uri.payload().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sketch2render` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod styles;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{render_sketch, render_to_file, GenerationRequest, RenderClient};
pub use config::{RenderConfig, RenderConfigBuilder, DEFAULT_MODEL};
pub use error::{BackendError, EncodeError, RenderError};
pub use output::{default_output_path, ImageDataUri};
pub use pipeline::encode::{
    encode, encode_sketch, strip_data_uri_prefix, EncodedImage, MAX_SKETCH_BYTES,
};
pub use pipeline::input::{load_sketch, SketchFormat, SketchInput};
pub use pipeline::remote::{GeminiBackend, GenerationBackend};
pub use progress::{GenerationObserver, NoopObserver, ObserverHandle};
pub use session::{GenerationState, Session, NO_SKETCH_MESSAGE};
pub use styles::DesignStyle;
