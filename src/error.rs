//! Error types for the sketch2render library.
//!
//! Three error types, one per layer:
//!
//! * [`EncodeError`]: the sketch was rejected before any network activity
//!   (too large, or a media type outside png/jpeg/webp).
//!
//! * [`BackendError`]: what a [`crate::pipeline::remote::GenerationBackend`]
//!   reports when the remote call fails. It carries the remote-provided
//!   message when one exists.
//!
//! * [`RenderError`]: the single terminal error a caller sees per request.
//!   Backend failures are folded into [`RenderError::Generation`] so the
//!   message shown to the user is exactly what the remote said, or a generic
//!   fallback when it said nothing.

use std::path::PathBuf;
use thiserror::Error;

/// Message used when a failed remote call carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate render.";

/// Message of [`RenderError::NoImageReturned`].
pub const NO_IMAGE_MESSAGE: &str = "No image data found in the response.";

fn mib(bytes: &u64) -> u64 {
    bytes / (1024 * 1024)
}

fn or_generic(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE)
}

/// Rejection of a sketch before it is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Sketch exceeds the upload ceiling.
    #[error("File size too large ({size_bytes} bytes). Please use an image under {} MB.", mib(.limit_bytes))]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    /// Declared media type is not png, jpeg or webp.
    #[error("Unsupported image type '{mime_type}'. Use a PNG, JPEG or WebP sketch.")]
    UnsupportedFormat { mime_type: String },
}

/// Failure reported by a generation backend.
///
/// `message` is `None` when the transport failed without anything a user
/// could act on; the client then substitutes [`GENERIC_FAILURE_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", or_generic(.message))]
pub struct BackendError {
    /// HTTP status, when the failure came from an HTTP response.
    pub status: Option<u16>,
    /// Human-readable message, remote-provided where possible.
    pub message: Option<String>,
}

impl BackendError {
    /// A failure with a message and no HTTP status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    /// A failure with an HTTP status and an optional message.
    pub fn http(status: u16, message: Option<String>) -> Self {
        Self {
            status: Some(status),
            message,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: Some(e.to_string()),
        }
    }
}

/// All terminal errors returned by the sketch2render library.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The sketch was rejected before encoding.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Sketch file was not found at the given path.
    #[error("Sketch file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// A string that should have been a base64 data URI was not one.
    #[error("Invalid image data URI: {detail}")]
    InvalidDataUri { detail: String },

    // ── Generation errors ─────────────────────────────────────────────────
    /// The remote call succeeded but the first candidate held no image.
    #[error("{}", NO_IMAGE_MESSAGE)]
    NoImageReturned,

    /// Any other failure of the remote call; displayed verbatim.
    #[error("{message}")]
    Generation { message: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not write the rendered image.
    #[error("Failed to write render to '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BackendError> for RenderError {
    fn from(e: BackendError) -> Self {
        let message = e
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        RenderError::Generation { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_display_mentions_limit() {
        let e = EncodeError::TooLarge {
            size_bytes: 6 * 1024 * 1024,
            limit_bytes: 5 * 1024 * 1024,
        };
        assert!(e.to_string().contains("under 5 MB"), "got: {e}");
    }

    #[test]
    fn backend_message_is_surfaced_verbatim() {
        let e: RenderError = BackendError::new("quota exceeded").into();
        assert_eq!(e.to_string(), "quota exceeded");
    }

    #[test]
    fn backend_without_message_falls_back() {
        let e: RenderError = BackendError::http(500, None).into();
        assert_eq!(e.to_string(), GENERIC_FAILURE_MESSAGE);

        let e: RenderError = BackendError::http(502, Some("   ".into())).into();
        assert_eq!(e.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn http_backend_error_keeps_status() {
        let e = BackendError::http(429, Some("slow down".into()));
        assert_eq!(e.status, Some(429));
        assert_eq!(e.to_string(), "slow down");
    }

    #[test]
    fn no_image_display() {
        assert_eq!(RenderError::NoImageReturned.to_string(), NO_IMAGE_MESSAGE);
    }
}
