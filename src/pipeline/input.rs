//! Input resolution: turn a user-selected file into a [`SketchInput`].
//!
//! The declared media type comes from the file extension, falling back to a
//! magic-byte sniff when the extension says nothing. Content is not otherwise
//! validated; [`crate::pipeline::encode`] enforces the size ceiling and the
//! png/jpeg/webp whitelist on the declared type only.

use crate::error::{EncodeError, RenderError};
use crate::pipeline::encode::MAX_SKETCH_BYTES;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Media type declared for bytes nobody could identify.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Sketch formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SketchFormat {
    Png,
    Jpeg,
    WebP,
}

impl SketchFormat {
    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Parse a declared MIME type. `image/jpg` is tolerated.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Guess from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Guess from the leading bytes of the file.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }
}

/// A sketch as selected by the user, held for one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchInput {
    pub raw_bytes: Vec<u8>,
    /// Declared media type; not checked against the content.
    pub mime_type: String,
    pub size_bytes: u64,
}

impl SketchInput {
    /// Wrap in-memory bytes with a declared media type.
    pub fn new(raw_bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let size_bytes = raw_bytes.len() as u64;
        Self {
            raw_bytes,
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI, as produced by a browser
    /// file reader.
    pub fn from_data_uri(uri: &str) -> Result<Self, RenderError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| RenderError::InvalidDataUri {
                detail: "missing 'data:' scheme".into(),
            })?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| RenderError::InvalidDataUri {
            detail: "missing ',' separator".into(),
        })?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| RenderError::InvalidDataUri {
                detail: "only base64 data URIs are supported".into(),
            })?;
        let raw_bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| RenderError::InvalidDataUri {
                detail: e.to_string(),
            })?;
        Ok(Self::new(raw_bytes, mime_type))
    }

    /// The declared type, if it is one we accept.
    pub fn format(&self) -> Option<SketchFormat> {
        SketchFormat::from_mime_type(&self.mime_type)
    }
}

/// Read a sketch from disk.
///
/// Oversized files are rejected from their metadata, before the contents are
/// read.
pub async fn load_sketch(path: impl AsRef<Path>) -> Result<SketchInput, RenderError> {
    let path = path.as_ref();

    let meta = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) => return Err(map_io_error(path, e)),
    };
    if !meta.is_file() {
        return Err(RenderError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if meta.len() > MAX_SKETCH_BYTES {
        return Err(EncodeError::TooLarge {
            size_bytes: meta.len(),
            limit_bytes: MAX_SKETCH_BYTES,
        }
        .into());
    }

    let raw_bytes = tokio::fs::read(path)
        .await
        .map_err(|e| map_io_error(path, e))?;

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SketchFormat::from_extension)
        .or_else(|| SketchFormat::sniff(&raw_bytes));
    let mime_type = format.map_or(UNKNOWN_MIME_TYPE, |f| f.mime_type());

    debug!(
        "Loaded sketch {} ({} bytes, {})",
        path.display(),
        raw_bytes.len(),
        mime_type
    );
    Ok(SketchInput::new(raw_bytes, mime_type))
}

fn map_io_error(path: &Path, e: std::io::Error) -> RenderError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => RenderError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => RenderError::FileNotFound {
            path: path.to_path_buf(),
        },
    }
}
