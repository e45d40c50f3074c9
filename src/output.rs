//! The successful result of a generation: a PNG data URI.

use crate::error::RenderError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

const PNG_PREFIX: &str = "data:image/png;base64,";

/// A `data:image/png;base64,...` URI, ready to display or download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageDataUri(String);

impl ImageDataUri {
    /// Wrap a raw base64 payload.
    pub fn png(base64_payload: &str) -> Self {
        Self(format!("{PNG_PREFIX}{base64_payload}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The base64 payload without the scheme prefix.
    pub fn payload(&self) -> &str {
        &self.0[PNG_PREFIX.len()..]
    }

    /// Decode the payload to image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, RenderError> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| RenderError::InvalidDataUri {
                detail: e.to_string(),
            })
    }

    /// Decode and write the image to `path`.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.decode()?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| RenderError::OutputWriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Saved render to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageDataUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Default download name: `render-<unix millis>.png`.
pub fn default_output_path() -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    PathBuf::from(format!("render-{millis}.png"))
}
