//! Sketch encoding: raw bytes → base64 [`EncodedImage`].
//!
//! The remote model wants raw base64 in the JSON body, never a data URI, so
//! [`strip_data_uri_prefix`] is applied both here and again by the client
//! right before the request is built. The strip is idempotent.

use crate::error::EncodeError;
use crate::pipeline::input::{SketchFormat, SketchInput};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upload ceiling: 5 MiB.
pub const MAX_SKETCH_BYTES: u64 = 5 * 1024 * 1024;

static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,").unwrap());

/// A base64 sketch ready to be embedded in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    pub base64_payload: String,
    pub mime_type: String,
}

impl EncodedImage {
    /// Wrap an already-encoded payload. A leading data-URI prefix is removed.
    pub fn from_base64(payload: &str, mime_type: impl Into<String>) -> Self {
        Self {
            base64_payload: strip_data_uri_prefix(payload).to_string(),
            mime_type: mime_type.into(),
        }
    }
}

/// Remove any leading `data:image/<fmt>;base64,` from `payload`.
///
/// Repeated prefixes are all removed, so `strip(strip(x)) == strip(x)` for
/// every input.
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    let mut rest = payload;
    while let Some(m) = DATA_URI_PREFIX.find(rest) {
        rest = &rest[m.end()..];
    }
    rest
}

/// Encode sketch bytes as base64.
///
/// `size_bytes` is checked against [`MAX_SKETCH_BYTES`] before anything else
/// happens; the declared type must then be png, jpeg or webp. The bytes
/// themselves are not inspected.
pub fn encode(
    file_bytes: &[u8],
    declared_mime_type: &str,
    size_bytes: u64,
) -> Result<EncodedImage, EncodeError> {
    if size_bytes > MAX_SKETCH_BYTES {
        return Err(EncodeError::TooLarge {
            size_bytes,
            limit_bytes: MAX_SKETCH_BYTES,
        });
    }

    let format = SketchFormat::from_mime_type(declared_mime_type).ok_or_else(|| {
        EncodeError::UnsupportedFormat {
            mime_type: declared_mime_type.to_string(),
        }
    })?;

    let b64 = STANDARD.encode(file_bytes);
    debug!("Encoded sketch → {} bytes base64", b64.len());

    Ok(EncodedImage {
        base64_payload: b64,
        mime_type: format.mime_type().to_string(),
    })
}

/// [`encode`] applied to a loaded [`SketchInput`].
pub fn encode_sketch(input: &SketchInput) -> Result<EncodedImage, EncodeError> {
    encode(&input.raw_bytes, &input.mime_type, input.size_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_small_sketch() {
        let data = encode(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg", 4).expect("encode");
        assert_eq!(data.mime_type, "image/jpeg");
        assert_eq!(data.base64_payload, "/9j/4A==");
        let decoded = STANDARD.decode(&data.base64_payload).expect("valid base64");
        assert_eq!(decoded, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn size_is_checked_before_type() {
        let err = encode(b"", "image/gif", MAX_SKETCH_BYTES + 1).unwrap_err();
        assert!(matches!(err, EncodeError::TooLarge { .. }));
    }

    #[test]
    fn exactly_at_limit_is_accepted() {
        assert!(encode(b"abc", "image/png", MAX_SKETCH_BYTES).is_ok());
    }

    #[test]
    fn rejects_other_types() {
        let err = encode(b"GIF89a", "image/gif", 6).unwrap_err();
        assert_eq!(
            err,
            EncodeError::UnsupportedFormat {
                mime_type: "image/gif".into()
            }
        );
    }

    #[test]
    fn jpg_alias_is_normalised() {
        let data = encode(b"x", "image/jpg", 1).unwrap();
        assert_eq!(data.mime_type, "image/jpeg");
    }

    #[test]
    fn deterministic() {
        let a = encode(b"same bytes", "image/png", 10).unwrap();
        let b = encode(b"same bytes", "image/png", 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strip_prefix_variants() {
        for fmt in ["png", "jpeg", "jpg", "webp"] {
            let uri = format!("data:image/{fmt};base64,QUJD");
            assert_eq!(strip_data_uri_prefix(&uri), "QUJD");
        }
        assert_eq!(strip_data_uri_prefix("QUJD"), "QUJD");
        // Only a leading prefix is removed.
        assert_eq!(
            strip_data_uri_prefix("QUJDdata:image/png;base64,"),
            "QUJDdata:image/png;base64,"
        );
        // Unsupported formats are left alone.
        assert_eq!(
            strip_data_uri_prefix("data:image/gif;base64,QUJD"),
            "data:image/gif;base64,QUJD"
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let uri = "data:image/png;base64,iVBORw0KGgo=";
        let once = strip_data_uri_prefix(uri);
        assert_eq!(strip_data_uri_prefix(once), once);

        let doubled = "data:image/png;base64,data:image/jpeg;base64,QUJD";
        let once = strip_data_uri_prefix(doubled);
        assert_eq!(once, "QUJD");
        assert_eq!(strip_data_uri_prefix(once), once);
    }

    #[test]
    fn from_base64_strips() {
        let img = EncodedImage::from_base64("data:image/webp;base64,AAAA", "image/webp");
        assert_eq!(img.base64_payload, "AAAA");
    }
}
