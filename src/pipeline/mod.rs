//! Pipeline stages for sketch-to-render generation.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ wire ──▶ remote ──▶ extract
//! (file)    (base64)   (JSON)   (HTTP)     (data URI)
//! ```
//!
//! 1. [`input`]: read a sketch file and declare its media type
//! 2. [`encode`]: enforce the 5 MiB ceiling and base64-encode
//! 3. [`wire`]: request/response shapes of `generateContent`
//! 4. [`remote`]: the backend seam and its HTTP implementation; the only
//!    stage with network I/O
//! 5. [`extract`]: pick the first inline image out of the response

pub mod encode;
pub mod extract;
pub mod input;
pub mod remote;
pub mod wire;
