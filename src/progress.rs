//! Observer trait for the request lifecycle of a [`crate::session::Session`].
//!
//! The generation client itself exposes only call/return. A front end that
//! wants a spinner or a status line registers a [`GenerationObserver`] on the
//! session, which fires it around each request.
//!
//! # Example
//!
//! ```rust
//! use sketch2render::{DesignStyle, GenerationObserver, Session};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingObserver {
//!     started: AtomicUsize,
//! }
//!
//! impl GenerationObserver for CountingObserver {
//!     fn on_request_start(&self, style: DesignStyle) {
//!         self.started.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("rendering in {style} style…");
//!     }
//! }
//!
//! let observer = Arc::new(CountingObserver { started: AtomicUsize::new(0) });
//! let session = Session::new().with_observer(observer);
//! ```

use crate::styles::DesignStyle;
use std::sync::Arc;

/// Called by a session as a request moves through its states.
///
/// All methods default to no-ops.
pub trait GenerationObserver: Send + Sync {
    /// The request is about to be sent.
    fn on_request_start(&self, style: DesignStyle) {
        let _ = style;
    }

    /// A render came back.
    ///
    /// # Arguments
    /// * `payload_len`: length of the base64 payload
    /// * `elapsed_ms` : wall-clock time of the request
    fn on_success(&self, payload_len: usize, elapsed_ms: u64) {
        let _ = (payload_len, elapsed_ms);
    }

    /// The request failed; `message` is what the user should see.
    fn on_failure(&self, message: &str, elapsed_ms: u64) {
        let _ = (message, elapsed_ms);
    }
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Shared observer handle as stored on a session.
pub type ObserverHandle = Arc<dyn GenerationObserver>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_request_start(DesignStyle::Cyberpunk);
        obs.on_success(1024, 3000);
        obs.on_failure("quota exceeded", 120);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: ObserverHandle = Arc::new(NoopObserver);
        obs.on_request_start(DesignStyle::default());
    }
}
