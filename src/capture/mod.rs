//! Screen capture domain — public API.
//!
//! This module owns all screen capture functionality. The rest of the
//! pipeline only sees the `CaptureSource` trait and the `Frame` it yields;
//! whether a real screen grab is possible on this platform is decided once
//! at startup by `detect()`.

mod screenshot;

pub use screenshot::{CaptureError, ScreenCapture};

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One screen capture: PNG-encoded pixels plus the moment they were taken.
///
/// A `Frame` is ephemeral — it is owned by the cycle that captured it and
/// the buffer is released (all clones dropped) before the classification
/// stage begins. The `Arc` exists so the blocking OCR task can take the
/// bytes without copying a full-screen image.
#[derive(Debug, Clone)]
pub struct Frame {
    pub png: Arc<Vec<u8>>,
    pub taken_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(png: Vec<u8>) -> Self {
        Self {
            png: Arc::new(png),
            taken_at: Utc::now(),
        }
    }
}

/// Something that can produce a `Frame` on demand.
///
/// Implementations: `ScreenCapture` (xcap-backed) when the platform supports
/// it, `UnavailableCapture` when it does not, and test doubles.
pub trait CaptureSource: Send + Sync {
    fn capture(&self) -> Result<Frame, CaptureError>;

    /// Short name for log lines.
    fn kind(&self) -> &'static str;
}

/// Capture variant for platforms where screen capture does not work
/// (headless sessions, some Wayland setups). Every `capture` call fails
/// with `Unavailable`; the monitor loop logs it and keeps cycling, since
/// the operator can still feed images through the batch path.
pub struct UnavailableCapture;

impl CaptureSource for UnavailableCapture {
    fn capture(&self) -> Result<Frame, CaptureError> {
        Err(CaptureError::Unavailable)
    }

    fn kind(&self) -> &'static str {
        "unavailable"
    }
}

/// Probe the platform once and pick the capture variant.
///
/// Enumerating monitors is the cheapest operation that exercises the same
/// OS machinery as a real grab, so a successful non-empty enumeration is
/// taken as "capture works here".
pub fn detect() -> Box<dyn CaptureSource> {
    match xcap::Monitor::all() {
        Ok(monitors) if !monitors.is_empty() => {
            log::info!(
                "[CAPTURE] {} monitor(s) found — screen capture enabled",
                monitors.len()
            );
            Box::new(ScreenCapture)
        }
        Ok(_) => {
            log::warn!("[CAPTURE] No monitors found — screen capture disabled");
            Box::new(UnavailableCapture)
        }
        Err(e) => {
            log::warn!(
                "[CAPTURE] Monitor enumeration failed ({}) — screen capture disabled",
                e
            );
            Box::new(UnavailableCapture)
        }
    }
}
