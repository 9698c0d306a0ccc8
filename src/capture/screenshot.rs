//! Full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. The monitor loop
//! never sees xcap types; it gets a PNG-encoded `Frame` back.

use super::Frame;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use xcap::Monitor;

/// Live screen capture of the primary monitor.
pub struct ScreenCapture;

impl super::CaptureSource for ScreenCapture {
    fn capture(&self) -> Result<Frame, CaptureError> {
        let start = std::time::Instant::now();
        let image = capture_primary_monitor()?;

        let mut png_bytes: Vec<u8> = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| CaptureError::Encoding(e.to_string()))?;

        log::debug!(
            "[CAPTURE] {}x{} frame in {}ms — {} bytes",
            image.width(),
            image.height(),
            start.elapsed().as_millis(),
            png_bytes.len()
        );

        Ok(Frame::new(png_bytes))
    }

    fn kind(&self) -> &'static str {
        "screen"
    }
}

/// Captures the primary monitor's screen as a `DynamicImage`.
fn capture_primary_monitor() -> Result<DynamicImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let primary = monitors
        .into_iter()
        .find(|m| m.is_primary().unwrap_or(false))
        .or_else(|| {
            // Fallback: if no monitor reports as primary, use the first one
            let all = Monitor::all().ok()?;
            all.into_iter().next()
        })
        .ok_or(CaptureError::NoPrimaryMonitor)?;

    let image = primary
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    Ok(DynamicImage::ImageRgba8(image))
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen capture is not available on this platform")]
    Unavailable,

    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No primary monitor found")]
    NoPrimaryMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}
