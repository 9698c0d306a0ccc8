//! OCR engine seam.
//!
//! `TesseractEngine` drives the system `tesseract` binary as a helper
//! process, the same way the capture utilities in this space shell out to
//! their platform OCR helpers. The preprocessed image is spooled to a
//! temporary PNG whose lifetime is scoped to the call — `NamedTempFile`
//! deletes it on every exit path, including errors.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// A synchronous text recognizer. `TextExtractor` is generic over this seam
/// so tests can substitute a deterministic double.
pub trait OcrEngine: Send + Sync {
    /// Recognize text in a PNG-encoded image.
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError>;
}

/// Tesseract invoked as a subprocess.
///
/// Page segmentation mode 6 ("assume a single uniform block of text")
/// works best on binarized screen content; OEM 3 lets Tesseract pick its
/// LSTM engine.
pub struct TesseractEngine {
    binary: PathBuf,
    lang: String,
}

impl TesseractEngine {
    /// Find the `tesseract` binary on PATH. One probe at startup; a missing
    /// install surfaces here rather than mid-loop.
    pub fn locate(lang: &str) -> Result<Self, OcrError> {
        let binary = which::which("tesseract")
            .map_err(|e| OcrError::NotInstalled(e.to_string()))?;
        log::info!("[OCR] Using {} (lang={})", binary.display(), lang);
        Ok(Self {
            binary,
            lang: lang.to_string(),
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError> {
        let mut spool = tempfile::Builder::new()
            .prefix("mind-glass-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Spool(e.to_string()))?;
        spool
            .write_all(png)
            .and_then(|_| spool.flush())
            .map_err(|e| OcrError::Spool(e.to_string()))?;

        let output = Command::new(&self.binary)
            .arg(spool.path())
            .arg("stdout")
            .args(["--oem", "3", "--psm", "6"])
            .args(["-l", &self.lang])
            .output()
            .map_err(|e| OcrError::EngineFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        // spool dropped here — the temp file is removed
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("tesseract binary not found on PATH: {0}")]
    NotInstalled(String),

    #[error("Failed to spool image to temp file: {0}")]
    Spool(String),

    #[error("OCR engine failed: {0}")]
    EngineFailed(String),
}
