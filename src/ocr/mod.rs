//! Text extraction domain — image in, cleaned text out.
//!
//! `TextExtractor` owns the full path from a raster image to
//! `ExtractedText`: decode, deterministic preprocessing, OCR through the
//! `OcrEngine` seam, and cleanup of the raw engine output. It serves both
//! the live monitor loop (`extract_frame`) and the offline batch path
//! (`extract_file` / `extract_all`).

mod engine;
pub mod preprocess;

pub use engine::{OcrEngine, OcrError, TesseractEngine};

use crate::capture::Frame;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

// OCR noise: everything outside words, digits and basic punctuation.
static NOISE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?;:()'\-]").expect("noise regex"));

/// Text recovered from one image. Immutable once produced.
///
/// `blocks` holds the cleaned, non-empty lines; an image with no
/// recognizable text yields an empty `blocks` — that is a valid success,
/// not an error.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExtractedText {
    pub blocks: Vec<String>,
    /// Where the text came from: `"screen"` or the source file path.
    pub source: String,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks joined into the single string the classifier consumes.
    pub fn joined(&self) -> String {
        self.blocks.join(" ")
    }

    /// Total character count across blocks (for log lines and reports).
    pub fn char_count(&self) -> usize {
        self.blocks.iter().map(|b| b.chars().count()).sum()
    }
}

/// One entry of a batch extraction. Order matches the input order.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<ExtractedText, ExtractError>,
}

pub struct TextExtractor {
    engine: Box<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Extract text from a live capture.
    pub fn extract_frame(&self, frame: &Frame) -> Result<ExtractedText, ExtractError> {
        self.extract_bytes(&frame.png, "screen")
    }

    /// Extract text from a stored image file.
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let bytes =
            std::fs::read(path).map_err(|e| ExtractError::InvalidImage(e.to_string()))?;
        self.extract_bytes(&bytes, &path.display().to_string())
    }

    /// Batch extraction with per-item isolation: a failure on one image
    /// never aborts the rest, and input order is preserved.
    pub fn extract_all(&self, paths: &[PathBuf]) -> Vec<BatchItem> {
        paths
            .iter()
            .map(|path| {
                let result = self.extract_file(path);
                match &result {
                    Ok(text) => log::info!(
                        "[OCR] {} — {} chars extracted",
                        path.display(),
                        text.char_count()
                    ),
                    Err(e) => log::warn!("[OCR] {} — {}", path.display(), e),
                }
                BatchItem {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }

    fn extract_bytes(&self, bytes: &[u8], source: &str) -> Result<ExtractedText, ExtractError> {
        let start = std::time::Instant::now();

        let image = image::load_from_memory(bytes)
            .map_err(|e| ExtractError::InvalidImage(e.to_string()))?;

        let prepared = preprocess::binarize(&image);
        let png = preprocess::to_png(&prepared).map_err(ExtractError::Encoding)?;

        let raw = self.engine.recognize(&png).map_err(ExtractError::Ocr)?;
        let blocks = clean_text(&raw);

        log::debug!(
            "[OCR] {}: {} block(s), {} chars in {}ms",
            source,
            blocks.len(),
            blocks.iter().map(|b| b.len()).sum::<usize>(),
            start.elapsed().as_millis()
        );

        Ok(ExtractedText {
            blocks,
            source: source.to_string(),
            extracted_at: Utc::now(),
        })
    }
}

/// Clean raw OCR output: per line, strip noise characters and collapse
/// whitespace runs; drop lines with nothing left.
pub fn clean_text(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let without_noise = NOISE_CHARS.replace_all(line, "");
            WHITESPACE_RUNS
                .replace_all(without_noise.trim(), " ")
                .into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Image could not be read or decoded: {0}")]
    InvalidImage(String),

    #[error("Preprocessed image could not be re-encoded: {0}")]
    Encoding(String),

    #[error(transparent)]
    Ocr(OcrError),
}
