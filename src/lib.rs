//! mind-glass — screen wellness monitor.
//!
//! Periodically captures the screen, OCRs whatever text is visible,
//! asks a remote model whether it shows a negative spiral, and — only on a
//! confirmed verdict — shows a gentle desktop nudge.
//!
//! Pipeline domains:
//! - capture:   screen → `Frame` (capability-checked at startup)
//! - ocr:       `Frame`/file → `ExtractedText` (deterministic preprocessing + Tesseract)
//! - safety:    secrets masked before text leaves the machine
//! - sentiment: text → strict binary `Verdict`, fail-safe on any remote failure
//! - notify:    best-effort desktop notification
//! - monitor:   the cycle driver tying the stages together

pub mod capture;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod ocr;
pub mod safety;
pub mod sentiment;
