//! The monitoring pipeline driver.
//!
//! Runs capture → extract → classify → notify on a fixed cadence, forever.
//! Every stage failure is absorbed at its boundary, turned into a
//! `CycleOutcome`, and logged; nothing propagates out of `run`. The only
//! way the loop ends is the cancellation token, checked once per cycle
//! boundary.
//!
//! The cadence is deliberately fixed — no backoff on repeated failures.
//! This is a best-effort wellness tool, not a delivery pipeline; a skipped
//! or failed cycle costs nothing, the next one retries with fresh screen
//! content.

use crate::capture::CaptureSource;
use crate::notify::{self, Notifier};
use crate::ocr::TextExtractor;
use crate::sentiment::{SentimentClassifier, Verdict};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Time between cycle starts.
    pub interval: Duration,
    /// Minimum gap between two notifications, so a persistent negative
    /// screen does not turn into a popup storm.
    pub notify_gap: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            notify_gap: Duration::from_secs(300),
        }
    }
}

/// The deepest pipeline stage a cycle reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Stage {
    Capture,
    Extract,
    Classify,
    Notify,
}

/// Summary of one loop iteration. Feeds the per-cycle log line; never
/// persisted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CycleOutcome {
    pub stage: Stage,
    pub success: bool,
    pub verdict: Option<Verdict>,
    pub elapsed_ms: u64,
}

impl CycleOutcome {
    fn failed(stage: Stage, started: Instant) -> Self {
        Self {
            stage,
            success: false,
            verdict: None,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn completed(stage: Stage, verdict: Verdict, started: Instant) -> Self {
        Self {
            stage,
            success: true,
            verdict: Some(verdict),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

pub struct MonitorLoop {
    capture: Box<dyn CaptureSource>,
    extractor: Arc<TextExtractor>,
    classifier: SentimentClassifier,
    notifier: Box<dyn Notifier>,
    config: MonitorConfig,
}

impl MonitorLoop {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        extractor: Arc<TextExtractor>,
        classifier: SentimentClassifier,
        notifier: Box<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            capture,
            extractor,
            classifier,
            notifier,
            config,
        }
    }

    /// Drive cycles until the token is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        log::info!(
            "[MONITOR] Starting — interval {:?}, capture source: {}",
            self.config.interval,
            self.capture.kind()
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_alert: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.run_cycle(&mut last_alert).await;
                    log::info!(
                        "[MONITOR] Cycle done: stage={:?} success={} negative={} elapsed={}ms",
                        outcome.stage,
                        outcome.success,
                        outcome.verdict.as_ref().map(|v| v.negative).unwrap_or(false),
                        outcome.elapsed_ms
                    );
                    if let Ok(json) = serde_json::to_string(&outcome) {
                        log::debug!("[MONITOR] {}", json);
                    }
                }
                _ = cancel.cancelled() => {
                    log::info!("[MONITOR] Stop requested — shutting down");
                    break;
                }
            }
        }
    }

    async fn run_cycle(&self, last_alert: &mut Option<Instant>) -> CycleOutcome {
        let started = Instant::now();

        // Stage 1: capture
        let frame = match self.capture.capture() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("[MONITOR] Capture stage failed: {}", e);
                return CycleOutcome::failed(Stage::Capture, started);
            }
        };

        // Stage 2: extract. OCR is subprocess-bound, so it runs on a
        // blocking thread. The frame moves into the task and its buffer is
        // released when the task finishes — before classification starts,
        // whatever the outcome.
        let extractor = Arc::clone(&self.extractor);
        let extracted =
            match tokio::task::spawn_blocking(move || extractor.extract_frame(&frame)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    log::warn!("[MONITOR] Extract stage failed: {}", e);
                    return CycleOutcome::failed(Stage::Extract, started);
                }
                Err(e) => {
                    log::warn!("[MONITOR] Extract worker died: {}", e);
                    return CycleOutcome::failed(Stage::Extract, started);
                }
            };

        // Stage 3: classify. Fail-safe inside — always yields a verdict,
        // and a remote failure shows up as basis=FailSafe.
        let verdict = self.classifier.classify(&extracted.joined()).await;

        // Stage 4: notify, only on a confirmed negative verdict
        if verdict.negative {
            self.raise_alert(last_alert);
            return CycleOutcome::completed(Stage::Notify, verdict, started);
        }

        CycleOutcome::completed(Stage::Classify, verdict, started)
    }

    fn raise_alert(&self, last_alert: &mut Option<Instant>) {
        if let Some(previous) = *last_alert {
            let since = previous.elapsed();
            if since < self.config.notify_gap {
                log::info!(
                    "[MONITOR] Alert suppressed — last one shown {}s ago",
                    since.as_secs()
                );
                return;
            }
        }

        match self.notifier.notify(notify::ALERT_TITLE, notify::ALERT_BODY) {
            Ok(()) => {
                log::info!("[MONITOR] Wellness notification shown");
                *last_alert = Some(Instant::now());
            }
            // A notification that cannot be shown never disrupts the loop
            Err(e) => log::warn!("[MONITOR] {} — continuing", e),
        }
    }
}
