//! Sentiment classification via a remote model.
//!
//! One request per `classify` call, a strict binary reply contract, and a
//! fail-safe policy: any remote failure — transport error, bad status,
//! timeout, unparseable reply — resolves to "not negative". For a wellness
//! nudge a false alarm is worse than a missed cycle, so an unconfirmed
//! verdict is never acted on. The next cycle retries naturally; there are
//! no retries inside a single call.

mod parse;
mod prompts;

pub use parse::{parse_verdict, strip_code_fences};

use crate::config::ClassifierConfig;
use crate::safety;
use sha2::{Digest, Sha256};

/// How a verdict was reached. `negative` can only be `true` when the basis
/// is `Model`; the other two are structurally benign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum VerdictBasis {
    /// The model answered and the reply parsed cleanly.
    Model,
    /// Input was below the minimum length; no remote call was made.
    SkippedShortInput,
    /// The remote call failed in some way and the verdict fell back to
    /// benign. The failure is logged, never acted on.
    FailSafe,
}

/// The classifier's answer for one piece of text.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Verdict {
    pub negative: bool,
    /// Truncated sha256 of the classified text, tying the verdict to the
    /// exact input it judged.
    pub text_digest: String,
    pub basis: VerdictBasis,
}

impl Verdict {
    fn benign(text_digest: String, basis: VerdictBasis) -> Self {
        Self {
            negative: false,
            text_digest,
            basis,
        }
    }
}

/// Inputs with fewer non-whitespace characters than this skip the remote
/// call entirely — OCR scraps this short carry no signal worth a request.
const MIN_INPUT_CHARS: usize = 5;

pub struct SentimentClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl SentimentClassifier {
    /// Build a classifier around an explicit configuration. The credential
    /// comes in here; nothing in this module reads the environment.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifyError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Classify extracted screen text.
    ///
    /// Infallible by design: every failure path resolves to a benign
    /// verdict, with `basis` recording why.
    pub async fn classify(&self, text: &str) -> Verdict {
        let text_digest = digest(text);

        if text.chars().filter(|c| !c.is_whitespace()).count() < MIN_INPUT_CHARS {
            log::debug!(
                "[SENTIMENT] Input under {} chars — skipping remote call",
                MIN_INPUT_CHARS
            );
            return Verdict::benign(text_digest, VerdictBasis::SkippedShortInput);
        }

        let outbound = safety::redact_outbound(text);

        match self.request_verdict(&outbound.text).await {
            Ok(negative) => Verdict {
                negative,
                text_digest,
                basis: VerdictBasis::Model,
            },
            Err(e) => {
                log::warn!("[SENTIMENT] {} — failing safe to non-negative", e);
                Verdict::benign(text_digest, VerdictBasis::FailSafe)
            }
        }
    }

    async fn request_verdict(&self, text: &str) -> Result<bool, ClassifyError> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": self.config.model,
                "max_tokens": self.config.max_tokens,
                "system": prompts::VERDICT_SYSTEM_PROMPT,
                "messages": [{
                    "role": "user",
                    "content": prompts::build_verdict_message(text),
                }]
            }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::ApiStatus(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await.map_err(transport_error)?;

        log::info!("[SENTIMENT] API latency: {}ms", start.elapsed().as_millis());

        let reply = body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| ClassifyError::MalformedResponse(parse::preview(&body.to_string())))?;

        parse::parse_verdict(reply)
    }
}

fn transport_error(e: reqwest::Error) -> ClassifyError {
    if e.is_timeout() {
        ClassifyError::Timeout
    } else {
        ClassifyError::Http(e.to_string())
    }
}

/// Short content digest for log correlation.
fn digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    format!("{hash:x}")[..16].to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Remote call timed out")]
    Timeout,

    #[error("API returned status {0}")]
    ApiStatus(u16),

    #[error("Model reply was not a binary verdict: {0}")]
    MalformedResponse(String),
}
