//! Prompt text for the verdict call.
//!
//! The output contract is non-negotiable: exactly one word, `true` or
//! `false`. Everything else is rejected by the parser and resolved
//! fail-safe.

pub const VERDICT_SYSTEM_PROMPT: &str = "Your only task is to analyze text for negative thinking, \
depressive or self-harming patterns, or violence. Respond with only a single word: 'true' if the \
text contains any of these, and 'false' if it does not. Do not provide any other text, \
explanation, or punctuation.";

/// Wrap the (already redacted) screen text into the user message.
pub fn build_verdict_message(text: &str) -> String {
    format!(
        "Analyze the following text, read from a computer screen, for negative thinking, \
depressive behavior, or violence:\n\n{text}"
    )
}
