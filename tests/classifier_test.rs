//! Classifier contract tests against a mock endpoint.
//!
//! Covers the short-input short-circuit (zero remote calls), the fail-safe
//! invariant for malformed/error/slow responses, and outbound redaction.

use httpmock::prelude::*;
use mind_glass::config::ClassifierConfig;
use mind_glass::sentiment::{SentimentClassifier, VerdictBasis};
use std::time::Duration;

fn test_config(endpoint: String) -> ClassifierConfig {
    let mut config = ClassifierConfig::new("test-key");
    config.endpoint = endpoint;
    config.model = "test-model".to_string();
    config.timeout = Duration::from_millis(500);
    config
}

fn verdict_body(word: &str) -> serde_json::Value {
    serde_json::json!({ "content": [{ "type": "text", "text": word }] })
}

// ── Short-circuit ───────────────────────────────────────────────────

#[tokio::test]
async fn empty_input_never_calls_remote() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(verdict_body("true"));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();

    let verdict = classifier.classify("").await;
    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::SkippedShortInput);

    let verdict = classifier.classify("   \n\t ").await;
    assert!(!verdict.negative);

    let verdict = classifier.classify("ok!").await;
    assert_eq!(verdict.basis, VerdictBasis::SkippedShortInput);

    api.assert_hits(0);
}

// ── Model verdicts ──────────────────────────────────────────────────

#[tokio::test]
async fn negative_verdict_comes_from_the_model() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(verdict_body("true"));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier.classify("I feel completely hopeless about all of this").await;

    assert!(verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::Model);
    assert_eq!(verdict.text_digest.len(), 16);
    api.assert_hits(1);
}

#[tokio::test]
async fn benign_verdict_comes_from_the_model() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(verdict_body("False"));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier.classify("planning a picnic for saturday afternoon").await;

    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::Model);
}

// ── Fail-safe invariant ─────────────────────────────────────────────

#[tokio::test]
async fn malformed_reply_fails_safe() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .json_body(verdict_body("Well, it could be read as somewhat negative."));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier.classify("ambiguous screen content here").await;

    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::FailSafe);
}

#[tokio::test]
async fn unexpected_body_shape_fails_safe() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({ "unexpected": "shape" }));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier.classify("whatever was on screen just now").await;

    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::FailSafe);
}

#[tokio::test]
async fn error_status_fails_safe() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(500);
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier.classify("some perfectly ordinary text").await;

    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::FailSafe);
}

#[tokio::test]
async fn slow_endpoint_fails_safe() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(verdict_body("true"));
    });

    let mut config = test_config(server.url("/v1/messages"));
    config.timeout = Duration::from_millis(200);

    let classifier = SentimentClassifier::new(config).unwrap();
    let verdict = classifier.classify("text that will never get judged in time").await;

    assert!(!verdict.negative);
    assert_eq!(verdict.basis, VerdictBasis::FailSafe);
}

// ── Outbound redaction ──────────────────────────────────────────────

#[tokio::test]
async fn secrets_are_masked_before_leaving() {
    let server = MockServer::start();
    // Only matches when the placeholder made it into the request body —
    // an unredacted request would miss every mock and fail safe instead.
    let api = server.mock(|when, then| {
        when.method(POST).body_contains("[REDACTED:token]");
        then.status(200).json_body(verdict_body("false"));
    });

    let classifier = SentimentClassifier::new(test_config(server.url("/v1/messages"))).unwrap();
    let verdict = classifier
        .classify("terminal shows export KEY=sk-ant-REDACTED again")
        .await;

    assert_eq!(verdict.basis, VerdictBasis::Model);
    api.assert_hits(1);
}
