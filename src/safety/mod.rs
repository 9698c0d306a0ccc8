//! Safety layer.
//!
//! Everything the OCR stage reads off the screen passes through redaction
//! before it is sent to the remote classifier.

mod redact;

pub use redact::{redact_outbound, OutboundText};
