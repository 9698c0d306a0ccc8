//! Strict parsing of the model reply.

use super::ClassifyError;

/// Parse the reply into the binary verdict.
///
/// Code fences are stripped and the result is matched case-insensitively;
/// anything that is not exactly `true` or `false` after that is a
/// `MalformedResponse`.
pub fn parse_verdict(raw: &str) -> Result<bool, ClassifyError> {
    let cleaned = strip_code_fences(raw);
    match cleaned.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ClassifyError::MalformedResponse(preview(raw))),
    }
}

/// Strip markdown code fences from a model reply.
///
/// Models sometimes wrap even one-word output in ``` fences despite being
/// told not to; that alone should not trip the malformed path.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let after_open = match trimmed.find('\n') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };
    let stripped = after_open.trim_end();
    if let Some(inner) = stripped.strip_suffix("```") {
        inner.trim().to_string()
    } else {
        after_open.trim().to_string()
    }
}

/// First 80 characters of a reply, for error messages and logs.
pub(crate) fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() > 80 {
        let head: String = trimmed.chars().take(80).collect();
        format!("{head}…")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_true_and_false() {
        assert_eq!(parse_verdict("true").unwrap(), true);
        assert_eq!(parse_verdict("false").unwrap(), false);
    }

    #[test]
    fn accepts_case_and_whitespace_variants() {
        assert_eq!(parse_verdict("  True\n").unwrap(), true);
        assert_eq!(parse_verdict("FALSE").unwrap(), false);
    }

    #[test]
    fn accepts_fenced_verdict() {
        assert_eq!(parse_verdict("```\ntrue\n```").unwrap(), true);
    }

    #[test]
    fn rejects_prose() {
        assert!(parse_verdict("The text appears to be negative.").is_err());
    }

    #[test]
    fn rejects_decorated_verdict() {
        assert!(parse_verdict("true.").is_err());
        assert!(parse_verdict("\"true\"").is_err());
    }

    #[test]
    fn rejects_empty_reply() {
        assert!(parse_verdict("").is_err());
    }

    #[test]
    fn preview_truncates_long_replies() {
        let long = "x".repeat(200);
        let p = preview(&long);
        assert!(p.chars().count() <= 81);
        assert!(p.ends_with('…'));
    }
}
