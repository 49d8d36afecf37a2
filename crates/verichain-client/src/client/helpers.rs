//! Pure helpers: input checks and error-body parsing (no HTTP, no status logic).

use crate::error::{ClientError, ClientResult};

/// Longest raw body excerpt carried into an error message.
const MAX_BODY_EXCERPT: usize = 200;

/// Trimmed value of a required field, or a `Validation` error naming it.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> ClientResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::validation(format!("{field} required")));
    }
    Ok(trimmed)
}

/// Extract a human-readable message from an error response body.
///
/// Expected format: `{"error": "..."}` (or `{"message": "..."}`).
/// Falls back to a body excerpt, then to `fallback`.
pub(crate) fn backend_message(body: &str, fallback: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        fallback.to_string()
    } else {
        body.chars().take(MAX_BODY_EXCERPT).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("wallet", "  0xabc ").unwrap(), "0xabc");
    }

    #[test]
    fn test_required_names_field() {
        match required("name", "") {
            Err(ClientError::Validation { message }) => assert_eq!(message, "name required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_backend_message_prefers_error_field() {
        let body = r#"{"error": "wallet, hash, name required"}"#;
        assert_eq!(
            backend_message(body, "Bad Request"),
            "wallet, hash, name required"
        );
    }

    #[test]
    fn test_backend_message_reads_message_field() {
        assert_eq!(backend_message(r#"{"message": "nope"}"#, "x"), "nope");
    }

    #[test]
    fn test_backend_message_falls_back() {
        assert_eq!(backend_message("", "Internal Server Error"), "Internal Server Error");
        assert_eq!(backend_message("plain text", "x"), "plain text");

        let long = "e".repeat(500);
        assert_eq!(backend_message(&long, "x").len(), 200);
    }
}
