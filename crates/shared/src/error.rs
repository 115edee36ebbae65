//! Client-side error types.

use serde_json::Value;
use thiserror::Error;

/// Classified request failure.
///
/// The API client folds every outcome into a normalized response rather than
/// returning `Result`; this classification is recovered from a failed
/// response when the caller wants to log what went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
}

/// Extract the backend's `{"error": "..."}` envelope for inline display.
///
/// Returns `None` when the field is absent, not a string, or blank, so
/// callers can fall back to a generic message.
pub fn error_message(data: &Value) -> Option<String> {
    let msg = data.get("error")?.as_str()?.trim();
    if msg.is_empty() {
        None
    } else {
        Some(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_backend_text() {
        let data = json!({"error": "credenciales inválidas"});
        assert_eq!(error_message(&data).as_deref(), Some("credenciales inválidas"));
    }

    #[test]
    fn error_message_rejects_blank_or_missing() {
        assert_eq!(error_message(&json!({"error": "  "})), None);
        assert_eq!(error_message(&json!({})), None);
        assert_eq!(error_message(&json!({"error": 500})), None);
    }
}
