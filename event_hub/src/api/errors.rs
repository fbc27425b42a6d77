//! API error types.

use serde_json::Value;
use thiserror::Error;

/// Body of a rejected response
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// JSON body, usually `{"detail": ...}`, `{"error": ...}` or a field map
    Json(Value),
    /// Non-JSON body (HTML error pages, plain text)
    Text(String),
    Empty,
}

impl ErrorPayload {
    /// Parse a response body, falling back to text when it isn't JSON
    pub fn from_body(body: &str) -> Self {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return ErrorPayload::Empty;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => ErrorPayload::Empty,
            Ok(value) => ErrorPayload::Json(value),
            Err(_) => ErrorPayload::Text(trimmed.to_string()),
        }
    }

    /// The `detail` string, if present
    pub fn detail(&self) -> Option<&str> {
        self.string_field("detail")
    }

    /// The `error` string, if present
    pub fn error(&self) -> Option<&str> {
        self.string_field("error")
    }

    /// A bare JSON string body or a text body
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ErrorPayload::Json(Value::String(s)) => Some(s),
            ErrorPayload::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten every message in the payload, in body order.
    ///
    /// Field maps like `{"email": ["Enter a valid email."], "city": ["..."]}`
    /// yield one entry per message; nested lists and objects are walked.
    pub fn flatten(&self) -> Vec<String> {
        let mut messages = Vec::new();
        match self {
            ErrorPayload::Json(value) => flatten_value(value, &mut messages),
            ErrorPayload::Text(text) => messages.push(text.clone()),
            ErrorPayload::Empty => {}
        }
        messages
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        match self {
            ErrorPayload::Json(Value::Object(map)) => map.get(key).and_then(Value::as_str),
            _ => None,
        }
    }
}

fn flatten_value(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(s.clone());
            }
        }
        Value::Array(items) => items.iter().for_each(|item| flatten_value(item, out)),
        Value::Object(map) => map.values().for_each(|item| flatten_value(item, out)),
        other => out.push(other.to_string()),
    }
}

/// Errors returned by [`EventsApi`](super::EventsApi) calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("Request rejected with status {status}")]
    Rejected { status: u16, payload: ErrorPayload },

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Success status but the body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request could not be built from the configured base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the request never got a response
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::InvalidUrl(_))
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of a rejected request
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ApiError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Whether this is a 4xx carrying a field-error map
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::Rejected {
                status: 400..=499,
                payload: ErrorPayload::Json(serde_json::Value::Object(_)),
            }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_from_empty_body() {
        assert_eq!(ErrorPayload::from_body("   "), ErrorPayload::Empty);
        assert_eq!(ErrorPayload::from_body("null"), ErrorPayload::Empty);
    }

    #[test]
    fn test_payload_from_html_body() {
        let payload = ErrorPayload::from_body("<h1>Server Error (500)</h1>");
        assert_eq!(
            payload,
            ErrorPayload::Text("<h1>Server Error (500)</h1>".to_string())
        );
        assert!(payload.detail().is_none());
    }

    #[test]
    fn test_payload_detail_and_error() {
        let payload = ErrorPayload::from_body(r#"{"detail": "No active account"}"#);
        assert_eq!(payload.detail(), Some("No active account"));
        assert!(payload.error().is_none());

        let payload = ErrorPayload::from_body(r#"{"error": "Event not found"}"#);
        assert_eq!(payload.error(), Some("Event not found"));
    }

    #[test]
    fn test_flatten_field_map_keeps_body_order() {
        let payload = ErrorPayload::Json(json!({
            "phone_number": ["Ensure this field has no more than 15 characters."],
            "email": ["Enter a valid email address."],
        }));

        assert_eq!(
            payload.flatten(),
            vec![
                "Ensure this field has no more than 15 characters.".to_string(),
                "Enter a valid email address.".to_string(),
            ]
        );
    }

    #[test]
    fn test_flatten_nested_and_non_field_errors() {
        let payload = ErrorPayload::Json(json!({
            "non_field_errors": ["You are already registered for this event."],
            "nested": {"inner": ["a", "b"]},
            "count": 3,
            "skipped": null
        }));

        assert_eq!(
            payload.flatten(),
            vec![
                "You are already registered for this event.",
                "a",
                "b",
                "3"
            ]
        );
    }

    #[test]
    fn test_is_validation() {
        let err = ApiError::Rejected {
            status: 400,
            payload: ErrorPayload::Json(json!({"city": ["This field is required."]})),
        };
        assert!(err.is_validation());
        assert_eq!(err.status(), Some(400));

        let err = ApiError::Rejected {
            status: 500,
            payload: ErrorPayload::Text("boom".to_string()),
        };
        assert!(!err.is_validation());
    }

    #[test]
    fn test_network_classification() {
        assert!(ApiError::Network("refused".to_string()).is_network());
        assert!(ApiError::InvalidUrl("no scheme".to_string()).is_network());
        assert!(!ApiError::Decode("eof".to_string()).is_network());
    }
}
