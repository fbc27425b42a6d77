//! Registration error types and failure messages.

use crate::api::{ApiError, ErrorPayload};
use thiserror::Error;

/// Shown when the server registered the attendee but could not send the email
pub const EMAIL_FAILURE_MESSAGE: &str = "Registration is unique, but an error occurred while sending the confirmation email. Please try again later.";
/// Shown when a rejection body has no messages in it
pub const GENERIC_FAILURE_MESSAGE: &str = "Registration failed. Please try again.";
/// Shown when no response, or a response without a body, was received
pub const NO_RESPONSE_MESSAGE: &str =
    "Registration failed. Please check your input and try again.";

/// Invalid transitions of the registration flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("A registration is already being submitted")]
    AlreadySubmitting,

    #[error("Registration already completed")]
    AlreadyRegistered,

    #[error("Registration has not completed")]
    NotCompleted,
}

/// Result type for registration flow operations
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// User-visible message for a failed registration submission.
///
/// A `detail` mentioning email means the registration was stored but the
/// confirmation email failed. Any other rejection has its messages flattened
/// one per line. An empty body is treated like no response at all.
pub fn failure_message(err: &ApiError) -> String {
    let payload = match err.payload() {
        None | Some(ErrorPayload::Empty) => return NO_RESPONSE_MESSAGE.to_string(),
        Some(payload) => payload,
    };

    if payload
        .detail()
        .is_some_and(|detail| detail.to_lowercase().contains("email"))
    {
        return EMAIL_FAILURE_MESSAGE.to_string();
    }

    let message = payload.flatten().join("\n");
    if message.is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejected(body: serde_json::Value) -> ApiError {
        ApiError::Rejected {
            status: 400,
            payload: ErrorPayload::Json(body),
        }
    }

    #[test]
    fn test_email_delivery_failure() {
        let err = rejected(json!({"detail": "SMTP error while sending Email"}));
        assert_eq!(failure_message(&err), EMAIL_FAILURE_MESSAGE);
    }

    #[test]
    fn test_detail_without_email_is_flattened() {
        let err = rejected(json!({"detail": "Not found."}));
        assert_eq!(failure_message(&err), "Not found.");
    }

    #[test]
    fn test_field_errors_joined_by_newline() {
        let err = rejected(json!({
            "email": ["Enter a valid email address."],
            "city": ["This field may not be blank."]
        }));
        assert_eq!(
            failure_message(&err),
            "Enter a valid email address.\nThis field may not be blank."
        );
    }

    #[test]
    fn test_capacity_error() {
        let err = rejected(json!({"error": "Event is at full capacity"}));
        assert_eq!(failure_message(&err), "Event is at full capacity");
    }

    #[test]
    fn test_empty_rejection_reads_as_no_response() {
        let err = ApiError::Rejected {
            status: 500,
            payload: ErrorPayload::Empty,
        };
        assert_eq!(failure_message(&err), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_body_without_messages() {
        assert_eq!(failure_message(&rejected(json!({}))), GENERIC_FAILURE_MESSAGE);
        assert_eq!(failure_message(&rejected(json!([]))), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_network_failure() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(failure_message(&err), NO_RESPONSE_MESSAGE);
    }
}
