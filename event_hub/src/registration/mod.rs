//! Event registration modal.
//!
//! The flow is a small state machine:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Success ──(delay)──▶ closed, back to listing
//!                      │
//!                      ▼
//!                   Failed ──submit──▶ Submitting
//! ```
//!
//! Opening the modal and submitting both require a session token; without
//! one the caller is sent to the login prompt and nothing is sent.

pub mod errors;
pub mod flow;

pub use errors::{RegistrationError, RegistrationResult, failure_message};
pub use flow::{RegistrationFlow, RegistrationState, SubmitOutcome};
