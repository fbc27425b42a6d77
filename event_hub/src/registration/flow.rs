//! Registration flow state machine.

use super::errors::{RegistrationError, RegistrationResult, failure_message};
use crate::api::EventsApi;
use crate::models::{Event, Registration};
use crate::session::SessionStore;
use crate::views::{LoginRequired, Notification, Route};
use log::{error, info};
use std::time::Duration;

/// How long the success message stays up before the modal closes
pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_secs(5);

pub const SUBMITTING_MESSAGE: &str = "Submitting your registration... Please wait.";
pub const SUCCESS_MESSAGE: &str =
    "Registration successful! Your QR code invitation has been sent.";
pub const SUCCESS_NOTIFICATION: &str = "Registration QR Successfully Sent To Email Address";

/// Where the modal is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Idle,
    Submitting,
    /// Terminal for this modal instance
    Success,
    /// Entered values are kept so the user can correct and resubmit
    Failed,
}

/// Result of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registered; surface the notification and then call `finish`
    Registered(Notification),
    /// Rejected or unreachable; the message is also held as feedback
    Failed(String),
    /// No session token; show the login prompt. Nothing was sent.
    LoginRequired,
}

/// One open registration modal for one event
#[derive(Debug)]
pub struct RegistrationFlow {
    event: Event,
    /// Attendee fields as entered
    pub form: Registration,
    state: RegistrationState,
    feedback: Option<String>,
    success_delay: Duration,
}

impl RegistrationFlow {
    /// Open the modal for `event` with default field values.
    ///
    /// # Errors
    ///
    /// Returns [`LoginRequired`] when no session token is stored.
    pub fn open(
        event: Event,
        session: &SessionStore,
        success_delay: Duration,
    ) -> Result<Self, LoginRequired> {
        if !session.is_authenticated() {
            return Err(LoginRequired);
        }

        Ok(Self {
            event,
            form: Registration::default(),
            state: RegistrationState::Idle,
            feedback: None,
            success_delay,
        })
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// Message currently shown inside the modal
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn success_delay(&self) -> Duration {
        self.success_delay
    }

    /// Submit the entered fields against this event.
    ///
    /// # Errors
    ///
    /// Returns an error if a submission is already in flight or the
    /// registration already succeeded.
    pub async fn submit(
        &mut self,
        api: &dyn EventsApi,
        session: &SessionStore,
    ) -> RegistrationResult<SubmitOutcome> {
        match self.state {
            RegistrationState::Submitting => return Err(RegistrationError::AlreadySubmitting),
            RegistrationState::Success => return Err(RegistrationError::AlreadyRegistered),
            RegistrationState::Idle | RegistrationState::Failed => {}
        }

        let Some(token) = session.get_token() else {
            return Ok(SubmitOutcome::LoginRequired);
        };

        self.state = RegistrationState::Submitting;
        self.feedback = Some(SUBMITTING_MESSAGE.to_string());

        match api
            .register_for_event(&token, self.event.id, &self.form)
            .await
        {
            Ok(()) => {
                info!("Registered for event {}", self.event.id);
                self.state = RegistrationState::Success;
                self.feedback = Some(SUCCESS_MESSAGE.to_string());
                Ok(SubmitOutcome::Registered(Notification::success(
                    SUCCESS_NOTIFICATION,
                )))
            }
            Err(e) => {
                error!("Error during registration for event {}: {}", self.event.id, e);
                let message = failure_message(&e);
                self.state = RegistrationState::Failed;
                self.feedback = Some(message.clone());
                Ok(SubmitOutcome::Failed(message))
            }
        }
    }

    /// Hold the success message for the display duration, then close the
    /// modal and return to the listing.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotCompleted`] unless the flow succeeded.
    pub async fn finish(self) -> RegistrationResult<Route> {
        if self.state != RegistrationState::Success {
            return Err(RegistrationError::NotCompleted);
        }
        tokio::time::sleep(self.success_delay).await;
        Ok(Route::Listing)
    }
}
