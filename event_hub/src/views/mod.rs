//! Page view models.
//!
//! Each page owns its fetched data and exposes a small state enum for the
//! front end to render. Navigation is expressed as a returned [`Route`];
//! pages that need a token return [`LoginRequired`] instead of calling the
//! API without one.

pub mod add_event;
pub mod auth;
pub mod details;
pub mod listing;
pub mod profile;

pub use add_event::{AddEventOutcome, EventForm, EventTypeChoice, FormError};
pub use auth::{LoginForm, SignupForm};
pub use details::EventDetails;
pub use listing::{ListingState, ListingView};
pub use profile::{AvatarSource, ProfileState, ProfileView};

use std::fmt;
use thiserror::Error;

/// Pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Listing,
    Login,
    Signup,
    AddEvent,
    Profile,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Listing => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Signup => write!(f, "/signup"),
            Route::AddEvent => write!(f, "/add-event"),
            Route::Profile => write!(f, "/profile"),
        }
    }
}

/// An action needed a session token and none is stored.
///
/// Front ends show the login prompt; no request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("You need to be logged in to do that")]
pub struct LoginRequired;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient message surfaced outside the page (snackbar)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}
