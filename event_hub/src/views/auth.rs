//! Login and signup pages.

use super::Route;
use crate::api::{ApiError, EventsApi};
use crate::models::{Credentials, SignupRequest};
use crate::session::SessionStore;
use log::{error, info};

pub const NETWORK_ERROR_MESSAGE: &str = "Network or server error. Please try again.";
pub const LOGIN_FALLBACK_MESSAGE: &str = "Invalid credentials";
pub const SIGNUP_FALLBACK_MESSAGE: &str = "Signup failed. Please check your input.";
pub const SIGNUP_REQUIRED_MESSAGE: &str = "Username and password are required.";

/// Message for a failed login or signup request.
///
/// Tries, in order: no response, a bare string body, `detail`, `error`, and
/// finally every message in the body joined by spaces.
pub fn credential_error_message(err: &ApiError, fallback: &str) -> String {
    let Some(payload) = err.payload() else {
        return NETWORK_ERROR_MESSAGE.to_string();
    };

    if let Some(text) = payload.as_text() {
        return text.to_string();
    }
    if let Some(detail) = payload.detail() {
        return detail.to_string();
    }
    if let Some(error) = payload.error() {
        return error.to_string();
    }

    let messages = payload.flatten();
    if messages.is_empty() {
        fallback.to_string()
    } else {
        messages.join(" ")
    }
}

/// Login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Exchange credentials for tokens and store them.
    ///
    /// Returns the route to navigate to, or the message to show.
    pub async fn submit(&self, api: &dyn EventsApi, session: &SessionStore) -> Result<Route, String> {
        let credentials = Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };

        let tokens = api.obtain_tokens(&credentials).await.map_err(|e| {
            error!("Login failed for {}: {}", credentials.username, e);
            credential_error_message(&e, LOGIN_FALLBACK_MESSAGE)
        })?;

        session
            .set_tokens(&tokens.access, &tokens.refresh)
            .map_err(|e| {
                error!("Failed to store session: {}", e);
                format!("Logged in, but the session could not be saved: {}", e)
            })?;

        info!("Logged in as {}", credentials.username);
        Ok(Route::Listing)
    }
}

/// Signup form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub bio: String,
    pub location: String,
    pub interests: String,
}

impl SignupForm {
    /// Build the request; optional fields left blank are omitted
    pub fn to_request(&self) -> Result<SignupRequest, String> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(SIGNUP_REQUIRED_MESSAGE.to_string());
        }

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(SignupRequest {
            username: username.to_string(),
            password: self.password.clone(),
            email: optional(&self.email),
            full_name: optional(&self.full_name),
            phone_number: optional(&self.phone_number),
            bio: optional(&self.bio),
            location: optional(&self.location),
            interests: optional(&self.interests),
        })
    }

    /// Create the account and navigate to login
    pub async fn submit(&self, api: &dyn EventsApi) -> Result<Route, String> {
        let request = self.to_request()?;

        api.sign_up(&request).await.map_err(|e| {
            error!("Signup failed for {}: {}", request.username, e);
            credential_error_message(&e, SIGNUP_FALLBACK_MESSAGE)
        })?;

        info!("Created account {}", request.username);
        Ok(Route::Login)
    }
}
