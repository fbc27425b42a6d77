//! Events API boundary.
//!
//! Views and flows talk to the remote REST API through the [`EventsApi`]
//! trait. Tokens are passed explicitly: the caller decides whether a request
//! is authenticated, and guards that need a token never reach the trait
//! without one. [`HttpEventsApi`] is the reqwest-backed implementation.
//!
//! ## Example
//!
//! ```no_run
//! use event_hub::api::{EventsApi, HttpEventsApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpEventsApi::new("http://127.0.0.1:8000/api");
//!     for event in api.list_events(None).await? {
//!         println!("{} on {}", event.title, event.date);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;

pub use client::HttpEventsApi;
pub use errors::{ApiError, ApiResult, ErrorPayload};

use crate::models::{
    Credentials, Event, EventId, NewEvent, Profile, ProfileImage, Registration, SignupRequest,
    TokenPair,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to an API implementation
pub type SharedApi = Arc<dyn EventsApi>;

/// Calls made against the remote events API
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// `POST /token/`
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair>;

    /// `POST /register/`
    async fn sign_up(&self, request: &SignupRequest) -> ApiResult<()>;

    /// `GET /events/`, authenticated only when a token is given
    async fn list_events(&self, token: Option<&str>) -> ApiResult<Vec<Event>>;

    /// `POST /events/`
    async fn create_event(&self, token: &str, event: &NewEvent) -> ApiResult<Event>;

    /// `GET /events/{id}/registration_count/`
    async fn registration_count(&self, event_id: EventId) -> ApiResult<u32>;

    /// `POST /events/{id}/register/`
    async fn register_for_event(
        &self,
        token: &str,
        event_id: EventId,
        registration: &Registration,
    ) -> ApiResult<()>;

    /// `DELETE /events/{id}/`
    async fn delete_event(&self, token: &str, event_id: EventId) -> ApiResult<()>;

    /// `DELETE /events/{id}/register/`
    async fn unregister_from_event(&self, token: &str, event_id: EventId) -> ApiResult<()>;

    /// `GET /profile/`
    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile>;

    /// `PATCH /profile/` as multipart with a `profile_picture` file
    async fn upload_profile_picture(&self, token: &str, image: &ProfileImage)
    -> ApiResult<Profile>;

    /// `PATCH /profile/` with `{"profile_picture": null}`
    async fn clear_profile_picture(&self, token: &str) -> ApiResult<Profile>;
}
