//! API wrapper that logs every call with its timing.

use crate::logging::log_api_call;
use async_trait::async_trait;
use event_hub::api::{ApiResult, EventsApi, SharedApi};
use event_hub::models::{
    Credentials, Event, EventId, NewEvent, Profile, ProfileImage, Registration, SignupRequest,
    TokenPair,
};
use std::{future::Future, sync::Arc, time::Instant};

/// [`EventsApi`] decorator recording method, path, outcome and duration
pub struct TracedApi {
    inner: SharedApi,
}

impl TracedApi {
    pub fn new(inner: SharedApi) -> Self {
        Self { inner }
    }

    /// Wrap `inner` and return it as a shared handle
    pub fn shared(inner: SharedApi) -> SharedApi {
        Arc::new(Self::new(inner))
    }
}

async fn traced<T>(method: &str, path: &str, call: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
    let start = Instant::now();
    let result = call.await;
    log_api_call(method, path, result.as_ref().map(|_| ()), start.elapsed());
    result
}

#[async_trait]
impl EventsApi for TracedApi {
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        traced("POST", "/token/", self.inner.obtain_tokens(credentials)).await
    }

    async fn sign_up(&self, request: &SignupRequest) -> ApiResult<()> {
        traced("POST", "/register/", self.inner.sign_up(request)).await
    }

    async fn list_events(&self, token: Option<&str>) -> ApiResult<Vec<Event>> {
        traced("GET", "/events/", self.inner.list_events(token)).await
    }

    async fn create_event(&self, token: &str, event: &NewEvent) -> ApiResult<Event> {
        traced("POST", "/events/", self.inner.create_event(token, event)).await
    }

    async fn registration_count(&self, event_id: EventId) -> ApiResult<u32> {
        let path = format!("/events/{}/registration_count/", event_id);
        traced("GET", &path, self.inner.registration_count(event_id)).await
    }

    async fn register_for_event(
        &self,
        token: &str,
        event_id: EventId,
        registration: &Registration,
    ) -> ApiResult<()> {
        let path = format!("/events/{}/register/", event_id);
        traced(
            "POST",
            &path,
            self.inner.register_for_event(token, event_id, registration),
        )
        .await
    }

    async fn delete_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        let path = format!("/events/{}/", event_id);
        traced("DELETE", &path, self.inner.delete_event(token, event_id)).await
    }

    async fn unregister_from_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        let path = format!("/events/{}/register/", event_id);
        traced(
            "DELETE",
            &path,
            self.inner.unregister_from_event(token, event_id),
        )
        .await
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile> {
        traced("GET", "/profile/", self.inner.fetch_profile(token)).await
    }

    async fn upload_profile_picture(
        &self,
        token: &str,
        image: &ProfileImage,
    ) -> ApiResult<Profile> {
        traced(
            "PATCH",
            "/profile/",
            self.inner.upload_profile_picture(token, image),
        )
        .await
    }

    async fn clear_profile_picture(&self, token: &str) -> ApiResult<Profile> {
        traced("PATCH", "/profile/", self.inner.clear_profile_picture(token)).await
    }
}
