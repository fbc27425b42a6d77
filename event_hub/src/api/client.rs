//! HTTP API client for the events server.

use super::{ApiError, ApiResult, ErrorPayload, EventsApi};
use crate::models::{
    Credentials, Event, EventId, NewEvent, Profile, ProfileImage, Registration,
    RegistrationCount, SignupRequest, TokenPair,
};
use async_trait::async_trait;
use log::debug;
use reqwest::{RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;

/// reqwest-backed [`EventsApi`]
#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEventsApi {
    /// Create a new API client. Trailing slashes on `base_url` are ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// Base URL every path is joined to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into [`ApiError::Rejected`]
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("{} -> {}", response.url().path(), status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
        Err(ApiError::Rejected {
            status: status.as_u16(),
            payload: ErrorPayload::from_body(&body),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        let request = self.client.post(self.url("/token/")).json(credentials);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn sign_up(&self, request: &SignupRequest) -> ApiResult<()> {
        let request = self.client.post(self.url("/register/")).json(request);
        self.send(request).await?;
        Ok(())
    }

    async fn list_events(&self, token: Option<&str>) -> ApiResult<Vec<Event>> {
        let request = Self::authorized(self.client.get(self.url("/events/")), token);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn create_event(&self, token: &str, event: &NewEvent) -> ApiResult<Event> {
        let request = self
            .client
            .post(self.url("/events/"))
            .bearer_auth(token)
            .json(event);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn registration_count(&self, event_id: EventId) -> ApiResult<u32> {
        let request = self
            .client
            .get(self.url(&format!("/events/{}/registration_count/", event_id)));
        let response = self.send(request).await?;
        let count: RegistrationCount = Self::read_json(response).await?;
        Ok(count.registration_count)
    }

    async fn register_for_event(
        &self,
        token: &str,
        event_id: EventId,
        registration: &Registration,
    ) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url(&format!("/events/{}/register/", event_id)))
            .bearer_auth(token)
            .json(registration);
        self.send(request).await?;
        Ok(())
    }

    async fn delete_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/events/{}/", event_id)))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }

    async fn unregister_from_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/events/{}/register/", event_id)))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile> {
        let request = self.client.get(self.url("/profile/")).bearer_auth(token);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn upload_profile_picture(
        &self,
        token: &str,
        image: &ProfileImage,
    ) -> ApiResult<Profile> {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        let form = multipart::Form::new().part("profile_picture", part);

        let request = self
            .client
            .patch(self.url("/profile/"))
            .bearer_auth(token)
            .multipart(form);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn clear_profile_picture(&self, token: &str) -> ApiResult<Profile> {
        let request = self
            .client
            .patch(self.url("/profile/"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "profile_picture": null }));
        let response = self.send(request).await?;
        Self::read_json(response).await
    }
}
