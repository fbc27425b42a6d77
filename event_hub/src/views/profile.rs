//! Profile page.
//!
//! Shows the current user's profile with two independent tables: events they
//! created and events they registered for. Every mutation is confirmed by the
//! server and followed by a full re-fetch; failures are logged and leave the
//! page as it was.

use super::Route;
use crate::api::{ApiResult, EventsApi, SharedApi};
use crate::capacity::CapacityBoard;
use crate::models::{Event, EventId, Profile, ProfileImage};
use crate::request::{RequestTicket, RequestTracker};
use crate::session::{LocalImageCache, SessionStore};
use log::{debug, error, info, warn};

pub const PROFILE_ERROR_MESSAGE: &str = "Failed to fetch profile.";

/// Render states of the profile page
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    Loading,
    /// No session token; nothing was fetched
    RedirectToLogin,
    Error(String),
    Loaded(Profile),
}

/// Where the avatar image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    /// Server picture, as an absolute URL
    Remote(String),
    /// Locally cached data URL; the server has no picture
    Local(String),
    None,
}

pub struct ProfileView {
    state: ProfileState,
    tracker: RequestTracker,
    images: LocalImageCache,
    api_base: String,
    local_image: Option<String>,
    /// Capacity of each created event
    pub capacities: CapacityBoard,
}

impl ProfileView {
    /// `api_base` resolves server-relative picture paths
    pub fn new(session: &SessionStore, api_base: impl Into<String>) -> Self {
        Self {
            state: ProfileState::Loading,
            tracker: RequestTracker::new(),
            images: LocalImageCache::new(session.store()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            local_image: None,
            capacities: CapacityBoard::new(),
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn profile(&self) -> Option<&Profile> {
        match &self.state {
            ProfileState::Loaded(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn created_events(&self) -> &[Event] {
        self.profile()
            .map_or(&[], |profile| profile.created_events.as_slice())
    }

    pub fn registered_events(&self) -> &[Event] {
        self.profile()
            .map_or(&[], |profile| profile.registered_events.as_slice())
    }

    fn username(&self) -> String {
        self.profile()
            .map(|profile| profile.username.clone())
            .unwrap_or_default()
    }

    /// Start a fetch. Returns the token and ticket, or `None` after switching
    /// to [`ProfileState::RedirectToLogin`] when logged out.
    pub fn begin_load(&mut self, session: &SessionStore) -> Option<(String, RequestTicket)> {
        let Some(token) = session.get_token() else {
            self.tracker.cancel();
            self.state = ProfileState::RedirectToLogin;
            return None;
        };
        if self.profile().is_none() {
            self.state = ProfileState::Loading;
        }
        Some((token, self.tracker.begin()))
    }

    /// Apply a fetch result. Returns `false` if the ticket is stale.
    pub fn apply(&mut self, ticket: RequestTicket, result: ApiResult<Profile>) -> bool {
        if !self.tracker.finish(ticket) {
            debug!("Discarding stale profile response");
            return false;
        }

        match result {
            Ok(profile) => {
                self.local_image = self.images.load(&profile.username);
                self.capacities.retain_events(&profile.created_events);
                self.state = ProfileState::Loaded(profile);
            }
            Err(e) => {
                error!("Error fetching profile: {}", e);
                self.state = ProfileState::Error(PROFILE_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Fetch the profile. Returns `Some(Route::Login)` when logged out.
    pub async fn load(&mut self, api: &dyn EventsApi, session: &SessionStore) -> Option<Route> {
        let Some((token, ticket)) = self.begin_load(session) else {
            return Some(Route::Login);
        };
        let result = api.fetch_profile(&token).await;
        self.apply(ticket, result);
        None
    }

    /// Fetch the profile and the capacity of every created event
    pub async fn load_with_capacities(
        &mut self,
        api: &SharedApi,
        session: &SessionStore,
    ) -> Option<Route> {
        if let Some(route) = self.load(api.as_ref(), session).await {
            return Some(route);
        }
        let created = self.created_events().to_vec();
        self.capacities.refresh_all(api, &created).await;
        None
    }

    /// Token for a mutation, or redirect to login without one
    pub fn begin_mutation(&mut self, session: &SessionStore) -> Option<String> {
        let token = session.get_token();
        if token.is_none() {
            self.tracker.cancel();
            self.state = ProfileState::RedirectToLogin;
        }
        token
    }

    /// Keep a local copy of `image` for when the server has none
    pub fn cache_image(&mut self, image: &ProfileImage) {
        let username = self.username();
        match self.images.save(&username, image) {
            Ok(url) => self.local_image = Some(url),
            Err(e) => warn!("Could not cache profile image locally: {}", e),
        }
    }

    /// Drop the local image copy
    pub fn forget_image(&mut self) {
        let username = self.username();
        if let Err(e) = self.images.remove(&username) {
            warn!("Could not remove cached profile image: {}", e);
        }
        self.local_image = None;
    }

    /// Replace the profile picture. A local copy is cached first.
    ///
    /// Returns whether the server accepted the change.
    pub async fn upload_image(
        &mut self,
        api: &dyn EventsApi,
        session: &SessionStore,
        image: &ProfileImage,
    ) -> bool {
        let Some(token) = self.begin_mutation(session) else {
            return false;
        };

        self.cache_image(image);

        if let Err(e) = api.upload_profile_picture(&token, image).await {
            error!("Error uploading image: {}", e);
            return false;
        }
        info!("Uploaded profile picture {}", image.file_name);
        self.load(api, session).await;
        true
    }

    /// Clear the profile picture on the server and the local copy
    pub async fn clear_image(&mut self, api: &dyn EventsApi, session: &SessionStore) -> bool {
        let Some(token) = self.begin_mutation(session) else {
            return false;
        };

        if let Err(e) = api.clear_profile_picture(&token).await {
            error!("Error deleting image: {}", e);
            return false;
        }

        self.forget_image();
        self.load(api, session).await;
        true
    }

    /// Delete an event this user created
    pub async fn delete_event(
        &mut self,
        api: &dyn EventsApi,
        session: &SessionStore,
        event_id: EventId,
    ) -> bool {
        let Some(token) = self.begin_mutation(session) else {
            return false;
        };

        if let Err(e) = api.delete_event(&token, event_id).await {
            error!("Error deleting event {}: {}", event_id, e);
            return false;
        }
        info!("Deleted event {}", event_id);
        self.capacities.unmount(event_id);
        self.load(api, session).await;
        true
    }

    /// Remove this user's registration for an event
    pub async fn unregister(
        &mut self,
        api: &dyn EventsApi,
        session: &SessionStore,
        event_id: EventId,
    ) -> bool {
        let Some(token) = self.begin_mutation(session) else {
            return false;
        };

        if let Err(e) = api.unregister_from_event(&token, event_id).await {
            error!("Error unregistering from event {}: {}", event_id, e);
            return false;
        }
        info!("Unregistered from event {}", event_id);
        self.load(api, session).await;
        true
    }

    /// Avatar to show: the server picture, else the local copy
    pub fn avatar(&self) -> AvatarSource {
        if let Some(picture) = self.profile().and_then(|p| p.profile_picture.as_deref()) {
            return AvatarSource::Remote(self.image_url(picture));
        }
        match &self.local_image {
            Some(local) => AvatarSource::Local(local.clone()),
            None => AvatarSource::None,
        }
    }

    /// Whether the avatar exists only in the local cache
    pub fn showing_local(&self) -> bool {
        matches!(self.avatar(), AvatarSource::Local(_))
    }

    fn image_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
            return url.to_string();
        }
        format!("{}/{}", self.api_base, url.trim_start_matches('/'))
    }
}
