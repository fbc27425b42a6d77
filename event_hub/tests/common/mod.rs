//! In-memory events API shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use event_hub::api::{ApiError, ApiResult, ErrorPayload, EventsApi};
use event_hub::models::{
    Credentials, Event, EventId, NewEvent, Profile, ProfileImage, Registration, SignupRequest,
    TokenPair,
};
use event_hub::storage::MemoryStore;
use event_hub::SessionStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One recorded call: endpoint name and the token it carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: &'static str,
    pub token: Option<String>,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    counts: HashMap<EventId, u32>,
    profile: Profile,
    calls: Vec<Call>,
    registrations: Vec<(EventId, Registration)>,
    fail_next: HashMap<&'static str, ApiError>,
    next_id: EventId,
}

/// Fake API backed by a mutex-guarded state
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.next_id = 100;
            state.profile.username = "alice".to_string();
        }
        Arc::new(api)
    }

    pub fn with_events(events: Vec<Event>) -> Arc<Self> {
        let api = Self::new();
        api.state.lock().unwrap().events = events;
        api
    }

    pub fn set_count(&self, event_id: EventId, count: u32) {
        self.state.lock().unwrap().counts.insert(event_id, count);
    }

    pub fn set_profile(&self, profile: Profile) {
        self.state.lock().unwrap().profile = profile;
    }

    /// Make the next call to `endpoint` fail with `error`
    pub fn fail_next(&self, endpoint: &'static str, error: ApiError) {
        self.state.lock().unwrap().fail_next.insert(endpoint, error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint == endpoint)
            .collect()
    }

    pub fn registrations(&self) -> Vec<(EventId, Registration)> {
        self.state.lock().unwrap().registrations.clone()
    }

    fn record(&self, endpoint: &'static str, token: Option<&str>) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            endpoint,
            token: token.map(str::to_string),
        });
        match state.fail_next.remove(endpoint) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EventsApi for FakeApi {
    async fn obtain_tokens(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        self.record("obtain_tokens", None)?;
        if credentials.password != "secret" {
            return Err(rejected(
                401,
                serde_json::json!({"detail": "No active account found with the given credentials"}),
            ));
        }
        Ok(TokenPair {
            access: format!("access-{}", credentials.username),
            refresh: format!("refresh-{}", credentials.username),
        })
    }

    async fn sign_up(&self, _request: &SignupRequest) -> ApiResult<()> {
        self.record("sign_up", None)
    }

    async fn list_events(&self, token: Option<&str>) -> ApiResult<Vec<Event>> {
        self.record("list_events", token)?;
        Ok(self.state.lock().unwrap().events.clone())
    }

    async fn create_event(&self, token: &str, event: &NewEvent) -> ApiResult<Event> {
        self.record("create_event", Some(token))?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;

        let created = Event {
            id,
            user: Some(state.profile.username.clone()),
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            time: event.time,
            location: event.location.clone(),
            event_type: event.event_type.clone(),
            organizer: event.organizer.clone(),
            capacity: event.capacity,
            event_code: format!("#CODE{}", id),
        };
        state.events.push(created.clone());
        state.profile.created_events.push(created.clone());
        Ok(created)
    }

    async fn registration_count(&self, event_id: EventId) -> ApiResult<u32> {
        self.record("registration_count", None)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .counts
            .get(&event_id)
            .copied()
            .unwrap_or(0))
    }

    async fn register_for_event(
        &self,
        token: &str,
        event_id: EventId,
        registration: &Registration,
    ) -> ApiResult<()> {
        self.record("register_for_event", Some(token))?;
        let mut state = self.state.lock().unwrap();
        state.registrations.push((event_id, registration.clone()));
        *state.counts.entry(event_id).or_insert(0) += 1;
        Ok(())
    }

    async fn delete_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        self.record("delete_event", Some(token))?;
        let mut state = self.state.lock().unwrap();
        state.events.retain(|event| event.id != event_id);
        state.profile.created_events.retain(|event| event.id != event_id);
        Ok(())
    }

    async fn unregister_from_event(&self, token: &str, event_id: EventId) -> ApiResult<()> {
        self.record("unregister_from_event", Some(token))?;
        self.state
            .lock()
            .unwrap()
            .profile
            .registered_events
            .retain(|event| event.id != event_id);
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Profile> {
        self.record("fetch_profile", Some(token))?;
        Ok(self.state.lock().unwrap().profile.clone())
    }

    async fn upload_profile_picture(
        &self,
        token: &str,
        image: &ProfileImage,
    ) -> ApiResult<Profile> {
        self.record("upload_profile_picture", Some(token))?;
        let mut state = self.state.lock().unwrap();
        state.profile.profile_picture = Some(format!("/media/profile_pics/{}", image.file_name));
        Ok(state.profile.clone())
    }

    async fn clear_profile_picture(&self, token: &str) -> ApiResult<Profile> {
        self.record("clear_profile_picture", Some(token))?;
        let mut state = self.state.lock().unwrap();
        state.profile.profile_picture = None;
        Ok(state.profile.clone())
    }
}

pub fn rejected(status: u16, body: serde_json::Value) -> ApiError {
    ApiError::Rejected {
        status,
        payload: ErrorPayload::Json(body),
    }
}

pub fn event(id: EventId, capacity: u32) -> Event {
    Event {
        id,
        user: Some("alice".to_string()),
        title: format!("Event {}", id),
        description: "Something to attend".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        time: None,
        location: "Main Hall".to_string(),
        event_type: "Workshop".to_string(),
        organizer: "Rust Club".to_string(),
        capacity,
        event_code: format!("#E{}", id),
    }
}

pub fn logged_out() -> SessionStore {
    SessionStore::new(Arc::new(MemoryStore::new()))
}

pub fn logged_in() -> SessionStore {
    let session = logged_out();
    session.set_tokens("token-abc", "refresh-abc").unwrap();
    session
}
