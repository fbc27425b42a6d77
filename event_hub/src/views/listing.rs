//! Home page: the event listing.

use super::{LoginRequired, Route};
use crate::api::{ApiResult, EventsApi, SharedApi};
use crate::capacity::CapacityBoard;
use crate::models::{Event, EventId};
use crate::request::{RequestTicket, RequestTracker};
use crate::session::SessionStore;
use log::{debug, error, info};

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load events. Please try again later.";

/// Mutually exclusive render states of the listing
#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Loading,
    Error(String),
    Empty,
    Populated(Vec<Event>),
}

/// Event listing with one capacity indicator per card
pub struct ListingView {
    state: ListingState,
    tracker: RequestTracker,
    /// Capacity indicators of the listed events
    pub capacities: CapacityBoard,
}

impl Default for ListingView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingView {
    pub fn new() -> Self {
        Self {
            state: ListingState::Loading,
            tracker: RequestTracker::new(),
            capacities: CapacityBoard::new(),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// Listed events; empty unless populated
    pub fn events(&self) -> &[Event] {
        match &self.state {
            ListingState::Populated(events) => events,
            _ => &[],
        }
    }

    /// Event at a 0-based position of the listing
    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events().get(index)
    }

    pub fn find(&self, event_id: EventId) -> Option<&Event> {
        self.events().iter().find(|event| event.id == event_id)
    }

    /// Enter the loading state and issue a ticket for the fetch
    pub fn begin_load(&mut self) -> RequestTicket {
        self.state = ListingState::Loading;
        self.tracker.begin()
    }

    /// Apply a fetch result. Returns `false` if the ticket is stale.
    pub fn apply(&mut self, ticket: RequestTicket, result: ApiResult<Vec<Event>>) -> bool {
        if !self.tracker.finish(ticket) {
            debug!("Discarding stale event listing response");
            return false;
        }

        self.state = match result {
            Ok(events) if events.is_empty() => ListingState::Empty,
            Ok(events) => ListingState::Populated(events),
            Err(e) => {
                error!("Error fetching events: {}", e);
                ListingState::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        };
        let events = self.events().to_vec();
        self.capacities.retain_events(&events);
        true
    }

    /// Fetch events, authenticated only if a token is stored
    pub async fn load(&mut self, api: &dyn EventsApi, session: &SessionStore) {
        let ticket = self.begin_load();
        let token = session.get_token();
        let result = api.list_events(token.as_deref()).await;
        self.apply(ticket, result);
    }

    /// Fetch events and then every card's registration count
    pub async fn load_with_capacities(&mut self, api: &SharedApi, session: &SessionStore) {
        self.load(api.as_ref(), session).await;
        let events = self.events().to_vec();
        self.capacities.refresh_all(api, &events).await;
    }

    /// Drop in-flight work; late responses are discarded
    pub fn close(&mut self) {
        self.tracker.cancel();
        self.capacities.retain_events(&[]);
    }
}

/// Navigate to a page that needs a session, or prompt for login
pub fn guard_navigation(session: &SessionStore, route: Route) -> Result<Route, LoginRequired> {
    match route {
        Route::AddEvent | Route::Profile if !session.is_authenticated() => Err(LoginRequired),
        route => Ok(route),
    }
}

/// Clear both tokens and return to the listing
pub fn logout(session: &SessionStore) -> Route {
    match session.clear() {
        Ok(()) => info!("Logged out"),
        Err(e) => error!("Failed to clear session: {}", e),
    }
    Route::Listing
}
