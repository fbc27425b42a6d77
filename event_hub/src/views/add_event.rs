//! Add Event page.

use super::{LoginRequired, Route};
use crate::api::EventsApi;
use crate::models::{Event, NewEvent};
use crate::session::SessionStore;
use chrono::{NaiveDate, NaiveTime};
use log::{error, info};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const CREATE_ERROR_MESSAGE: &str = "Error creating event. Please try again.";

/// Event types offered in the type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTypeChoice {
    Conference,
    Workshop,
    NetworkingEvent,
    Webinar,
    Concert,
    SportsEvent,
    /// Reveals a free-text type field
    Other,
}

impl EventTypeChoice {
    pub const ALL: [EventTypeChoice; 7] = [
        EventTypeChoice::Conference,
        EventTypeChoice::Workshop,
        EventTypeChoice::NetworkingEvent,
        EventTypeChoice::Webinar,
        EventTypeChoice::Concert,
        EventTypeChoice::SportsEvent,
        EventTypeChoice::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventTypeChoice::Conference => "Conference",
            EventTypeChoice::Workshop => "Workshop",
            EventTypeChoice::NetworkingEvent => "Networking Event",
            EventTypeChoice::Webinar => "Webinar",
            EventTypeChoice::Concert => "Concert",
            EventTypeChoice::SportsEvent => "Sports Event",
            EventTypeChoice::Other => "Other",
        }
    }
}

impl fmt::Display for EventTypeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventTypeChoice {
    type Err = FormError;

    /// Accepts a label (case-insensitive) or a 1-based position in [`Self::ALL`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(position) = trimmed.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|idx| Self::ALL.get(idx).copied())
                .ok_or_else(|| FormError::InvalidEventType(trimmed.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FormError::InvalidEventType(trimmed.to_string()))
    }
}

/// Client-side validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Use HH:MM")]
    InvalidTime(String),

    #[error("Invalid capacity '{0}'. Must be a whole number of 0 or more")]
    InvalidCapacity(String),

    #[error("Unknown event type '{0}'")]
    InvalidEventType(String),
}

/// Add Event form as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub event_type: Option<EventTypeChoice>,
    /// Only shown and used when `event_type` is `Other`
    pub custom_event_type: String,
    pub organizer: String,
    pub capacity: String,
}

impl EventForm {
    pub fn shows_custom_type(&self) -> bool {
        self.event_type == Some(EventTypeChoice::Other)
    }

    /// Type sent to the server: the custom text replaces "Other"
    pub fn resolved_event_type(&self) -> Option<String> {
        match self.event_type? {
            EventTypeChoice::Other => {
                let custom = self.custom_event_type.trim();
                (!custom.is_empty()).then(|| custom.to_string())
            }
            choice => Some(choice.label().to_string()),
        }
    }

    /// Validate required fields and build the create payload
    pub fn to_new_event(&self) -> Result<NewEvent, FormError> {
        let title = required(&self.title, "Title")?;
        let description = required(&self.description, "Description")?;
        let date = required(&self.date, "Date")?;
        let time = required(&self.time, "Time")?;
        let location = required(&self.location, "Location")?;
        let event_type = match self.event_type {
            None => return Err(FormError::Missing("Event Type")),
            Some(_) => self
                .resolved_event_type()
                .ok_or(FormError::Missing("Custom Event Type"))?,
        };
        let organizer = required(&self.organizer, "Organizer")?;
        let capacity = required(&self.capacity, "Capacity")?;

        Ok(NewEvent {
            title,
            description,
            date: parse_date(&date)?,
            time: Some(parse_time(&time)?),
            location,
            event_type,
            organizer,
            capacity: parse_capacity(&capacity)?,
        })
    }
}

/// `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(value.trim().to_string()))
}

/// `HH:MM`, seconds optional
pub fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| FormError::InvalidTime(value.to_string()))
}

pub fn parse_capacity(value: &str) -> Result<u32, FormError> {
    let value = value.trim();
    value
        .parse::<u32>()
        .map_err(|_| FormError::InvalidCapacity(value.to_string()))
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Result of submitting the Add Event form
#[derive(Debug, Clone, PartialEq)]
pub enum AddEventOutcome {
    /// Created; navigate to the route
    Created { event: Event, route: Route },
    /// Client-side validation failed; nothing was sent
    Invalid(FormError),
    /// Server rejected or unreachable; the form is kept
    Failed(String),
    /// No session token; nothing was sent
    LoginRequired(LoginRequired),
}

/// Validate and submit the form
pub async fn submit_event(
    form: &EventForm,
    api: &dyn EventsApi,
    session: &SessionStore,
) -> AddEventOutcome {
    let Some(token) = session.get_token() else {
        return AddEventOutcome::LoginRequired(LoginRequired);
    };

    let new_event = match form.to_new_event() {
        Ok(new_event) => new_event,
        Err(e) => return AddEventOutcome::Invalid(e),
    };

    match api.create_event(&token, &new_event).await {
        Ok(event) => {
            info!("Created event {} ({})", event.id, event.title);
            AddEventOutcome::Created {
                event,
                route: Route::Listing,
            }
        }
        Err(e) => {
            error!("Error creating event: {}", e);
            AddEventOutcome::Failed(CREATE_ERROR_MESSAGE.to_string())
        }
    }
}
