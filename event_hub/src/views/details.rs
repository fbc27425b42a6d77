//! Event details modal: a read-only projection of a fetched event.

use crate::models::Event;

/// Labelled rows of an event, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub rows: Vec<(&'static str, String)>,
}

impl EventDetails {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_label, _)| *row_label == label)
            .map(|(_, value)| value.as_str())
    }
}

impl From<&Event> for EventDetails {
    fn from(event: &Event) -> Self {
        let time = event
            .time
            .map_or_else(|| "TBA".to_string(), |time| time.format("%H:%M").to_string());
        let description = if event.description.trim().is_empty() {
            "No description provided.".to_string()
        } else {
            event.description.clone()
        };

        Self {
            title: event.title.clone(),
            rows: vec![
                ("Description", description),
                ("Date", event.date.format("%Y-%m-%d").to_string()),
                ("Time", time),
                ("Location", event.location.clone()),
                ("Type", event.event_type.clone()),
                ("Organizer", event.organizer.clone()),
                ("Capacity", event.capacity.to_string()),
                ("Event Code", event.event_code.clone()),
            ],
        }
    }
}
