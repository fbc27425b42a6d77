//! Capacity indicator.
//!
//! A [`CapacitySnapshot`] combines an event's declared capacity with its
//! registration count, fetched separately per card. Snapshots are derived on
//! every fetch and never cached across views.
//!
//! A capacity of zero renders as full: the server refuses registrations once
//! the count reaches capacity, so such an event can never take an attendee.

use crate::api::{ApiResult, EventsApi, SharedApi};
use crate::models::{Event, EventId};
use crate::request::{RequestTicket, RequestTracker};
use log::{debug, warn};
use std::{collections::HashMap, fmt, sync::Arc};
use tokio::task::JoinSet;

/// Styling bucket of the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FillLevel {
    /// Under 50%
    Low,
    /// 50% to under 80%
    Moderate,
    /// 80% to under 100%
    High,
    /// 100%
    Full,
}

impl FillLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            FillLevel::Full
        } else if percentage >= 80.0 {
            FillLevel::High
        } else if percentage >= 50.0 {
            FillLevel::Moderate
        } else {
            FillLevel::Low
        }
    }
}

/// Capacity against registrations for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitySnapshot {
    pub capacity: u32,
    pub registration_count: u32,
    /// False when the count could not be fetched and zero is shown instead
    pub count_known: bool,
}

impl CapacitySnapshot {
    pub fn new(capacity: u32, registration_count: u32) -> Self {
        Self {
            capacity,
            registration_count,
            count_known: true,
        }
    }

    /// Snapshot shown when the registration count is unavailable
    pub fn unknown(capacity: u32) -> Self {
        Self {
            capacity,
            registration_count: 0,
            count_known: false,
        }
    }

    /// `capacity - registration_count`; negative when overbooked
    pub fn slots_remaining(&self) -> i64 {
        i64::from(self.capacity) - i64::from(self.registration_count)
    }

    /// Share of capacity taken, clamped to 100
    pub fn percentage(&self) -> f64 {
        if self.capacity == 0 {
            return 100.0;
        }
        let ratio = f64::from(self.registration_count) / f64::from(self.capacity) * 100.0;
        ratio.min(100.0)
    }

    /// Percentage rounded for display
    pub fn rounded_percentage(&self) -> u8 {
        self.percentage().round() as u8
    }

    pub fn fill_level(&self) -> FillLevel {
        FillLevel::from_percentage(self.percentage())
    }

    pub fn is_full(&self) -> bool {
        self.fill_level() == FillLevel::Full
    }

    /// Remaining slots for display: never below zero, excess labelled
    pub fn slots_label(&self) -> String {
        match self.slots_remaining() {
            n if n < 0 => format!("0 (overbooked by {})", -n),
            n => n.to_string(),
        }
    }
}

impl fmt::Display for CapacitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Capacity: {} | Slots Remaining: {}",
            self.capacity,
            self.slots_label()
        )?;
        if !self.count_known {
            write!(f, " (count unavailable)")?;
        }
        Ok(())
    }
}

/// Fetch the registration count and build a snapshot, degrading on failure
pub async fn fetch_capacity(
    api: &dyn EventsApi,
    event_id: EventId,
    capacity: u32,
) -> CapacitySnapshot {
    snapshot_from(event_id, capacity, api.registration_count(event_id).await)
}

fn snapshot_from(event_id: EventId, capacity: u32, result: ApiResult<u32>) -> CapacitySnapshot {
    match result {
        Ok(count) => CapacitySnapshot::new(capacity, count),
        Err(e) => {
            warn!("Error fetching registration count for event {}: {}", event_id, e);
            CapacitySnapshot::unknown(capacity)
        }
    }
}

struct Indicator {
    capacity: u32,
    tracker: RequestTracker,
    snapshot: Option<CapacitySnapshot>,
}

/// Capacity indicators of the cards currently on screen.
///
/// Each card fetches independently. Responses for cards that have been
/// unmounted, or superseded by a newer fetch, are dropped.
#[derive(Default)]
pub struct CapacityBoard {
    indicators: HashMap<EventId, Indicator>,
}

impl CapacityBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an indicator for `event_id` and begin its count request
    pub fn mount(&mut self, event_id: EventId, capacity: u32) -> RequestTicket {
        let indicator = self.indicators.entry(event_id).or_insert(Indicator {
            capacity,
            tracker: RequestTracker::new(),
            snapshot: None,
        });
        indicator.capacity = capacity;
        indicator.tracker.begin()
    }

    /// Remove an indicator; its in-flight response will be discarded
    pub fn unmount(&mut self, event_id: EventId) {
        self.indicators.remove(&event_id);
    }

    /// Unmount every indicator whose event is not in `events`
    pub fn retain_events(&mut self, events: &[Event]) {
        self.indicators
            .retain(|id, _| events.iter().any(|event| event.id == *id));
    }

    /// Apply a count response. Returns `false` if it was stale.
    pub fn apply(
        &mut self,
        event_id: EventId,
        ticket: RequestTicket,
        result: ApiResult<u32>,
    ) -> bool {
        let Some(indicator) = self.indicators.get_mut(&event_id) else {
            debug!("Discarding count for unmounted event {}", event_id);
            return false;
        };
        if !indicator.tracker.finish(ticket) {
            debug!("Discarding stale count for event {}", event_id);
            return false;
        }
        indicator.snapshot = Some(snapshot_from(event_id, indicator.capacity, result));
        true
    }

    /// Latest snapshot, `None` while the first fetch is pending
    pub fn snapshot(&self, event_id: EventId) -> Option<&CapacitySnapshot> {
        self.indicators
            .get(&event_id)
            .and_then(|indicator| indicator.snapshot.as_ref())
    }

    pub fn is_loading(&self, event_id: EventId) -> bool {
        self.indicators
            .get(&event_id)
            .is_some_and(|indicator| indicator.tracker.is_pending())
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Mount indicators for `events` and fetch every count concurrently
    pub async fn refresh_all(&mut self, api: &SharedApi, events: &[Event]) {
        self.retain_events(events);

        let mut requests = JoinSet::new();
        for event in events {
            let ticket = self.mount(event.id, event.capacity);
            let api = Arc::clone(api);
            let event_id = event.id;
            requests.spawn(async move {
                let result = api.registration_count(event_id).await;
                (event_id, ticket, result)
            });
        }

        while let Some(joined) = requests.join_next().await {
            match joined {
                Ok((event_id, ticket, result)) => {
                    self.apply(event_id, ticket, result);
                }
                Err(e) => warn!("Registration count task failed: {}", e),
            }
        }
    }
}
