//! Request identity for discarding stale responses.
//!
//! Each outgoing request is issued a process-unique [`RequestTicket`]. The
//! view that issued it keeps the ticket in a [`RequestTracker`] and applies a
//! response only if its ticket is still the current one. Starting a newer
//! request, or cancelling when the view goes away, makes older responses
//! stale.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identity of one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    fn issue() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Tracks the latest request issued for one piece of view state
#[derive(Debug, Default)]
pub struct RequestTracker {
    current: Option<RequestTicket>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding any in-flight request
    pub fn begin(&mut self) -> RequestTicket {
        let ticket = RequestTicket::issue();
        self.current = Some(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == Some(ticket)
    }

    /// Accept a response for `ticket`. Returns `false` if it is stale.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Forget the in-flight request so its response is discarded
    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}
