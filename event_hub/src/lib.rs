//! # Event Hub
//!
//! Client core for browsing, creating and registering for events served by a
//! remote REST API.
//!
//! The crate holds everything a front end needs except rendering: the API
//! boundary, the persisted session, per-event capacity indicators, the
//! registration state machine and one view model per page.
//!
//! ## Core Modules
//!
//! - [`api`]: The [`EventsApi`] trait and its reqwest implementation
//! - [`session`]: Access/refresh tokens over a [`storage::KeyValueStore`]
//! - [`capacity`]: Capacity snapshots and the per-card indicator board
//! - [`registration`]: Registration modal state machine
//! - [`views`]: Listing, details, add-event, auth and profile pages
//! - [`request`]: Tickets for discarding stale responses
//!
//! ## Example
//!
//! ```
//! use event_hub::{CapacitySnapshot, FillLevel};
//!
//! let snapshot = CapacitySnapshot::new(100, 85);
//! assert_eq!(snapshot.slots_remaining(), 15);
//! assert_eq!(snapshot.fill_level(), FillLevel::High);
//! ```

/// Remote API boundary.
pub mod api;
pub use api::{ApiError, ApiResult, EventsApi, HttpEventsApi, SharedApi};

pub mod capacity;
pub use capacity::{CapacityBoard, CapacitySnapshot, FillLevel};

pub mod models;
pub use models::{Event, EventId, Profile, Registration};

pub mod registration;
pub use registration::{RegistrationFlow, RegistrationState, SubmitOutcome};

pub mod request;

/// Persisted session and per-user client state.
pub mod session;
pub use session::SessionStore;

pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Page view models.
pub mod views;
pub use views::{LoginRequired, Notification, Route};
