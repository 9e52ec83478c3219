//! Placement calendar: drives, assessments, deadlines.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Event, EventCategory, EventDraft, EventId};
pub use repository::EventStore;
pub use router::event_router;
pub use service::{EventService, EventServiceError};
