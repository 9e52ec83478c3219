use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Event, EventDraft, EventId};
use super::repository::EventStore;
use crate::storage::StoreError;

static EVENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_event_id() -> EventId {
    let id = EVENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EventId(format!("evt-{id:06}"))
}

/// CRUD over the placement calendar.
pub struct EventService<S> {
    store: Arc<S>,
}

impl<S> EventService<S>
where
    S: EventStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: EventDraft) -> Result<Event, EventServiceError> {
        let title = validated_title(&draft)?;

        let event = Event {
            id: next_event_id(),
            title,
            description: clean(draft.description),
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            link: clean(draft.link),
            created_at: Utc::now(),
        };
        Ok(self.store.insert(event)?)
    }

    pub fn get(&self, id: &EventId) -> Result<Event, EventServiceError> {
        self.store.fetch(id)?.ok_or(EventServiceError::NotFound)
    }

    /// Calendar listing in chronological order.
    pub fn list(&self) -> Result<Vec<Event>, EventServiceError> {
        let mut events = self.store.list()?;
        events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(events)
    }

    pub fn replace(&self, id: &EventId, draft: EventDraft) -> Result<Event, EventServiceError> {
        let existing = self.store.fetch(id)?.ok_or(EventServiceError::NotFound)?;
        let title = validated_title(&draft)?;

        let event = Event {
            id: existing.id.clone(),
            title,
            description: clean(draft.description),
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            link: clean(draft.link),
            created_at: existing.created_at,
        };
        self.store.save(event.clone())?;
        Ok(event)
    }

    pub fn delete(&self, id: &EventId) -> Result<(), EventServiceError> {
        self.store.fetch(id)?.ok_or(EventServiceError::NotFound)?;
        Ok(self.store.delete(id)?)
    }
}

fn validated_title(draft: &EventDraft) -> Result<String, EventServiceError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(EventServiceError::Validation("title is required".to_string()));
    }
    if draft.end_time < draft.start_time {
        return Err(EventServiceError::Validation(
            "end time precedes start time".to_string(),
        ));
    }
    Ok(title.to_string())
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Error raised by the calendar service.
#[derive(Debug, thiserror::Error)]
pub enum EventServiceError {
    #[error("event not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::domain::EventCategory;
    use crate::storage::memory::InMemoryEventStore;
    use chrono::{Duration, TimeZone};

    fn service() -> EventService<InMemoryEventStore> {
        EventService::new(Arc::new(InMemoryEventStore::default()))
    }

    fn draft(title: &str) -> EventDraft {
        let start = Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap();
        EventDraft {
            title: title.to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(2),
            category: EventCategory::Placement,
            link: None,
        }
    }

    #[test]
    fn creates_and_lists_in_chronological_order() {
        let service = service();
        let mut later = draft("Acme drive briefing");
        later.start_time = later.start_time + Duration::days(1);
        later.end_time = later.end_time + Duration::days(1);

        service.create(later).expect("later event");
        service.create(draft("Resume workshop")).expect("earlier event");

        let listed = service.list().expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Resume workshop");
    }

    #[test]
    fn rejects_inverted_time_ranges() {
        let service = service();
        let mut bad = draft("Mock interview");
        bad.end_time = bad.start_time - Duration::minutes(30);

        match service.create(bad) {
            Err(EventServiceError::Validation(reason)) => {
                assert!(reason.contains("end time"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_titles_are_rejected() {
        let service = service();
        let mut bad = draft("  ");
        bad.title = "   ".to_string();
        assert!(matches!(
            service.create(bad),
            Err(EventServiceError::Validation(_))
        ));
    }
}
