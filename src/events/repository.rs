use super::domain::{Event, EventId};
use crate::storage::StoreError;

/// Storage seam for the placement calendar.
pub trait EventStore: Send + Sync {
    fn insert(&self, event: Event) -> Result<Event, StoreError>;
    fn fetch(&self, id: &EventId) -> Result<Option<Event>, StoreError>;
    fn save(&self, event: Event) -> Result<(), StoreError>;
    fn delete(&self, id: &EventId) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Event>, StoreError>;
}
