//! In-memory store implementations backing the service binary and the
//! test suites. Each store keeps its tables behind a single mutex, so a
//! combined commit is atomic with respect to every other call on the
//! same store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::StoreError;
use crate::events::domain::{Event, EventId};
use crate::events::repository::EventStore;
use crate::jobs::domain::{Job, JobId};
use crate::jobs::repository::JobStore;
use crate::placements::domain::{OfferId, PlacementOffer, Student, StudentId};
use crate::placements::repository::PlacementStore;

#[derive(Default)]
struct PlacementTables {
    students: HashMap<StudentId, Student>,
    offers: HashMap<OfferId, PlacementOffer>,
}

/// Students and offers share one mutex: `commit_offer` writes both rows
/// under the same guard, which is what serializes two concurrent accepts
/// for the same student.
#[derive(Default, Clone)]
pub struct InMemoryPlacementStore {
    tables: Arc<Mutex<PlacementTables>>,
}

impl PlacementStore for InMemoryPlacementStore {
    fn insert_student(&self, student: Student) -> Result<Student, StoreError> {
        let mut tables = self.tables.lock().expect("placement mutex poisoned");
        if tables.students.contains_key(&student.id) {
            return Err(StoreError::Conflict);
        }
        tables.students.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, StoreError> {
        let tables = self.tables.lock().expect("placement mutex poisoned");
        Ok(tables.students.get(id).cloned())
    }

    fn save_student(&self, student: Student) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("placement mutex poisoned");
        if !tables.students.contains_key(&student.id) {
            return Err(StoreError::NotFound);
        }
        tables.students.insert(student.id.clone(), student);
        Ok(())
    }

    fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let tables = self.tables.lock().expect("placement mutex poisoned");
        Ok(tables.students.values().cloned().collect())
    }

    fn roll_number_taken(&self, roll_number: &str) -> Result<bool, StoreError> {
        let tables = self.tables.lock().expect("placement mutex poisoned");
        Ok(tables
            .students
            .values()
            .any(|student| student.roll_number == roll_number))
    }

    fn fetch_offer(&self, id: &OfferId) -> Result<Option<PlacementOffer>, StoreError> {
        let tables = self.tables.lock().expect("placement mutex poisoned");
        Ok(tables.offers.get(id).cloned())
    }

    fn offers_for_student(&self, id: &StudentId) -> Result<Vec<PlacementOffer>, StoreError> {
        let tables = self.tables.lock().expect("placement mutex poisoned");
        Ok(tables
            .offers
            .values()
            .filter(|offer| offer.student_id == *id)
            .cloned()
            .collect())
    }

    fn delete_offer(&self, id: &OfferId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().expect("placement mutex poisoned");
        tables.offers.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn commit_offer(
        &self,
        offer: PlacementOffer,
        student: Option<Student>,
    ) -> Result<PlacementOffer, StoreError> {
        let mut tables = self.tables.lock().expect("placement mutex poisoned");
        if let Some(student) = student {
            if !tables.students.contains_key(&student.id) {
                return Err(StoreError::NotFound);
            }
            tables.students.insert(student.id.clone(), student);
        }
        tables.offers.insert(offer.id.clone(), offer.clone());
        Ok(offer)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryJobStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, job: Job) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if !guard.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(job.id.clone(), job);
        Ok(())
    }

    fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        guard.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
}

impl EventStore for InMemoryEventStore {
    fn insert(&self, event: Event) -> Result<Event, StoreError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        if guard.contains_key(&event.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    fn fetch(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, event: Event) -> Result<(), StoreError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        if !guard.contains_key(&event.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(event.id.clone(), event);
        Ok(())
    }

    fn delete(&self, id: &EventId) -> Result<(), StoreError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Event>, StoreError> {
        let guard = self.events.lock().expect("event mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}
