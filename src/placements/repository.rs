use super::domain::{OfferId, PlacementOffer, Student, StudentId};
use crate::storage::StoreError;

/// Storage seam for students and their offers.
///
/// `commit_offer` is the transactional boundary the accept path relies
/// on: the offer row and the derived student row must land together or
/// not at all, which also serializes two concurrent accepts for the same
/// student at the store.
pub trait PlacementStore: Send + Sync {
    fn insert_student(&self, student: Student) -> Result<Student, StoreError>;
    fn fetch_student(&self, id: &StudentId) -> Result<Option<Student>, StoreError>;
    fn save_student(&self, student: Student) -> Result<(), StoreError>;
    fn list_students(&self) -> Result<Vec<Student>, StoreError>;
    fn roll_number_taken(&self, roll_number: &str) -> Result<bool, StoreError>;

    fn fetch_offer(&self, id: &OfferId) -> Result<Option<PlacementOffer>, StoreError>;
    fn offers_for_student(&self, id: &StudentId) -> Result<Vec<PlacementOffer>, StoreError>;
    fn delete_offer(&self, id: &OfferId) -> Result<(), StoreError>;

    /// Upsert the offer and, when present, the student in one unit.
    fn commit_offer(
        &self,
        offer: PlacementOffer,
        student: Option<Student>,
    ) -> Result<PlacementOffer, StoreError>;
}
