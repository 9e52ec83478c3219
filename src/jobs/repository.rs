use super::domain::{Job, JobId};
use crate::storage::StoreError;

/// Storage seam for the job board.
pub trait JobStore: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, StoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn save(&self, job: Job) -> Result<(), StoreError>;
    fn delete(&self, id: &JobId) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Job>, StoreError>;
}
