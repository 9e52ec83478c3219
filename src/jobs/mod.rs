//! Job-board postings: the drives companies run on campus.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Job, JobCategory, JobDraft, JobId, JobStatus, JobType};
pub use repository::JobStore;
pub use router::job_router;
pub use service::{JobService, JobServiceError};
