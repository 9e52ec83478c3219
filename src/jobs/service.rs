use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Job, JobCategory, JobDraft, JobId, JobStatus, JobType};
use super::repository::JobStore;
use crate::storage::StoreError;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// CRUD over the job board. No placement rules live here; postings are
/// reference data the offer workflow points back at.
pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> JobService<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: JobDraft) -> Result<Job, JobServiceError> {
        let (company, title) = required_fields(&draft)?;

        let now = Utc::now();
        let job = build_job(next_job_id(), company, title, draft, now, now);
        Ok(self.store.insert(job)?)
    }

    pub fn get(&self, id: &JobId) -> Result<Job, JobServiceError> {
        self.store.fetch(id)?.ok_or(JobServiceError::NotFound)
    }

    /// Board listing: open drives first (enum order), earlier deadlines
    /// ahead within a status, undated postings last.
    pub fn list(&self) -> Result<Vec<Job>, JobServiceError> {
        let mut jobs = self.store.list()?;
        jobs.sort_by(|a, b| {
            a.status.cmp(&b.status).then_with(|| match (a.apply_by, b.apply_by) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.created_at.cmp(&b.created_at),
            })
        });
        Ok(jobs)
    }

    /// Full replace, as the admin edit form submits every field.
    pub fn replace(&self, id: &JobId, draft: JobDraft) -> Result<Job, JobServiceError> {
        let existing = self.store.fetch(id)?.ok_or(JobServiceError::NotFound)?;
        let (company, title) = required_fields(&draft)?;

        let job = build_job(
            existing.id.clone(),
            company,
            title,
            draft,
            existing.created_at,
            Utc::now(),
        );
        self.store.save(job.clone())?;
        Ok(job)
    }

    pub fn delete(&self, id: &JobId) -> Result<Job, JobServiceError> {
        let existing = self.store.fetch(id)?.ok_or(JobServiceError::NotFound)?;
        self.store.delete(id)?;
        Ok(existing)
    }
}

fn required_fields(draft: &JobDraft) -> Result<(String, String), JobServiceError> {
    let company = draft.company.trim();
    let title = draft.title.trim();
    if company.is_empty() || title.is_empty() {
        return Err(JobServiceError::Validation(
            "company and title are required".to_string(),
        ));
    }
    Ok((company.to_string(), title.to_string()))
}

fn build_job(
    id: JobId,
    company: String,
    title: String,
    draft: JobDraft,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Job {
    Job {
        id,
        company,
        title,
        description: clean(draft.description),
        about_company: clean(draft.about_company),
        ctc: clean(draft.ctc),
        stipend: clean(draft.stipend),
        job_type: draft.job_type.unwrap_or(JobType::Fte),
        category: draft.category.unwrap_or(JobCategory::Other),
        status: draft.status.unwrap_or(JobStatus::Open),
        location: clean(draft.location),
        link: clean(draft.link),
        apply_by: draft.apply_by,
        date_of_visit: draft.date_of_visit,
        hiring_starts_on: draft.hiring_starts_on,
        mode_of_visit: clean(draft.mode_of_visit),
        min_cgpa: draft.min_cgpa,
        min_tenth_percentage: draft.min_tenth_percentage,
        min_twelfth_percentage: draft.min_twelfth_percentage,
        min_diploma_percentage: draft.min_diploma_percentage,
        min_sem_percentage: draft.min_sem_percentage,
        max_current_arrears: draft.max_current_arrears,
        max_history_arrears: draft.max_history_arrears,
        gender_requirement: clean(draft.gender_requirement),
        eligibility_branches: clean(draft.eligibility_branches),
        other_eligibility: clean(draft.other_eligibility),
        poc_name: clean(draft.poc_name),
        poc_email: clean(draft.poc_email),
        poc_phone: clean(draft.poc_phone),
        created_at,
        updated_at,
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Error raised by the job-board service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
