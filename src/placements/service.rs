use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    NewStudent, OfferDraft, OfferId, OfferPatch, OfferStatus, PageMeta, PlacementOffer,
    PlacementStatus, Student, StudentDetail, StudentId, StudentPage, StudentPatch, StudentQuery,
};
use super::eligibility::{self, EligibilityPolicy};
use super::repository::PlacementStore;
use crate::storage::StoreError;

const DEFAULT_PAGE_LIMIT: u32 = 50;
const MAX_PAGE_LIMIT: u32 = 200;

static STUDENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_student_id() -> StudentId {
    let id = STUDENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    StudentId(format!("stu-{id:06}"))
}

fn next_offer_id() -> OfferId {
    let id = OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OfferId(format!("off-{id:06}"))
}

/// Service composing the roster store and the eligibility rules.
///
/// All mutations of a student's placement fields flow through here; the
/// HTTP layer only translates payloads and status codes.
pub struct PlacementService<S> {
    store: Arc<S>,
    policy: EligibilityPolicy,
}

impl<S> PlacementService<S>
where
    S: PlacementStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, EligibilityPolicy::default())
    }

    pub fn with_policy(store: Arc<S>, policy: EligibilityPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    /// Add a student to the roster. Used by the bulk import path and by
    /// tests; placement state starts opted-in and eligible.
    pub fn register_student(&self, new: NewStudent) -> Result<Student, PlacementServiceError> {
        let roll_number = require_text("roll number", &new.roll_number)?;
        let name = require_text("name", &new.name)?;
        let department = require_text("department", &new.department)?;
        let batch = require_text("batch", &new.batch)?;

        if self.store.roll_number_taken(&roll_number)? {
            return Err(PlacementServiceError::Validation(format!(
                "roll number {roll_number} is already on the roster"
            )));
        }

        let student = Student {
            id: next_student_id(),
            roll_number,
            name,
            email: clean_optional(new.email),
            mobile: clean_optional(new.mobile),
            department,
            batch,
            section: clean_optional(new.section),
            cgpa: new.cgpa,
            current_arrears: new.current_arrears,
            history_of_arrears: clean_optional(new.history_of_arrears),
            placement_status: PlacementStatus::OptedIn,
            can_sit_for_more: true,
            final_placed_company: None,
            final_placed_job_title: None,
            final_placed_ctc: None,
            final_placed_job_type: None,
            final_placed_date: None,
        };

        Ok(self.store.insert_student(student)?)
    }

    pub fn get_student(&self, id: &StudentId) -> Result<StudentDetail, PlacementServiceError> {
        let student = self
            .store
            .fetch_student(id)?
            .ok_or(PlacementServiceError::NotFound)?;
        let mut placements = self.store.offers_for_student(id)?;
        placements.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(StudentDetail {
            student,
            placements,
        })
    }

    /// Roster listing with the filter set the admin screens use:
    /// department/section/status narrowing plus a case-insensitive
    /// substring search over name, roll number, and email.
    pub fn list_students(&self, query: &StudentQuery) -> Result<StudentPage, PlacementServiceError> {
        let status_filter = match query.status.as_deref() {
            Some(raw) => Some(PlacementStatus::parse(raw).ok_or_else(|| {
                PlacementServiceError::Validation(format!("unknown placement status '{raw}'"))
            })?),
            None => None,
        };

        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        let mut students: Vec<Student> = self
            .store
            .list_students()?
            .into_iter()
            .filter(|student| {
                query
                    .department
                    .as_deref()
                    .map_or(true, |dept| student.department.eq_ignore_ascii_case(dept))
            })
            .filter(|student| {
                query.section.as_deref().map_or(true, |section| {
                    student
                        .section
                        .as_deref()
                        .is_some_and(|own| own.eq_ignore_ascii_case(section))
                })
            })
            .filter(|student| {
                status_filter.map_or(true, |status| student.placement_status == status)
            })
            .filter(|student| {
                needle.as_deref().map_or(true, |term| {
                    student.name.to_lowercase().contains(term)
                        || student.roll_number.to_lowercase().contains(term)
                        || student
                            .email
                            .as_deref()
                            .is_some_and(|email| email.to_lowercase().contains(term))
                })
            })
            .collect();

        students.sort_by(|a, b| {
            (&a.department, &a.section, &a.roll_number).cmp(&(
                &b.department,
                &b.section,
                &b.roll_number,
            ))
        });

        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        let total_count = students.len();
        let total_pages = (total_count as u32).div_ceil(limit).max(1);
        let skip = (page as usize - 1).saturating_mul(limit as usize);

        let window: Vec<StudentDetail> = students
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|student| {
                let mut placements = self.store.offers_for_student(&student.id)?;
                placements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(StudentDetail {
                    student,
                    placements,
                })
            })
            .collect::<Result<_, StoreError>>()?;

        let has_more = skip + window.len() < total_count;

        Ok(StudentPage {
            students: window,
            pagination: PageMeta {
                page,
                limit,
                total_count,
                total_pages,
                has_more,
            },
        })
    }

    /// Record an offer against a student. Offers default to pending; an
    /// offer created already-accepted (back-filled history) triggers the
    /// same status transition as a live accept, and both rows commit
    /// through one store call.
    pub fn record_offer(
        &self,
        student_id: &StudentId,
        draft: OfferDraft,
    ) -> Result<PlacementOffer, PlacementServiceError> {
        let company = require_text("company", &draft.company)?;
        let job_title = require_text("job title", &draft.job_title)?;

        let student = self
            .store
            .fetch_student(student_id)?
            .ok_or(PlacementServiceError::NotFound)?;

        let accepted = draft.is_accepted.unwrap_or(false)
            || matches!(draft.offer_status, Some(OfferStatus::Accepted));
        let offer_status = if accepted {
            OfferStatus::Accepted
        } else {
            draft.offer_status.unwrap_or(OfferStatus::Pending)
        };

        let now = Utc::now();
        let offer = PlacementOffer {
            id: next_offer_id(),
            student_id: student_id.clone(),
            job_id: clean_optional(draft.job_id),
            company,
            job_title,
            ctc: clean_optional(draft.ctc),
            stipend: clean_optional(draft.stipend),
            job_type: clean_optional(draft.job_type),
            offer_date: draft.offer_date.unwrap_or(now),
            offer_status,
            is_accepted: accepted,
            notes: clean_optional(draft.notes),
            created_at: now,
        };

        if accepted {
            let mut student = student;
            eligibility::apply_acceptance(&mut student, &offer, &self.policy);
            Ok(self.store.commit_offer(offer, Some(student))?)
        } else {
            Ok(self.store.commit_offer(offer, None)?)
        }
    }

    /// Accept, reject, or annotate an existing offer. A false-to-true
    /// accept runs the eligibility transition; rejecting never touches
    /// the student, even one placed by this very offer — acceptance is a
    /// one-way door, pending product review.
    pub fn update_offer(
        &self,
        student_id: &StudentId,
        offer_id: &OfferId,
        patch: OfferPatch,
    ) -> Result<PlacementOffer, PlacementServiceError> {
        let mut offer = self.owned_offer(student_id, offer_id)?;
        let previously_accepted = offer.is_accepted;

        let mut status = patch.offer_status.unwrap_or(offer.offer_status);
        if patch.is_accepted == Some(true) {
            status = OfferStatus::Accepted;
        }
        offer.offer_status = status;
        offer.is_accepted = status == OfferStatus::Accepted;
        if let Some(notes) = patch.notes {
            offer.notes = clean_optional(Some(notes));
        }

        if offer.is_accepted && !previously_accepted {
            let mut student = self
                .store
                .fetch_student(student_id)?
                .ok_or(PlacementServiceError::NotFound)?;
            eligibility::apply_acceptance(&mut student, &offer, &self.policy);
            Ok(self.store.commit_offer(offer, Some(student))?)
        } else {
            Ok(self.store.commit_offer(offer, None)?)
        }
    }

    /// Remove an offer row. Deliberately leaves any student mutation the
    /// acceptance already applied in place.
    pub fn delete_offer(
        &self,
        student_id: &StudentId,
        offer_id: &OfferId,
    ) -> Result<(), PlacementServiceError> {
        let offer = self.owned_offer(student_id, offer_id)?;
        Ok(self.store.delete_offer(&offer.id)?)
    }

    /// Direct admin edit. The engine re-derives `can_sit_for_more` from
    /// the resulting placement fields; a status outside the placed pair
    /// clears the whole snapshot.
    pub fn update_student(
        &self,
        student_id: &StudentId,
        patch: StudentPatch,
    ) -> Result<Student, PlacementServiceError> {
        let mut student = self
            .store
            .fetch_student(student_id)?
            .ok_or(PlacementServiceError::NotFound)?;

        if let Some(email) = patch.email {
            student.email = clean_optional(Some(email));
        }
        if let Some(mobile) = patch.mobile {
            student.mobile = clean_optional(Some(mobile));
        }
        if let Some(cgpa) = patch.cgpa {
            student.cgpa = Some(cgpa);
        }
        if let Some(arrears) = patch.current_arrears {
            student.current_arrears = arrears;
        }
        if let Some(history) = patch.history_of_arrears {
            student.history_of_arrears = clean_optional(Some(history));
        }
        if let Some(status) = patch.placement_status {
            student.placement_status = status;
        }
        if let Some(company) = patch.final_placed_company {
            student.final_placed_company = clean_optional(Some(company));
        }
        if let Some(title) = patch.final_placed_job_title {
            student.final_placed_job_title = clean_optional(Some(title));
        }
        if let Some(ctc_text) = patch.final_placed_ctc {
            student.final_placed_ctc = clean_optional(Some(ctc_text));
        }
        if let Some(job_type) = patch.final_placed_job_type {
            student.final_placed_job_type = clean_optional(Some(job_type));
        }
        if let Some(date) = patch.final_placed_date {
            student.final_placed_date = Some(date);
        }

        eligibility::normalize_after_edit(&mut student, &self.policy);

        self.store.save_student(student.clone())?;
        Ok(student)
    }

    /// Fetch an offer and verify it belongs to the addressed student. A
    /// mismatch answers exactly like a missing row so that probing with
    /// foreign identifiers leaks nothing.
    fn owned_offer(
        &self,
        student_id: &StudentId,
        offer_id: &OfferId,
    ) -> Result<PlacementOffer, PlacementServiceError> {
        let offer = self
            .store
            .fetch_offer(offer_id)?
            .ok_or(PlacementServiceError::NotFound)?;

        if offer.student_id != *student_id {
            return Err(PlacementServiceError::NotFound);
        }

        Ok(offer)
    }
}

fn require_text(field: &str, value: &str) -> Result<String, PlacementServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlacementServiceError::Validation(format!(
            "{field} is required"
        )));
    }
    Ok(trimmed.to_string())
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("student or placement not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
