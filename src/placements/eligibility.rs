//! The "2x rule": a student whose accepted offer is at or below the
//! dream-offer threshold stays eligible to interview for offers up to
//! twice that value. Only the threshold comparison is enforced here; the
//! 2x ceiling on later offers is documented policy that the cell applies
//! manually when shortlisting.

use super::ctc;
use super::domain::{PlacementOffer, PlacementStatus, Student};

pub const DEFAULT_DREAM_OFFER_THRESHOLD_LPA: f64 = 6.0;

/// Policy dial for the dream-offer threshold.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    dream_offer_threshold_lpa: f64,
}

impl EligibilityPolicy {
    pub fn new(dream_offer_threshold_lpa: f64) -> Self {
        let sanitized = if dream_offer_threshold_lpa.is_finite() && dream_offer_threshold_lpa > 0.0
        {
            dream_offer_threshold_lpa
        } else {
            DEFAULT_DREAM_OFFER_THRESHOLD_LPA
        };

        Self {
            dream_offer_threshold_lpa: sanitized,
        }
    }

    pub fn dream_offer_threshold_lpa(&self) -> f64 {
        self.dream_offer_threshold_lpa
    }

    /// Whether an accepted offer at this CTC leaves the student free to
    /// keep interviewing. Absent or unparseable CTC reads as zero and
    /// therefore clears the threshold.
    pub fn leaves_room_for_more(&self, ctc_text: Option<&str>) -> bool {
        ctc::parse_lakhs(ctc_text.unwrap_or("")) <= self.dream_offer_threshold_lpa
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DREAM_OFFER_THRESHOLD_LPA)
    }
}

/// Placement state derived from a single accepted offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementTransition {
    pub placement_status: PlacementStatus,
    pub can_sit_for_more: bool,
}

/// Pure transition function: the outcome depends only on the offer's
/// CTC, never on the student's prior state. Running it twice for the
/// same offer lands on the same result; a later accepted offer simply
/// overwrites the snapshot (last accepted wins, not best).
pub fn on_offer_accepted(policy: &EligibilityPolicy, ctc_text: Option<&str>) -> PlacementTransition {
    let can_sit_for_more = policy.leaves_room_for_more(ctc_text);

    PlacementTransition {
        placement_status: if can_sit_for_more {
            PlacementStatus::Placed
        } else {
            PlacementStatus::PlacedFinal
        },
        can_sit_for_more,
    }
}

/// Fold an accepted offer into the student record: status, flag, and the
/// raw-text snapshot of what was accepted.
pub fn apply_acceptance(student: &mut Student, offer: &PlacementOffer, policy: &EligibilityPolicy) {
    let transition = on_offer_accepted(policy, offer.ctc.as_deref());

    student.placement_status = transition.placement_status;
    student.can_sit_for_more = transition.can_sit_for_more;
    student.final_placed_company = Some(offer.company.clone());
    student.final_placed_job_title = Some(offer.job_title.clone());
    student.final_placed_ctc = offer.ctc.clone();
    student.final_placed_job_type = offer.job_type.clone();
    student.final_placed_date = Some(offer.offer_date);
}

/// Re-derive the engine-owned fields after a direct admin edit.
///
/// A status outside the placed pair clears the whole snapshot and
/// restores eligibility. Inside the pair, `can_sit_for_more` is
/// recomputed from the supplied CTC with the same parser and threshold
/// as the accept path; PLACED_FINAL always pins the flag to false.
pub fn normalize_after_edit(student: &mut Student, policy: &EligibilityPolicy) {
    if student.placement_status.is_placed() {
        student.can_sit_for_more = policy.leaves_room_for_more(student.final_placed_ctc.as_deref())
            && student.placement_status != PlacementStatus::PlacedFinal;
    } else {
        student.can_sit_for_more = true;
        student.final_placed_company = None;
        student.final_placed_job_title = None;
        student.final_placed_ctc = None;
        student.final_placed_job_type = None;
        student.final_placed_date = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placements::domain::{OfferId, OfferStatus, StudentId};
    use chrono::{TimeZone, Utc};

    fn student() -> Student {
        Student {
            id: StudentId("stu-000001".to_string()),
            roll_number: "20CS001".to_string(),
            name: "Asha Verma".to_string(),
            email: None,
            mobile: None,
            department: "CSE".to_string(),
            batch: "2026".to_string(),
            section: Some("A".to_string()),
            cgpa: Some(8.0),
            current_arrears: 0,
            history_of_arrears: None,
            placement_status: PlacementStatus::OptedIn,
            can_sit_for_more: true,
            final_placed_company: None,
            final_placed_job_title: None,
            final_placed_ctc: None,
            final_placed_job_type: None,
            final_placed_date: None,
        }
    }

    fn offer(ctc: Option<&str>) -> PlacementOffer {
        let when = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        PlacementOffer {
            id: OfferId("off-000001".to_string()),
            student_id: StudentId("stu-000001".to_string()),
            job_id: None,
            company: "Acme".to_string(),
            job_title: "Graduate Engineer".to_string(),
            ctc: ctc.map(str::to_string),
            stipend: None,
            job_type: Some("FTE".to_string()),
            offer_date: when,
            offer_status: OfferStatus::Accepted,
            is_accepted: true,
            notes: None,
            created_at: when,
        }
    }

    #[test]
    fn offers_at_or_below_the_threshold_keep_the_student_sitting() {
        let policy = EligibilityPolicy::default();
        let transition = on_offer_accepted(&policy, Some("5.5 LPA"));
        assert_eq!(transition.placement_status, PlacementStatus::Placed);
        assert!(transition.can_sit_for_more);

        // The boundary itself is inclusive.
        let boundary = on_offer_accepted(&policy, Some("6 LPA"));
        assert!(boundary.can_sit_for_more);
    }

    #[test]
    fn offers_above_the_threshold_are_final() {
        let transition = on_offer_accepted(&EligibilityPolicy::default(), Some("7.0 LPA"));
        assert_eq!(transition.placement_status, PlacementStatus::PlacedFinal);
        assert!(!transition.can_sit_for_more);
    }

    #[test]
    fn unparseable_ctc_counts_as_zero_and_stays_eligible() {
        let transition = on_offer_accepted(&EligibilityPolicy::default(), Some("competitive"));
        assert_eq!(transition.placement_status, PlacementStatus::Placed);
        assert!(transition.can_sit_for_more);

        let absent = on_offer_accepted(&EligibilityPolicy::default(), None);
        assert!(absent.can_sit_for_more);
    }

    #[test]
    fn acceptance_snapshots_the_offer_verbatim() {
        let policy = EligibilityPolicy::default();
        let mut record = student();
        let accepted = offer(Some("7.0 LPA"));

        apply_acceptance(&mut record, &accepted, &policy);

        assert_eq!(record.placement_status, PlacementStatus::PlacedFinal);
        assert!(!record.can_sit_for_more);
        assert_eq!(record.final_placed_company.as_deref(), Some("Acme"));
        assert_eq!(record.final_placed_ctc.as_deref(), Some("7.0 LPA"));
        assert_eq!(record.final_placed_date, Some(accepted.offer_date));
    }

    #[test]
    fn acceptance_is_idempotent() {
        let policy = EligibilityPolicy::default();
        let accepted = offer(Some("5.0 LPA"));

        let mut once = student();
        apply_acceptance(&mut once, &accepted, &policy);
        let mut twice = once.clone();
        apply_acceptance(&mut twice, &accepted, &policy);

        assert_eq!(once, twice);
    }

    #[test]
    fn leaving_the_placed_pair_clears_the_snapshot() {
        let policy = EligibilityPolicy::default();
        let mut record = student();
        apply_acceptance(&mut record, &offer(Some("9 LPA")), &policy);

        record.placement_status = PlacementStatus::OptedOut;
        normalize_after_edit(&mut record, &policy);

        assert!(record.can_sit_for_more);
        assert_eq!(record.final_placed_company, None);
        assert_eq!(record.final_placed_ctc, None);
        assert_eq!(record.final_placed_date, None);
    }

    #[test]
    fn manual_edit_recomputes_the_flag_from_the_supplied_ctc() {
        let policy = EligibilityPolicy::default();
        let mut record = student();
        record.placement_status = PlacementStatus::Placed;
        record.final_placed_ctc = Some("11 LPA".to_string());
        record.can_sit_for_more = true;

        normalize_after_edit(&mut record, &policy);
        assert!(!record.can_sit_for_more);
    }

    #[test]
    fn placed_final_pins_the_flag_even_for_small_figures() {
        let policy = EligibilityPolicy::default();
        let mut record = student();
        record.placement_status = PlacementStatus::PlacedFinal;
        record.final_placed_ctc = Some("4 LPA".to_string());
        record.can_sit_for_more = true;

        normalize_after_edit(&mut record, &policy);
        assert!(!record.can_sit_for_more);
    }

    #[test]
    fn nonsense_thresholds_fall_back_to_the_default() {
        assert_eq!(
            EligibilityPolicy::new(f64::NAN).dream_offer_threshold_lpa(),
            DEFAULT_DREAM_OFFER_THRESHOLD_LPA
        );
        assert_eq!(
            EligibilityPolicy::new(-2.0).dream_offer_threshold_lpa(),
            DEFAULT_DREAM_OFFER_THRESHOLD_LPA
        );
    }
}
