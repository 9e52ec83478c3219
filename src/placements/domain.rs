use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for students on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for recorded placement offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

/// Where a student stands in the placement season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementStatus {
    OptedIn,
    OptedOut,
    HigherStudies,
    Placed,
    PlacedFinal,
}

impl PlacementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PlacementStatus::OptedIn => "OPTED_IN",
            PlacementStatus::OptedOut => "OPTED_OUT",
            PlacementStatus::HigherStudies => "HIGHER_STUDIES",
            PlacementStatus::Placed => "PLACED",
            PlacementStatus::PlacedFinal => "PLACED_FINAL",
        }
    }

    /// True once the student holds a binding offer.
    pub const fn is_placed(self) -> bool {
        matches!(self, PlacementStatus::Placed | PlacementStatus::PlacedFinal)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OPTED_IN" => Some(Self::OptedIn),
            "OPTED_OUT" => Some(Self::OptedOut),
            "HIGHER_STUDIES" => Some(Self::HigherStudies),
            "PLACED" => Some(Self::Placed),
            "PLACED_FINAL" => Some(Self::PlacedFinal),
            _ => None,
        }
    }
}

/// Lifecycle of a single recorded offer. `PENDING` resolves to either
/// `ACCEPTED` or `REJECTED`; `is_accepted` on the offer record is derived
/// from this and never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OfferStatus::Pending => "PENDING",
            OfferStatus::Accepted => "ACCEPTED",
            OfferStatus::Rejected => "REJECTED",
        }
    }
}

/// A student row. The placement fields (`placement_status` through
/// `final_placed_date`) are owned by the eligibility engine and only move
/// through [`crate::placements::service::PlacementService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub department: String,
    pub batch: String,
    pub section: Option<String>,
    pub cgpa: Option<f64>,
    pub current_arrears: u32,
    pub history_of_arrears: Option<String>,
    pub placement_status: PlacementStatus,
    pub can_sit_for_more: bool,
    pub final_placed_company: Option<String>,
    pub final_placed_job_title: Option<String>,
    #[serde(rename = "finalPlacedCTC")]
    pub final_placed_ctc: Option<String>,
    pub final_placed_job_type: Option<String>,
    pub final_placed_date: Option<DateTime<Utc>>,
}

/// Roster intake shape; placement state starts at its defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub batch: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub current_arrears: u32,
    #[serde(default)]
    pub history_of_arrears: Option<String>,
}

/// One company's extended offer to one student. CTC and stipend stay
/// free text end to end ("12.5 LPA", "50k/month"); the roster CSV tooling
/// reads and writes the same strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOffer {
    pub id: OfferId,
    pub student_id: StudentId,
    pub job_id: Option<String>,
    pub company: String,
    pub job_title: String,
    pub ctc: Option<String>,
    pub stipend: Option<String>,
    pub job_type: Option<String>,
    pub offer_date: DateTime<Utc>,
    pub offer_status: OfferStatus,
    pub is_accepted: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inbound payload for recording an offer against a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OfferDraft {
    #[serde(default)]
    pub job_id: Option<String>,
    pub company: String,
    pub job_title: String,
    #[serde(default)]
    pub ctc: Option<String>,
    #[serde(default)]
    pub stipend: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub offer_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub offer_status: Option<OfferStatus>,
    #[serde(default)]
    pub is_accepted: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for an existing offer (accept/reject/annotate).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OfferPatch {
    #[serde(default)]
    pub offer_status: Option<OfferStatus>,
    #[serde(default)]
    pub is_accepted: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Direct admin edit of a student. `can_sit_for_more` is deliberately
/// absent: the engine re-derives it from the supplied placement fields,
/// and unknown keys are rejected at the boundary.
///
/// Optional text fields use empty-string-to-clear semantics so admin
/// forms can blank a value without a separate null encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub current_arrears: Option<u32>,
    #[serde(default)]
    pub history_of_arrears: Option<String>,
    #[serde(default)]
    pub placement_status: Option<PlacementStatus>,
    #[serde(default)]
    pub final_placed_company: Option<String>,
    #[serde(default)]
    pub final_placed_job_title: Option<String>,
    #[serde(default, rename = "finalPlacedCTC")]
    pub final_placed_ctc: Option<String>,
    #[serde(default)]
    pub final_placed_job_type: Option<String>,
    #[serde(default)]
    pub final_placed_date: Option<DateTime<Utc>>,
}

/// List filters and pagination for the roster screen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentQuery {
    pub department: Option<String>,
    pub section: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A student together with every offer recorded against them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub placements: Vec<PlacementOffer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_count: usize,
    pub total_pages: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    pub students: Vec<StudentDetail>,
    pub pagination: PageMeta,
}
