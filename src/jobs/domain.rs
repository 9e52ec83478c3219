use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Fte,
    Internship,
    InternshipFte,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::Fte => "FTE",
            JobType::Internship => "INTERNSHIP",
            JobType::InternshipFte => "INTERNSHIP_FTE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobCategory {
    Core,
    It,
    Dream,
    Other,
}

impl JobCategory {
    pub const fn label(self) -> &'static str {
        match self {
            JobCategory::Core => "CORE",
            JobCategory::It => "IT",
            JobCategory::Dream => "DREAM",
            JobCategory::Other => "OTHER",
        }
    }
}

/// Posting lifecycle. The declaration order doubles as the board's
/// display order: open drives first, archived states last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    InProgress,
    ApplicationsClosed,
    OnHold,
    Completed,
    Cancelled,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::ApplicationsClosed => "APPLICATIONS_CLOSED",
            JobStatus::OnHold => "ON_HOLD",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Closed => "CLOSED",
        }
    }
}

/// A company's drive on the board. Compensation stays free text; the
/// eligibility floors mirror what companies publish in their briefs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub company: String,
    pub title: String,
    pub description: Option<String>,
    pub about_company: Option<String>,
    pub ctc: Option<String>,
    pub stipend: Option<String>,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub category: JobCategory,
    pub status: JobStatus,
    pub location: Option<String>,
    pub link: Option<String>,
    pub apply_by: Option<DateTime<Utc>>,
    pub date_of_visit: Option<DateTime<Utc>>,
    pub hiring_starts_on: Option<DateTime<Utc>>,
    pub mode_of_visit: Option<String>,
    #[serde(rename = "minCGPA")]
    pub min_cgpa: Option<f64>,
    #[serde(rename = "min10thPercentage")]
    pub min_tenth_percentage: Option<f64>,
    #[serde(rename = "min12thPercentage")]
    pub min_twelfth_percentage: Option<f64>,
    pub min_diploma_percentage: Option<f64>,
    pub min_sem_percentage: Option<f64>,
    pub max_current_arrears: Option<u32>,
    pub max_history_arrears: Option<u32>,
    pub gender_requirement: Option<String>,
    pub eligibility_branches: Option<String>,
    pub other_eligibility: Option<String>,
    pub poc_name: Option<String>,
    pub poc_email: Option<String>,
    pub poc_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/replace payload for a posting. Company and title are the only
/// hard requirements; the enums default the way new drives are opened.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobDraft {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub about_company: Option<String>,
    #[serde(default)]
    pub ctc: Option<String>,
    #[serde(default)]
    pub stipend: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub category: Option<JobCategory>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub apply_by: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_of_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hiring_starts_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mode_of_visit: Option<String>,
    #[serde(default, rename = "minCGPA")]
    pub min_cgpa: Option<f64>,
    #[serde(default, rename = "min10thPercentage")]
    pub min_tenth_percentage: Option<f64>,
    #[serde(default, rename = "min12thPercentage")]
    pub min_twelfth_percentage: Option<f64>,
    #[serde(default)]
    pub min_diploma_percentage: Option<f64>,
    #[serde(default)]
    pub min_sem_percentage: Option<f64>,
    #[serde(default)]
    pub max_current_arrears: Option<u32>,
    #[serde(default)]
    pub max_history_arrears: Option<u32>,
    #[serde(default)]
    pub gender_requirement: Option<String>,
    #[serde(default)]
    pub eligibility_branches: Option<String>,
    #[serde(default)]
    pub other_eligibility: Option<String>,
    #[serde(default)]
    pub poc_name: Option<String>,
    #[serde(default)]
    pub poc_email: Option<String>,
    #[serde(default)]
    pub poc_phone: Option<String>,
}
