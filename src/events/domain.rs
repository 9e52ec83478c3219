use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for calendar entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Placement,
    Exam,
    InfoSession,
    Oa,
    Interview,
    Deadline,
    Other,
}

impl EventCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EventCategory::Placement => "Placement",
            EventCategory::Exam => "Exam",
            EventCategory::InfoSession => "Info Session",
            EventCategory::Oa => "Online Assessment",
            EventCategory::Interview => "Interview",
            EventCategory::Deadline => "Deadline",
            EventCategory::Other => "Other",
        }
    }
}

/// One calendar entry on the placement calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: EventCategory,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create/replace payload for a calendar entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub category: EventCategory,
    #[serde(default)]
    pub link: Option<String>,
}
