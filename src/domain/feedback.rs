use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub summary: String,
    pub description: String,
    pub project_id: String,
    pub tag: String,
    pub feedback_type: FeedbackType,
    /// Browse URL of the ticket opened for this report, when the ticketing
    /// integration is configured.
    pub ticket_url: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedbackType {
    Bug,
    Feedback,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "BUG",
            Self::Feedback => "FEEDBACK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUG" => Some(Self::Bug),
            "FEEDBACK" => Some(Self::Feedback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackFilters {
    /// Substring match against summary and tag.
    pub search: Option<String>,
    pub project_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPage {
    pub count: i64,
    pub results: Vec<Feedback>,
}
