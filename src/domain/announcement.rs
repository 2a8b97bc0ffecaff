use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub publisher: String,
    /// Category slug, resolved against the categories table.
    pub category: Option<String>,
    /// Category display title, filled in by the list/get queries.
    pub category_title: Option<String>,
    /// Normalized (slugified, deduplicated) tag slugs.
    pub tags: Vec<String>,
    pub active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub until_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub slug: String,
    pub title: String,
}

/// Sort column for the announcement list. Only these two columns are
/// exposed, so the raw query can interpolate the column name safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnouncementSort {
    #[default]
    CreatedAt,
    StartAt,
}

impl AnnouncementSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "start_at" => Some(Self::StartAt),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "a.created_at",
            Self::StartAt => "a.start_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters for the announcement list query. Tags match with ANY semantics:
/// an announcement qualifies when it carries at least one of the given slugs.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementFilters {
    pub category: Option<String>,
    pub active: Option<bool>,
    pub tags: Vec<String>,
    pub max: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: AnnouncementSort,
    pub order: SortOrder,
}

/// One page of announcements. `count` is the total number of rows matching
/// the filters, independent of `max`/`offset`.
#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementPage {
    pub count: i64,
    pub results: Vec<Announcement>,
}

/// Generate a URL-safe slug from a display title. Slugs are ASCII only;
/// anything else becomes a separator.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Slugify a tag list and drop duplicates and empties, preserving first-seen
/// order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .map(|t| slugify(t))
        .filter(|slug| !slug.is_empty() && seen.insert(slug.clone()))
        .collect()
}
