use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::{self, Identity, Permission},
    domain::{Announcement, AnnouncementFilters, AnnouncementPage, AnnouncementSort, SortOrder},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub category: Option<String>,
    pub max: Option<i64>,
    pub offset: Option<i64>,
    pub active: Option<bool>,
    pub sortby: Option<String>,
    pub order: Option<String>,
    /// Comma-separated tag slugs, matched with ANY semantics.
    pub tags: Option<String>,
}

/// Body for both POST (create) and PUT (full replace).
#[derive(Debug, Deserialize, Validate)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub excerpt: String,
    #[validate(length(min = 1))]
    pub body: String,
    /// Defaults to the authenticated subject.
    pub publisher: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub start_at: Option<DateTime<Utc>>,
    pub until_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl AnnouncementRequest {
    fn into_announcement(self, id: Uuid, subject: &str) -> Announcement {
        let now = Utc::now();
        Announcement {
            id,
            title: self.title,
            excerpt: self.excerpt,
            body: self.body,
            publisher: self.publisher.unwrap_or_else(|| subject.to_string()),
            category: self.category,
            category_title: None,
            tags: self.tags,
            active: self.active,
            start_at: self.start_at,
            until_at: self.until_at,
            created_at: now,
            updated_at: now,
        }
    }
}

fn parse_filters(params: ListAnnouncementsQuery) -> Result<AnnouncementFilters> {
    let sort_by = match params.sortby.as_deref() {
        None => AnnouncementSort::default(),
        Some(s) => AnnouncementSort::parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid sortby value: {}", s)))?,
    };
    let order = match params.order.as_deref() {
        None => SortOrder::default(),
        Some(s) => SortOrder::parse(s)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid order value: {}", s)))?,
    };
    if params.max.is_some_and(|m| m < 0) || params.offset.is_some_and(|o| o < 0) {
        return Err(AppError::BadRequest("max and offset must not be negative".to_string()));
    }

    let tags = params
        .tags
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(AnnouncementFilters {
        category: params.category,
        active: params.active,
        tags,
        max: params.max,
        offset: params.offset,
        sort_by,
        order,
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
) -> Result<Json<AnnouncementPage>> {
    let filters = parse_filters(params)?;
    let page = state.service_context.announcements.list(&filters).await?;
    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>> {
    let announcement = state
        .service_context
        .announcements
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Json(request): Json<AnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::AnnouncementCreate,
    )
    .await?;
    request.validate()?;

    let subject = identity.map(|i| i.subject).unwrap_or_default();
    let announcement = request.into_announcement(Uuid::new_v4(), &subject);

    let created = state.service_context.announcements.create(announcement).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
    Json(request): Json<AnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::AnnouncementUpdate,
    )
    .await?;
    request.validate()?;

    let subject = identity.map(|i| i.subject).unwrap_or_default();
    let announcement = request.into_announcement(id, &subject);

    let updated = state.service_context.announcements.update(id, announcement).await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    identity: Option<Extension<Identity>>,
) -> Result<StatusCode> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::AnnouncementDelete,
    )
    .await?;

    state.service_context.announcements.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
