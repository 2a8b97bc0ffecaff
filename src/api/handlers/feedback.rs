use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::{self, Identity, Permission},
    domain::{Feedback, FeedbackFilters, FeedbackPage, FeedbackType},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(length(min = 1, max = 255))]
    pub summary: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub project_id: String,
    #[serde(default)]
    pub tag: String,
    pub feedback_type: FeedbackType,
}

#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    pub search: Option<String>,
    pub project: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListFeedbackQuery>,
) -> Result<Json<FeedbackPage>> {
    if params.limit.is_some_and(|l| l < 0) || params.offset.is_some_and(|o| o < 0) {
        return Err(AppError::BadRequest("limit and offset must not be negative".to_string()));
    }

    let filters = FeedbackFilters {
        search: params.search,
        project_id: params.project,
        limit: params.limit,
        offset: params.offset,
    };

    let page = state.service_context.feedback.list(&filters).await?;
    Ok(Json(page))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Feedback>> {
    let feedback = state
        .service_context
        .feedback
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback not found".to_string()))?;

    Ok(Json(feedback))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>)> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::FeedbackCreate,
    )
    .await?;
    request.validate()?;

    let now = Utc::now();
    let feedback = Feedback {
        id: Uuid::new_v4(),
        summary: request.summary,
        description: request.description,
        project_id: request.project_id,
        tag: request.tag,
        feedback_type: request.feedback_type,
        ticket_url: None,
        created_by: identity.map(|i| i.subject).unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let created = state.service_context.feedback.create(feedback).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
