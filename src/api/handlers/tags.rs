use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    api::state::AppState,
    auth::{self, Identity, Permission},
    domain::Tag,
    error::Result,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1))]
    pub title: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    let tags = state.service_context.taxonomy.list_tags().await?;
    Ok(Json(tags))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>)> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::TaxonomyManage,
    )
    .await?;
    request.validate()?;

    let tag = state.service_context.taxonomy.create_tag(&request.title).await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    identity: Option<Extension<Identity>>,
) -> Result<StatusCode> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::TaxonomyManage,
    )
    .await?;

    state.service_context.taxonomy.delete_tag(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}
