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
    domain::Category,
    error::Result,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1))]
    pub title: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.service_context.taxonomy.list_categories().await?;
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let identity = identity.map(|Extension(i)| i);
    auth::require(
        state.service_context.permissions.as_ref(),
        identity.as_ref(),
        Permission::TaxonomyManage,
    )
    .await?;
    request.validate()?;

    let category = state.service_context.taxonomy.create_category(&request.title).await?;

    Ok((StatusCode::CREATED, Json(category)))
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

    state.service_context.taxonomy.delete_category(&slug).await?;

    Ok(StatusCode::NO_CONTENT)
}
