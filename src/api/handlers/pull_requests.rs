use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::PullRequest,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListPullRequestsQuery {
    pub project: String,
    pub repo: String,
    /// OPEN, MERGED, or DECLINED; defaults to OPEN.
    pub state: Option<String>,
    pub limit: Option<u32>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListPullRequestsQuery>,
) -> Result<Json<Vec<PullRequest>>> {
    let client = state.bitbucket.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Bitbucket integration is not configured".to_string())
    })?;

    let pr_state = params.state.unwrap_or_else(|| "OPEN".to_string());
    let limit = params.limit.unwrap_or(25).min(100);

    let pull_requests = client
        .list_pull_requests(&params.project, &params.repo, &pr_state, limit)
        .await?;

    Ok(Json(pull_requests))
}
