use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{summarize, CopilotDayMetrics, CopilotSummary},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub summary: CopilotSummary,
    pub daily: Vec<CopilotDayMetrics>,
}

pub async fn metrics(
    State(state): State<AppState>,
    Query(params): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>> {
    let client = state.copilot.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Copilot integration is not configured".to_string())
    })?;

    let daily = client.usage(params.days).await?;
    let summary = summarize(&daily);

    Ok(Json(MetricsResponse { summary, daily }))
}

pub async fn daily(
    State(state): State<AppState>,
    Query(params): Query<MetricsQuery>,
) -> Result<Json<Vec<CopilotDayMetrics>>> {
    let client = state.copilot.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Copilot integration is not configured".to_string())
    })?;

    let daily = client.usage(params.days).await?;

    Ok(Json(daily))
}
