use axum::{extract::State, Json};

use crate::{
    api::state::AppState,
    domain::{bucket_by_severity, CostReport, VulnerabilityReport},
    error::{AppError, Result},
};

/// How many of the highest-severity items the dashboard card shows.
const TOP_ITEMS: usize = 10;

pub async fn vulnerabilities(State(state): State<AppState>) -> Result<Json<VulnerabilityReport>> {
    let client = state.fairwinds.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Fairwinds Insights integration is not configured".to_string())
    })?;

    let items = client.action_items().await?;

    Ok(Json(bucket_by_severity(items, TOP_ITEMS)))
}

pub async fn costs(State(state): State<AppState>) -> Result<Json<CostReport>> {
    let client = state.fairwinds.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Fairwinds Insights integration is not configured".to_string())
    })?;

    let workloads = client.workload_costs().await?;

    Ok(Json(CostReport::from_workloads(workloads)))
}
