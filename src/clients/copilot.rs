use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    config::CopilotConfig,
    domain::CopilotDayMetrics,
    error::{AppError, Result},
};

/// One day of usage as the Copilot metrics API reports it.
#[derive(Debug, Deserialize)]
struct RawUsageDay {
    day: NaiveDate,
    #[serde(default)]
    total_suggestions_count: i64,
    #[serde(default)]
    total_acceptances_count: i64,
    #[serde(default)]
    total_lines_suggested: i64,
    #[serde(default)]
    total_lines_accepted: i64,
    #[serde(default)]
    total_active_users: i64,
}

pub struct CopilotClient {
    config: CopilotConfig,
    http: reqwest::Client,
}

impl CopilotClient {
    pub fn new(config: Option<CopilotConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self { config: cfg, http: reqwest::Client::new() })
            } else {
                None
            }
        })
    }

    /// Fetch the daily usage rows, newest last, optionally limited to the
    /// trailing `days`.
    pub async fn usage(&self, days: Option<u32>) -> Result<Vec<CopilotDayMetrics>> {
        let url = format!("{}/usage", self.config.base_url);

        let mut request = self.http.get(&url).bearer_auth(&self.config.token);
        if let Some(days) = days {
            request = request.query(&[("days", days.to_string())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::External(format!("Copilot metrics API is unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Copilot metrics API returned {}",
                response.status()
            )));
        }

        let rows: Vec<RawUsageDay> = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Unexpected Copilot response: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|raw| CopilotDayMetrics {
                day: raw.day,
                total_suggestions: raw.total_suggestions_count,
                total_acceptances: raw.total_acceptances_count,
                total_lines_suggested: raw.total_lines_suggested,
                total_lines_accepted: raw.total_lines_accepted,
                total_active_users: raw.total_active_users,
            })
            .collect())
    }
}
