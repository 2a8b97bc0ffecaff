use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of Copilot usage as returned by the metrics API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopilotDayMetrics {
    pub day: NaiveDate,
    pub total_suggestions: i64,
    pub total_acceptances: i64,
    pub total_lines_suggested: i64,
    pub total_lines_accepted: i64,
    pub total_active_users: i64,
}

/// Dashboard aggregate over a range of daily metric rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CopilotSummary {
    pub days: usize,
    pub total_suggestions: i64,
    pub total_acceptances: i64,
    /// Acceptances over suggestions; 0 when there were no suggestions.
    pub acceptance_rate: f64,
    pub total_lines_suggested: i64,
    pub total_lines_accepted: i64,
    /// Sum of the daily active-user counts over the range.
    pub total_active_user_days: i64,
    pub peak_active_users: i64,
    pub average_active_users: f64,
}

pub fn summarize(rows: &[CopilotDayMetrics]) -> CopilotSummary {
    let total_suggestions: i64 = rows.iter().map(|r| r.total_suggestions).sum();
    let total_acceptances: i64 = rows.iter().map(|r| r.total_acceptances).sum();
    let total_active_users: i64 = rows.iter().map(|r| r.total_active_users).sum();

    let acceptance_rate = if total_suggestions > 0 {
        total_acceptances as f64 / total_suggestions as f64
    } else {
        0.0
    };
    let average_active_users = if rows.is_empty() {
        0.0
    } else {
        total_active_users as f64 / rows.len() as f64
    };

    CopilotSummary {
        days: rows.len(),
        total_suggestions,
        total_acceptances,
        acceptance_rate,
        total_lines_suggested: rows.iter().map(|r| r.total_lines_suggested).sum(),
        total_lines_accepted: rows.iter().map(|r| r.total_lines_accepted).sum(),
        total_active_user_days: total_active_users,
        peak_active_users: rows.iter().map(|r| r.total_active_users).max().unwrap_or(0),
        average_active_users,
    }
}
