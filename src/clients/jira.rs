use serde::Deserialize;
use serde_json::json;

use crate::{
    config::JiraConfig,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

pub struct JiraClient {
    config: JiraConfig,
    http: reqwest::Client,
}

impl JiraClient {
    pub fn new(config: Option<JiraConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self { config: cfg, http: reqwest::Client::new() })
            } else {
                None
            }
        })
    }

    /// Open a bug ticket and return its browse URL.
    pub async fn create_issue(&self, summary: &str, description: &str) -> Result<String> {
        let url = format!("{}/rest/api/2/issue", self.config.base_url);
        let body = json!({
            "fields": {
                "project": { "key": self.config.project_key },
                "summary": summary,
                "description": description,
                "issuetype": { "name": "Bug" },
            }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Ticketing system is unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Ticketing system rejected the issue: {}",
                response.status()
            )));
        }

        let issue: CreatedIssue = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Unexpected ticketing response: {}", e)))?;

        Ok(format!("{}/browse/{}", self.config.base_url, issue.key))
    }
}
