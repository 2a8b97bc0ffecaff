use serde::Deserialize;

use crate::{
    config::FairwindsConfig,
    domain::{ActionItem, Severity, WorkloadCost},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActionItem {
    title: String,
    #[serde(default)]
    severity: f64,
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    resource_name: String,
    #[serde(default)]
    report_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkloadCost {
    workload: String,
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    total_cost: f64,
}

pub struct FairwindsClient {
    config: FairwindsConfig,
    http: reqwest::Client,
}

impl FairwindsClient {
    pub fn new(config: Option<FairwindsConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self { config: cfg, http: reqwest::Client::new() })
            } else {
                None
            }
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!(
            "{}/v0/organizations/{}/{}",
            self.config.base_url, self.config.organization, path
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Fairwinds Insights is unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Fairwinds Insights returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Unexpected Fairwinds response: {}", e)))
    }

    pub async fn action_items(&self) -> Result<Vec<ActionItem>> {
        let raw: Vec<RawActionItem> = self.fetch("action-items").await?;

        Ok(raw
            .into_iter()
            .map(|item| ActionItem {
                title: item.title,
                severity: Severity::from_score(item.severity),
                cluster: item.cluster,
                resource_name: item.resource_name,
                report_type: item.report_type,
            })
            .collect())
    }

    pub async fn workload_costs(&self) -> Result<Vec<WorkloadCost>> {
        let raw: Vec<RawWorkloadCost> = self.fetch("costs").await?;

        Ok(raw
            .into_iter()
            .map(|w| WorkloadCost {
                workload: w.workload,
                cluster: w.cluster,
                total_cost: w.total_cost,
            })
            .collect())
    }
}
