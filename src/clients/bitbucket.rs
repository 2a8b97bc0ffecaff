use chrono::{DateTime, TimeZone, Utc};
use futures_util::future::join_all;
use serde::Deserialize;

use crate::{
    config::BitbucketConfig,
    domain::{BuildStatus, PullRequest},
    error::{AppError, Result},
};

// Wire shapes for the Bitbucket Server 1.0 REST API. Only the fields the
// reshaping needs are declared.

#[derive(Debug, Deserialize)]
struct PagedResponse<T> {
    values: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPullRequest {
    id: i64,
    title: String,
    created_date: i64,
    updated_date: i64,
    from_ref: RawRef,
    to_ref: RawRef,
    author: RawParticipant,
    #[serde(default)]
    reviewers: Vec<RawParticipant>,
    #[serde(default)]
    links: RawLinks,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRef {
    display_id: String,
    #[serde(default)]
    latest_commit: Option<String>,
    #[serde(default)]
    repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct RawParticipant {
    user: RawUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    display_name: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawLinks {
    #[serde(rename = "self", default)]
    self_links: Vec<RawHref>,
}

#[derive(Debug, Deserialize)]
struct RawHref {
    href: String,
}

#[derive(Debug, Deserialize)]
struct RawBuildState {
    state: String,
}

pub struct BitbucketClient {
    config: BitbucketConfig,
    http: reqwest::Client,
}

impl BitbucketClient {
    pub fn new(config: Option<BitbucketConfig>) -> Option<Self> {
        config.and_then(|cfg| {
            if cfg.enabled {
                Some(Self { config: cfg, http: reqwest::Client::new() })
            } else {
                None
            }
        })
    }

    /// Fetch one page of pull requests and enrich each with a build status.
    /// The status lookups fan out concurrently, one request per PR; a failed
    /// lookup degrades that PR to `Unknown` instead of failing the batch.
    pub async fn list_pull_requests(
        &self,
        project: &str,
        repo: &str,
        state: &str,
        limit: u32,
    ) -> Result<Vec<PullRequest>> {
        let url = format!(
            "{}/rest/api/1.0/projects/{}/repos/{}/pull-requests",
            self.config.base_url, project, repo
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.token)
            .query(&[("state", state), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| AppError::External(format!("Bitbucket is unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Bitbucket returned {} for {}/{}",
                response.status(),
                project,
                repo
            )));
        }

        let page: PagedResponse<RawPullRequest> = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Unexpected Bitbucket response: {}", e)))?;

        let statuses = join_all(
            page.values
                .iter()
                .map(|pr| self.build_status_for(pr.from_ref.latest_commit.as_deref())),
        )
        .await;

        page.values
            .into_iter()
            .zip(statuses)
            .map(|(raw, build_status)| Self::reshape(raw, build_status))
            .collect()
    }

    /// Best-effort build status for a commit. Any failure maps to `Unknown`.
    async fn build_status_for(&self, commit: Option<&str>) -> BuildStatus {
        let Some(commit) = commit else {
            return BuildStatus::Unknown;
        };

        let url = format!("{}/rest/build-status/1.0/commits/{}", self.config.base_url, commit);
        let result = async {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.token)
                .send()
                .await?
                .error_for_status()?;
            response.json::<PagedResponse<RawBuildState>>().await
        }
        .await;

        match result {
            Ok(page) => BuildStatus::from_states(page.values.iter().map(|b| b.state.as_str())),
            Err(e) => {
                tracing::warn!("Build status lookup failed for {}: {}", commit, e);
                BuildStatus::Unknown
            }
        }
    }

    fn reshape(raw: RawPullRequest, build_status: BuildStatus) -> Result<PullRequest> {
        Ok(PullRequest {
            id: raw.id,
            title: raw.title,
            author: raw.author.user.display_name,
            reviewers: raw.reviewers.into_iter().map(|r| r.user.display_name).collect(),
            source_branch: raw.from_ref.display_id,
            target_branch: raw.to_ref.display_id,
            repository: raw
                .from_ref
                .repository
                .map(|r| r.slug)
                .unwrap_or_default(),
            url: raw.links.self_links.into_iter().next().map(|l| l.href),
            build_status,
            created_at: epoch_millis(raw.created_date)?,
            updated_at: epoch_millis(raw.updated_date)?,
        })
    }
}

fn epoch_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| AppError::External(format!("Invalid Bitbucket timestamp: {}", ms)))
}
