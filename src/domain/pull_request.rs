use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pull request reshaped from the Bitbucket wire format. Never persisted;
/// rebuilt per request from the upstream response.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub reviewers: Vec<String>,
    pub source_branch: String,
    pub target_branch: String,
    pub repository: String,
    pub url: Option<String>,
    pub build_status: BuildStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived build status for a pull request's latest source commit. `Unknown`
/// is the sentinel used when the per-PR status lookup fails; one failed
/// lookup never fails the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Successful,
    Failed,
    InProgress,
    Unknown,
}

impl BuildStatus {
    /// Collapse the per-build states reported for a commit into one status.
    /// Any failure wins, then an in-flight build, then success.
    pub fn from_states<'a>(states: impl IntoIterator<Item = &'a str>) -> Self {
        let mut saw_in_progress = false;
        let mut saw_success = false;
        for state in states {
            match state {
                "FAILED" => return Self::Failed,
                "INPROGRESS" => saw_in_progress = true,
                "SUCCESSFUL" => saw_success = true,
                _ => {}
            }
        }
        if saw_in_progress {
            Self::InProgress
        } else if saw_success {
            Self::Successful
        } else {
            Self::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_build_wins() {
        let status = BuildStatus::from_states(["SUCCESSFUL", "FAILED", "INPROGRESS"]);
        assert_eq!(status, BuildStatus::Failed);
    }

    #[test]
    fn in_progress_beats_success() {
        let status = BuildStatus::from_states(["SUCCESSFUL", "INPROGRESS"]);
        assert_eq!(status, BuildStatus::InProgress);
    }

    #[test]
    fn no_builds_is_unknown() {
        assert_eq!(BuildStatus::from_states([]), BuildStatus::Unknown);
    }
}
