//! Pull request model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum number of reviewers picked when a pull request is created.
pub const MAX_INITIAL_REVIEWERS: usize = 2;

/// Status of a pull request. `MERGED` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl From<&str> for PullRequestStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MERGED" => Self::Merged,
            _ => Self::Open,
        }
    }
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A pull request row as stored, without its reviewer links.
#[derive(Debug, Clone, FromRow)]
pub struct PullRequestRecord {
    pub id: String,
    pub name: String,
    pub author_id: String,
    /// `OPEN` or `MERGED`.
    pub status: String,
    /// Creation timestamp (Unix).
    pub created_at: i64,
    /// Merge timestamp (Unix, if merged).
    pub merged_at: Option<i64>,
}

impl PullRequestRecord {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> PullRequestStatus {
        PullRequestStatus::from(self.status.as_str())
    }

    /// Check if the PR is still open for reviewer changes.
    pub fn is_open(&self) -> bool {
        self.status_enum() == PullRequestStatus::Open
    }

    /// Attach reviewer IDs to build the API representation.
    pub fn with_reviewers(self, assigned_reviewers: Vec<String>) -> PullRequest {
        let merged_at = self
            .merged_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        PullRequest {
            status: self.status_enum(),
            pull_request_id: self.id,
            pull_request_name: self.name,
            author_id: self.author_id,
            assigned_reviewers,
            merged_at,
        }
    }
}

/// A pull request with its currently assigned reviewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    #[serde(default)]
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "mergedAt", default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Review-queue projection of a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PullRequestShort {
    #[sqlx(rename = "id")]
    pub pull_request_id: String,
    #[sqlx(rename = "name")]
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
}

impl PullRequestShort {
    pub fn status_enum(&self) -> PullRequestStatus {
        PullRequestStatus::from(self.status.as_str())
    }
}
