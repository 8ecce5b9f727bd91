//! Application error types.
//!
//! Domain conditions are surfaced as dedicated variants so the HTTP layer can
//! map each one to a status code. Store and serialization failures are opaque
//! and collapse into `Database` / `Internal`.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by services.
///
/// All variants serialize to a structured JSON object (`type` + `details`).
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// A team with this name is already registered.
    #[error("team_name already exists: {team_name}")]
    TeamNameExists { team_name: String },

    /// No team with this name.
    #[error("team not found: {team_name}")]
    TeamNotFound { team_name: String },

    /// The team exists but has no members.
    #[error("no members found by team name: {team_name}")]
    TeamHasNoMembers { team_name: String },

    /// No user with this ID.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    /// A pull request with this ID already exists.
    #[error("PR id already exists: {pull_request_id}")]
    PullRequestExists { pull_request_id: String },

    /// No pull request with this ID.
    #[error("pull request not found: {pull_request_id}")]
    PullRequestNotFound { pull_request_id: String },

    /// The author is unknown or their team does not resolve.
    #[error("author or team not found: {author_id}")]
    AuthorOrTeamNotFound { author_id: String },

    /// Reviewer changes are only allowed while the PR is open.
    #[error("cannot reassign on merged PR: {pull_request_id}")]
    AlreadyMerged { pull_request_id: String },

    /// A deactivation batch contains users outside the stated team.
    #[error("users not in the same team: {team_name}")]
    UsersNotSameTeam {
        team_name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        user_ids: Vec<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn team_name_exists(team_name: impl Into<String>) -> Self {
        Self::TeamNameExists {
            team_name: team_name.into(),
        }
    }

    pub fn team_not_found(team_name: impl Into<String>) -> Self {
        Self::TeamNotFound {
            team_name: team_name.into(),
        }
    }

    pub fn team_has_no_members(team_name: impl Into<String>) -> Self {
        Self::TeamHasNoMembers {
            team_name: team_name.into(),
        }
    }

    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        Self::UserNotFound {
            user_id: user_id.into(),
        }
    }

    pub fn pull_request_exists(pull_request_id: impl Into<String>) -> Self {
        Self::PullRequestExists {
            pull_request_id: pull_request_id.into(),
        }
    }

    pub fn pull_request_not_found(pull_request_id: impl Into<String>) -> Self {
        Self::PullRequestNotFound {
            pull_request_id: pull_request_id.into(),
        }
    }

    pub fn author_or_team_not_found(author_id: impl Into<String>) -> Self {
        Self::AuthorOrTeamNotFound {
            author_id: author_id.into(),
        }
    }

    pub fn already_merged(pull_request_id: impl Into<String>) -> Self {
        Self::AlreadyMerged {
            pull_request_id: pull_request_id.into(),
        }
    }

    /// Create a team mismatch error listing the offending user IDs.
    pub fn users_not_same_team(team_name: impl Into<String>, user_ids: Vec<String>) -> Self {
        Self::UsersNotSameTeam {
            team_name: team_name.into(),
            user_ids,
        }
    }

    /// Create a database error with optional operation context.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this is one of the domain not-found conditions.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TeamNotFound { .. }
                | Self::TeamHasNoMembers { .. }
                | Self::UserNotFound { .. }
                | Self::PullRequestNotFound { .. }
                | Self::AuthorOrTeamNotFound { .. }
        )
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<crate::db::DbError> for AppError {
    fn from(err: crate::db::DbError) -> Self {
        Self::database(err.to_string())
    }
}
