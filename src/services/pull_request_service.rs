//! Pull request lifecycle: create, merge, reassign.
//!
//! Every operation is an ordered list of single-statement store calls with no
//! transaction around them. If a later step fails, earlier effects remain;
//! for example a PR row may exist without reviewer links. Readers treat a PR
//! with zero links as valid.

use crate::db::pool::DbPool;
use crate::db::{pull_requests, teams, users};
use crate::error::AppError;
use crate::models::{PullRequest, PullRequestShort};
use crate::services::assignment::ExclusionSet;
use crate::services::user_service;

/// Result of a reassignment request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    /// The reviewer that took over the slot; `None` when nobody qualified.
    ///
    /// Also set when the old reviewer held no link on the PR. Nothing is
    /// rewritten in that case and `pull_request` keeps its reviewers.
    pub replaced_by: Option<String>,
}

/// Fetch a pull request with its reviewer list.
pub async fn get_pull_request(pool: &DbPool, pull_request_id: &str) -> Result<PullRequest, AppError> {
    let record = pull_requests::get_pull_request(pool, pull_request_id)
        .await?
        .ok_or_else(|| AppError::pull_request_not_found(pull_request_id))?;

    let reviewers = pull_requests::get_reviewer_ids(pool, pull_request_id).await?;
    Ok(record.with_reviewers(reviewers))
}

/// Create an open pull request and assign up to two reviewers from the
/// author's team.
pub async fn create_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
    name: &str,
    author_id: &str,
) -> Result<PullRequest, AppError> {
    if pull_requests::pull_request_exists(pool, pull_request_id).await? {
        log::debug!("[pr] Rejecting duplicate PR {}", pull_request_id);
        return Err(AppError::pull_request_exists(pull_request_id));
    }

    let author = users::get_user(pool, author_id)
        .await?
        .ok_or_else(|| AppError::author_or_team_not_found(author_id))?;

    if !teams::team_exists(pool, &author.team_name).await? {
        return Err(AppError::author_or_team_not_found(author_id));
    }

    pull_requests::create_pull_request(pool, pull_request_id, name, author_id).await?;

    let reviewers = user_service::find_reviewers(pool, &author).await?;
    pull_requests::insert_reviewers(pool, pull_request_id, &reviewers).await?;

    if reviewers.is_empty() {
        log::warn!(
            "[pr] PR {} created without reviewers: no active teammates in {}",
            pull_request_id,
            author.team_name
        );
    } else {
        log::info!(
            "[pr] PR {} created by {} with reviewers {:?}",
            pull_request_id,
            author_id,
            reviewers
        );
    }

    get_pull_request(pool, pull_request_id).await
}

/// Merge a pull request. Idempotent: an already merged PR is returned as is.
pub async fn merge_pull_request(pool: &DbPool, pull_request_id: &str) -> Result<PullRequest, AppError> {
    let record = pull_requests::get_pull_request(pool, pull_request_id)
        .await?
        .ok_or_else(|| AppError::pull_request_not_found(pull_request_id))?;

    if record.is_open() {
        let changed = pull_requests::mark_merged(pool, pull_request_id, crate::db::now()).await?;
        if changed > 0 {
            log::info!("[pr] PR {} merged", pull_request_id);
        }
    }

    get_pull_request(pool, pull_request_id).await
}

/// Replace `old_reviewer_id` on an open pull request with another teammate
/// of the author.
///
/// Only the old reviewer's existence is checked, not whether they currently
/// review this PR. When no teammate qualifies the PR is returned unchanged
/// with `replaced_by: None`.
pub async fn reassign_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
    old_reviewer_id: &str,
) -> Result<Reassignment, AppError> {
    let record = pull_requests::get_pull_request(pool, pull_request_id)
        .await?
        .ok_or_else(|| AppError::pull_request_not_found(pull_request_id))?;

    if !users::user_exists(pool, old_reviewer_id).await? {
        return Err(AppError::user_not_found(old_reviewer_id));
    }

    if !record.is_open() {
        return Err(AppError::already_merged(pull_request_id));
    }

    let author = users::get_user(pool, &record.author_id)
        .await?
        .ok_or_else(|| AppError::author_or_team_not_found(&record.author_id))?;

    let current = pull_requests::get_reviewer_ids(pool, pull_request_id).await?;
    let mut excluded = ExclusionSet::for_author(&author.user_id).with(&current);
    excluded.insert(old_reviewer_id);

    let Some(new_reviewer) = user_service::find_replacement_reviewer(pool, &author, &excluded).await?
    else {
        log::info!(
            "[pr] PR {}: no available reviewer to replace {}",
            pull_request_id,
            old_reviewer_id
        );
        return Ok(Reassignment {
            pull_request: record.with_reviewers(current),
            replaced_by: None,
        });
    };

    let changed =
        pull_requests::replace_reviewer(pool, pull_request_id, old_reviewer_id, &new_reviewer)
            .await?;
    if changed == 0 {
        log::warn!(
            "[pr] PR {}: {} held no reviewer link, nothing rewritten",
            pull_request_id,
            old_reviewer_id
        );
    } else {
        log::info!(
            "[pr] PR {}: reviewer {} replaced by {}",
            pull_request_id,
            old_reviewer_id,
            new_reviewer
        );
    }

    Ok(Reassignment {
        pull_request: get_pull_request(pool, pull_request_id).await?,
        replaced_by: Some(new_reviewer),
    })
}

/// Pull requests on which `reviewer_id` holds a reviewer link, newest first.
pub async fn get_pull_requests_by_reviewer(
    pool: &DbPool,
    reviewer_id: &str,
) -> Result<Vec<PullRequestShort>, AppError> {
    pull_requests::get_pull_requests_by_reviewer(pool, reviewer_id).await
}
