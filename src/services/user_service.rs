//! User activity, reviewer candidate search and the deactivation cascade.

use crate::db::pool::DbPool;
use crate::db::{pull_requests, users};
use crate::error::AppError;
use crate::models::{DeactivateUsers, PullRequestShort, PullRequestStatus, User};
use crate::services::assignment::{self, ExclusionSet};
use crate::services::pull_request_service;

/// Pick up to two initial reviewers among the author's active teammates.
pub async fn find_reviewers(pool: &DbPool, author: &User) -> Result<Vec<String>, AppError> {
    let teammates = users::get_users_by_team(pool, &author.team_name).await?;
    let picked = assignment::pick_initial_reviewers(author, &teammates, &mut rand::thread_rng());
    Ok(picked)
}

/// Find one active teammate of `author` outside `excluded` and the author.
pub async fn find_replacement_reviewer(
    pool: &DbPool,
    author: &User,
    excluded: &ExclusionSet,
) -> Result<Option<String>, AppError> {
    let teammates = users::get_users_by_team(pool, &author.team_name).await?;
    let picked =
        assignment::pick_replacement(author, &teammates, excluded, &mut rand::thread_rng());
    Ok(picked)
}

/// Set a single user's activity flag and return the refreshed record.
///
/// Unlike [`deactivate_team_users`], this does not touch reviewer links.
pub async fn set_is_active(pool: &DbPool, user_id: &str, is_active: bool) -> Result<User, AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::user_not_found(user_id));
    }

    users::set_is_active(pool, user_id, is_active).await?;

    users::get_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))
}

/// Review queue of a user: every PR they hold a reviewer link on, newest first.
pub async fn get_user_review(
    pool: &DbPool,
    user_id: &str,
) -> Result<(String, Vec<PullRequestShort>), AppError> {
    if !users::user_exists(pool, user_id).await? {
        return Err(AppError::user_not_found(user_id));
    }

    let prs = pull_request_service::get_pull_requests_by_reviewer(pool, user_id).await?;
    Ok((user_id.to_string(), prs))
}

/// Outcome counters of a deactivation cascade.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CascadeSummary {
    reassigned: usize,
    gaps: usize,
    skipped_merged: usize,
}

/// Deactivate a batch of users from one team, reassigning their open reviews.
///
/// All IDs must exist (`UserNotFound`) and belong to `team_name`
/// (`UsersNotSameTeam`); nothing is written otherwise. Each open PR reviewed
/// by a batch member gets a replacement drawn from the author's active
/// teammates outside the whole batch. PRs with no qualifying replacement keep
/// the slot unreplaced. The batch is flagged inactive last, in one statement;
/// links already rewritten stay rewritten if that statement fails.
pub async fn deactivate_team_users(
    pool: &DbPool,
    request: DeactivateUsers,
) -> Result<DeactivateUsers, AppError> {
    if request.user_ids.is_empty() {
        return Ok(request);
    }

    let found = users::get_users_by_ids(pool, &request.user_ids).await?;
    if let Some(missing) = request.user_ids.iter().find(|id| !found.contains_key(*id)) {
        return Err(AppError::user_not_found(missing));
    }

    let mut foreign: Vec<String> = found
        .values()
        .filter(|user| user.team_name != request.team_name)
        .map(|user| user.user_id.clone())
        .collect();
    if !foreign.is_empty() {
        foreign.sort();
        return Err(AppError::users_not_same_team(&request.team_name, foreign));
    }

    let batch = ExclusionSet::default().with(&request.user_ids);
    let mut summary = CascadeSummary::default();

    for user_id in &request.user_ids {
        let prs = pull_request_service::get_pull_requests_by_reviewer(pool, user_id).await?;
        for pr in prs {
            if pr.status_enum() != PullRequestStatus::Open {
                summary.skipped_merged += 1;
                continue;
            }

            match reassign_for_departure(pool, &pr, user_id, &batch).await? {
                Some(new_reviewer) => {
                    log::info!(
                        "[users] PR {}: reviewer {} replaced by {}",
                        pr.pull_request_id,
                        user_id,
                        new_reviewer
                    );
                    summary.reassigned += 1;
                }
                None => {
                    log::warn!(
                        "[users] PR {}: no replacement for departing reviewer {}",
                        pr.pull_request_id,
                        user_id
                    );
                    summary.gaps += 1;
                }
            }
        }
    }

    users::set_users_active(pool, &request.user_ids, false).await?;

    log::info!(
        "[users] Deactivated {} users of team {} ({} reassigned, {} gaps, {} merged skipped)",
        request.user_ids.len(),
        request.team_name,
        summary.reassigned,
        summary.gaps,
        summary.skipped_merged
    );

    Ok(request)
}

/// Swap `departing` out of one open PR. Returns the new reviewer, if any.
async fn reassign_for_departure(
    pool: &DbPool,
    pr: &PullRequestShort,
    departing: &str,
    batch: &ExclusionSet,
) -> Result<Option<String>, AppError> {
    let Some(author) = users::get_user(pool, &pr.author_id).await? else {
        log::warn!(
            "[users] PR {}: author {} not found, leaving reviewer {}",
            pr.pull_request_id,
            pr.author_id,
            departing
        );
        return Ok(None);
    };

    let current = pull_requests::get_reviewer_ids(pool, &pr.pull_request_id).await?;
    let excluded = batch.clone().with(&current);

    let Some(new_reviewer) = find_replacement_reviewer(pool, &author, &excluded).await? else {
        return Ok(None);
    };

    pull_requests::replace_reviewer(pool, &pr.pull_request_id, departing, &new_reviewer).await?;
    Ok(Some(new_reviewer))
}
