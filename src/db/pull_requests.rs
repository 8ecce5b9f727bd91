//! Pull request and reviewer link queries.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PullRequestRecord, PullRequestShort};
use sqlx::{QueryBuilder, Sqlite};

/// Check whether a pull request with this ID exists.
pub async fn pull_request_exists(pool: &DbPool, pull_request_id: &str) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM pull_requests WHERE id = ?")
        .bind(pull_request_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Insert a new pull request in `OPEN` status.
pub async fn create_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
    name: &str,
    author_id: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO pull_requests (id, name, author_id, status, created_at)
        VALUES (?, ?, ?, 'OPEN', ?)
        "#,
    )
    .bind(pull_request_id)
    .bind(name)
    .bind(author_id)
    .bind(super::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert one reviewer link per reviewer in a single statement.
pub async fn insert_reviewers(
    pool: &DbPool,
    pull_request_id: &str,
    reviewer_ids: &[String],
) -> Result<(), AppError> {
    if reviewer_ids.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id) ");
    builder.push_values(reviewer_ids, |mut row, reviewer_id| {
        row.push_bind(pull_request_id.to_string())
            .push_bind(reviewer_id.clone());
    });

    builder
        .build()
        .execute(pool)
        .await
        .map_err(|e| AppError::database_with_op(e.to_string(), "insert_reviewers"))?;

    Ok(())
}

/// Fetch a pull request row; `None` if unknown.
pub async fn get_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
) -> Result<Option<PullRequestRecord>, AppError> {
    let record = sqlx::query_as::<_, PullRequestRecord>(
        r#"
        SELECT id, name, author_id, status, created_at, merged_at
        FROM pull_requests
        WHERE id = ?
        "#,
    )
    .bind(pull_request_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Reviewer IDs linked to a pull request, in link creation order.
///
/// Rewritten links keep their position.
pub async fn get_reviewer_ids(
    pool: &DbPool,
    pull_request_id: &str,
) -> Result<Vec<String>, AppError> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT reviewer_id FROM pull_request_reviewers WHERE pull_request_id = ? ORDER BY rowid",
    )
    .bind(pull_request_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Flip an open pull request to `MERGED` and stamp the merge time.
///
/// Already merged rows are left untouched. Returns the number of rows changed.
pub async fn mark_merged(
    pool: &DbPool,
    pull_request_id: &str,
    merged_at: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE pull_requests SET status = 'MERGED', merged_at = ? WHERE id = ? AND status = 'OPEN'",
    )
    .bind(merged_at)
    .bind(pull_request_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Rewrite the reviewer of the `(pull_request_id, old_reviewer_id)` link in place.
///
/// Returns the number of links changed (0 if the old reviewer held no link).
pub async fn replace_reviewer(
    pool: &DbPool,
    pull_request_id: &str,
    old_reviewer_id: &str,
    new_reviewer_id: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE pull_request_reviewers
        SET reviewer_id = ?
        WHERE pull_request_id = ? AND reviewer_id = ?
        "#,
    )
    .bind(new_reviewer_id)
    .bind(pull_request_id)
    .bind(old_reviewer_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Pull requests on which `reviewer_id` holds a link, newest first.
pub async fn get_pull_requests_by_reviewer(
    pool: &DbPool,
    reviewer_id: &str,
) -> Result<Vec<PullRequestShort>, AppError> {
    let prs = sqlx::query_as::<_, PullRequestShort>(
        r#"
        SELECT pr.id, pr.name, pr.author_id, pr.status
        FROM pull_requests pr
        JOIN pull_request_reviewers prr ON prr.pull_request_id = pr.id
        WHERE prr.reviewer_id = ?
        ORDER BY pr.created_at DESC, pr.rowid DESC
        "#,
    )
    .bind(reviewer_id)
    .fetch_all(pool)
    .await?;

    Ok(prs)
}
