//! Aggregate queries over reviewer links.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::UserAssignmentCount;

/// Count reviewer links on open pull requests, per reviewer.
pub async fn assignments_by_reviewers(pool: &DbPool) -> Result<Vec<UserAssignmentCount>, AppError> {
    let stats = sqlx::query_as::<_, UserAssignmentCount>(
        r#"
        SELECT prr.reviewer_id AS user_id, COUNT(*) AS count
        FROM pull_request_reviewers prr
        JOIN pull_requests pr ON pr.id = prr.pull_request_id
        WHERE pr.status = 'OPEN'
        GROUP BY prr.reviewer_id
        ORDER BY prr.reviewer_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(stats)
}
