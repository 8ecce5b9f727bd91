//! Reviewer workload statistics.

use crate::db::pool::DbPool;
use crate::db::stats;
use crate::error::AppError;
use crate::models::UserAssignmentCount;

/// Open-PR reviewer link counts per reviewer, ordered by user ID.
pub async fn get_assignments_stats_by_reviewers(
    pool: &DbPool,
) -> Result<Vec<UserAssignmentCount>, AppError> {
    stats::assignments_by_reviewers(pool).await
}
