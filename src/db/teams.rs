//! Team queries.

use crate::db::pool::DbPool;
use crate::error::AppError;

/// Check whether a team with this name is registered.
pub async fn team_exists(pool: &DbPool, team_name: &str) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM teams WHERE name = ?")
        .bind(team_name)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Insert a new team record.
pub async fn create_team(pool: &DbPool, team_name: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO teams (name, created_at) VALUES (?, ?)")
        .bind(team_name)
        .bind(super::now())
        .execute(pool)
        .await?;

    Ok(())
}
