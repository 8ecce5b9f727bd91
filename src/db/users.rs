//! User queries.
//!
//! Batched lookups take a list of IDs and return only the IDs that resolved.

use crate::db::pool::DbPool;
use crate::db::MAX_BIND_PARAMS;
use crate::error::AppError;
use crate::models::{TeamMember, User};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::{HashMap, HashSet};

/// Bound parameters per inserted user row.
const USER_INSERT_PARAMS: usize = 4;

/// Return the subset of `user_ids` that already exist.
pub async fn existing_user_ids(
    pool: &DbPool,
    user_ids: &[String],
) -> Result<HashSet<String>, AppError> {
    let mut existing = HashSet::new();

    for chunk in user_ids.chunks(MAX_BIND_PARAMS) {
        let sql = format!(
            "SELECT id FROM users WHERE id IN ({})",
            super::placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, (String,)>(&sql);
        for id in chunk {
            query = query.bind(id.as_str());
        }

        let rows = query.fetch_all(pool).await?;
        existing.extend(rows.into_iter().map(|(id,)| id));
    }

    Ok(existing)
}

/// Fetch users by ID, keyed by ID. Unknown IDs are absent from the map.
pub async fn get_users_by_ids(
    pool: &DbPool,
    user_ids: &[String],
) -> Result<HashMap<String, User>, AppError> {
    let mut found = HashMap::new();

    for chunk in user_ids.chunks(MAX_BIND_PARAMS) {
        let sql = format!(
            "SELECT id, username, team_name, is_active FROM users WHERE id IN ({})",
            super::placeholders(chunk.len())
        );
        let mut query = sqlx::query_as::<_, User>(&sql);
        for id in chunk {
            query = query.bind(id.as_str());
        }

        let users = query.fetch_all(pool).await?;
        found.extend(users.into_iter().map(|user| (user.user_id.clone(), user)));
    }

    Ok(found)
}

/// Bulk-insert new users into a team.
///
/// One statement per batch of rows; a failure leaves earlier batches written.
pub async fn create_users(
    pool: &DbPool,
    members: &[TeamMember],
    team_name: &str,
) -> Result<(), AppError> {
    for chunk in members.chunks(MAX_BIND_PARAMS / USER_INSERT_PARAMS) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO users (id, username, team_name, is_active) ");
        builder.push_values(chunk, |mut row, member| {
            row.push_bind(member.user_id.clone())
                .push_bind(member.username.clone())
                .push_bind(team_name.to_string())
                .push_bind(member.is_active);
        });

        builder
            .build()
            .execute(pool)
            .await
            .map_err(|e| AppError::database_with_op(e.to_string(), "create_users"))?;
    }

    Ok(())
}

/// Point every listed user at `team_name`. Returns the number of rows changed.
pub async fn update_users_team(
    pool: &DbPool,
    user_ids: &[String],
    team_name: &str,
) -> Result<u64, AppError> {
    let mut changed = 0;

    // One slot per chunk is taken by the team name.
    for chunk in user_ids.chunks(MAX_BIND_PARAMS - 1) {
        let sql = format!(
            "UPDATE users SET team_name = ? WHERE id IN ({})",
            super::placeholders(chunk.len())
        );
        let mut query = sqlx::query(&sql).bind(team_name);
        for id in chunk {
            query = query.bind(id.as_str());
        }

        changed += query.execute(pool).await?.rows_affected();
    }

    Ok(changed)
}

/// List the members currently referencing a team.
pub async fn get_members_by_team(
    pool: &DbPool,
    team_name: &str,
) -> Result<Vec<TeamMember>, AppError> {
    let members = sqlx::query_as::<_, TeamMember>(
        "SELECT id, username, is_active FROM users WHERE team_name = ? ORDER BY id",
    )
    .bind(team_name)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

/// List full user records of a team, active or not.
pub async fn get_users_by_team(pool: &DbPool, team_name: &str) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, username, team_name, is_active FROM users WHERE team_name = ? ORDER BY id",
    )
    .bind(team_name)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Check whether a user with this ID exists.
pub async fn user_exists(pool: &DbPool, user_id: &str) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Fetch one user; `None` if unknown.
pub async fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, team_name, is_active FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Set the activity flag of a single user.
pub async fn set_is_active(pool: &DbPool, user_id: &str, is_active: bool) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Set the activity flag of every listed user. Returns the number of rows changed.
///
/// Large lists are split across statements; a failure leaves earlier
/// batches updated.
pub async fn set_users_active(
    pool: &DbPool,
    user_ids: &[String],
    is_active: bool,
) -> Result<u64, AppError> {
    let mut changed = 0;

    for chunk in user_ids.chunks(MAX_BIND_PARAMS - 1) {
        let sql = format!(
            "UPDATE users SET is_active = ? WHERE id IN ({})",
            super::placeholders(chunk.len())
        );
        let mut query = sqlx::query(&sql).bind(is_active);
        for id in chunk {
            query = query.bind(id.as_str());
        }

        let result = query
            .execute(pool)
            .await
            .map_err(|e| AppError::database_with_op(e.to_string(), "set_users_active"))?;
        changed += result.rows_affected();
    }

    Ok(changed)
}
