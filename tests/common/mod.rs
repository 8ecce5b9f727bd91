//! Shared fixtures for integration tests.

#![allow(dead_code)]

use review_roster_lib::db::pool::DbPool;
use review_roster_lib::models::{Team, TeamMember};
use review_roster_lib::services::team_service;
use tempfile::TempDir;

/// Fresh database in a temporary directory. Keep the `TempDir` alive.
pub async fn setup_db() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = review_roster_lib::db::initialize(&db_path).await.unwrap();
    (dir, pool)
}

pub fn member(user_id: &str, is_active: bool) -> TeamMember {
    TeamMember {
        user_id: user_id.into(),
        username: format!("{}-name", user_id),
        is_active,
    }
}

pub fn team(team_name: &str, members: Vec<TeamMember>) -> Team {
    Team {
        team_name: team_name.into(),
        members,
    }
}

/// Member IDs of a team in listing order.
pub fn member_ids(team: &Team) -> Vec<String> {
    team.members.iter().map(|m| m.user_id.clone()).collect()
}

/// Register a team whose members are all active.
pub async fn add_active_team(pool: &DbPool, team_name: &str, user_ids: &[&str]) {
    let members = user_ids.iter().map(|id| member(id, true)).collect();
    team_service::add_team(pool, team(team_name, members))
        .await
        .unwrap();
}

/// Insert a reviewer link directly, bypassing random assignment.
pub async fn link_reviewer(pool: &DbPool, pull_request_id: &str, reviewer_id: &str) {
    sqlx::query("INSERT INTO pull_request_reviewers (pull_request_id, reviewer_id) VALUES (?, ?)")
        .bind(pull_request_id)
        .bind(reviewer_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Drop every reviewer link of a pull request.
pub async fn clear_reviewers(pool: &DbPool, pull_request_id: &str) {
    sqlx::query("DELETE FROM pull_request_reviewers WHERE pull_request_id = ?")
        .bind(pull_request_id)
        .execute(pool)
        .await
        .unwrap();
}
