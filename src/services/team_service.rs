//! Team onboarding and lookup.

use crate::db::pool::DbPool;
use crate::db::{teams, users};
use crate::error::AppError;
use crate::models::{Team, TeamMember};
use std::collections::HashSet;

/// Register a team and reconcile its members.
///
/// Steps, each a separate statement:
/// 1. create the team row (fails with `TeamNameExists` if taken)
/// 2. look up which member IDs already exist
/// 3. bulk-insert the unknown ones into the team
/// 4. bulk-relocate the known ones to the team
///
/// A failure after step 1 leaves the team registered with whatever members
/// were written so far. The input payload is returned unchanged.
pub async fn add_team(pool: &DbPool, team: Team) -> Result<Team, AppError> {
    if teams::team_exists(pool, &team.team_name).await? {
        log::debug!("[team] Rejecting duplicate team {}", team.team_name);
        return Err(AppError::team_name_exists(&team.team_name));
    }

    teams::create_team(pool, &team.team_name).await?;

    let members = unique_members(&team.members);
    let member_ids: Vec<String> = members.iter().map(|m| m.user_id.clone()).collect();
    let existing = users::existing_user_ids(pool, &member_ids).await?;

    let (known, unknown): (Vec<TeamMember>, Vec<TeamMember>) = members
        .into_iter()
        .partition(|member| existing.contains(&member.user_id));

    users::create_users(pool, &unknown, &team.team_name).await?;

    let known_ids: Vec<String> = known.into_iter().map(|m| m.user_id).collect();
    let relocated = users::update_users_team(pool, &known_ids, &team.team_name).await?;

    log::info!(
        "[team] Created team {} ({} new users, {} relocated)",
        team.team_name,
        unknown.len(),
        relocated
    );

    Ok(team)
}

/// Fetch a team with its live membership.
pub async fn get_team(pool: &DbPool, team_name: &str) -> Result<Team, AppError> {
    if !teams::team_exists(pool, team_name).await? {
        return Err(AppError::team_not_found(team_name));
    }

    let members = users::get_members_by_team(pool, team_name).await?;

    Ok(Team {
        team_name: team_name.to_string(),
        members,
    })
}

/// Drop repeated user IDs from a payload, keeping the first occurrence.
fn unique_members(members: &[TeamMember]) -> Vec<TeamMember> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|member| seen.insert(member.user_id.as_str()))
        .cloned()
        .collect()
}
