//! Team and team member models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A member as listed in a team payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    #[sqlx(rename = "id")]
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team with its members.
///
/// Membership is derived from the `team_name` column on user rows; there is
/// no separate roster table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}
