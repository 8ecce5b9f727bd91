//! Bulk deactivation payload.

use serde::{Deserialize, Serialize};

/// Users of one team to deactivate together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateUsers {
    pub team_name: String,
    #[serde(alias = "users_ids")]
    pub user_ids: Vec<String>,
}
