//! User model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user with its team reference and activity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[sqlx(rename = "id")]
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}
