//! Assignment statistics model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of reviewer links a user holds on open pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserAssignmentCount {
    pub user_id: String,
    pub count: i64,
}
