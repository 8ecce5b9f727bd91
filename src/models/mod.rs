//! Data models for the application.
//!
//! These models represent the roster entities stored in the SQLite database
//! and the JSON payloads exchanged over the HTTP API.
//!
//! Row types derive `FromRow` for SQLx queries; API types derive Serialize/Deserialize.

pub mod deactivation;
pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

// Re-exports for convenient access
pub use deactivation::DeactivateUsers;
pub use pull_request::{PullRequest, PullRequestRecord, PullRequestShort, PullRequestStatus};
pub use stats::UserAssignmentCount;
pub use team::{Team, TeamMember};
pub use user::User;
