//! Business logic services.
//!
//! Team onboarding, reviewer assignment and the pull request lifecycle live
//! here, along with the HTTP layer that exposes them. Services take a
//! `DbPool` and are independent of the transport.

pub mod assignment;
pub mod pull_request_service;
pub mod review_api;
pub mod review_server;
pub mod stats_service;
pub mod team_service;
pub mod user_service;

pub use pull_request_service::Reassignment;
pub use review_server::{start_server, ServerHandle};
