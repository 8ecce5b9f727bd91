//! REST API routes for teams, users and pull requests.
//!
//! Handlers validate request shape (required fields, string lengths), call
//! the services, and map `AppError` variants to HTTP status codes. Domain
//! rules live in the services.

use crate::error::AppError;
use crate::models::{DeactivateUsers, PullRequest, PullRequestShort, Team, User, UserAssignmentCount};
use crate::services::review_server::ReviewState;
use crate::services::{pull_request_service, stats_service, team_service, user_service};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Maximum length of team names and usernames.
const MAX_NAME_LEN: usize = 128;
/// Maximum length of user and pull request IDs.
const MAX_ID_LEN: usize = 64;
/// Maximum length of pull request titles.
const MAX_PR_NAME_LEN: usize = 256;

// ── Error handling ───────────────────────────────────────────────────────────

/// JSON error body.
#[derive(Serialize)]
struct ApiError {
    code: String,
    message: String,
}

/// Wrapper to make AppError usable as an axum error response.
pub struct ApiErr(AppError);

impl ApiErr {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::TeamNameExists { .. } => (StatusCode::CONFLICT, "TEAM_EXISTS"),
            AppError::PullRequestExists { .. } => (StatusCode::CONFLICT, "PR_EXISTS"),
            AppError::AlreadyMerged { .. } => (StatusCode::CONFLICT, "PR_MERGED"),
            AppError::UsersNotSameTeam { .. } => (StatusCode::BAD_REQUEST, "USERS_NOT_SAME_TEAM"),
            AppError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            err if err.is_not_found() => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            log::error!("[api] {}", self.0);
        }
        (
            status,
            Json(ApiError {
                code: code.to_string(),
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AppError> for ApiErr {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiErr {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::invalid_input(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiErr {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::invalid_input(rejection.body_text()))
    }
}

type ApiResult<T> = Result<T, ApiErr>;

/// Reject empty or over-long string fields.
fn check_len(value: &str, field: &str, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(AppError::invalid_input_field(
            format!("{} length must be 1..{}", field, max),
            field,
        ));
    }
    Ok(())
}

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct TeamNameQuery {
    team_name: String,
}

#[derive(Deserialize)]
struct UserIdQuery {
    user_id: String,
}

#[derive(Deserialize)]
struct SetIsActiveRequest {
    user_id: String,
    is_active: bool,
}

#[derive(Deserialize)]
struct CreatePullRequestRequest {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
}

#[derive(Deserialize)]
struct MergePullRequestRequest {
    pull_request_id: String,
}

#[derive(Deserialize)]
struct ReassignRequest {
    pull_request_id: String,
    old_reviewer_id: String,
}

#[derive(Serialize)]
struct TeamResponse {
    team: Team,
}

#[derive(Serialize)]
struct UserResponse {
    user: User,
}

#[derive(Serialize)]
struct PullRequestResponse {
    pr: PullRequest,
}

#[derive(Serialize)]
struct ReassignResponse {
    pr: PullRequest,
    /// Empty when no teammate qualified.
    replaced_by: String,
}

#[derive(Serialize)]
struct ReviewQueueResponse {
    user_id: String,
    pull_requests: Vec<PullRequestShort>,
}

#[derive(Serialize)]
struct DeactivateResponse {
    deactivated: DeactivateUsers,
}

#[derive(Serialize)]
struct StatsResponse {
    title: &'static str,
    statistics: Vec<UserAssignmentCount>,
}

// ── Route builder ────────────────────────────────────────────────────────────

/// Build the team, user, pull request and stats routes.
pub fn review_api_routes() -> Router<ReviewState> {
    Router::new()
        .route("/health", get(health))
        .route("/team/add", post(add_team))
        .route("/team/get", get(get_team))
        .route("/users/setIsActive", post(set_is_active))
        .route("/users/getReview", get(get_review))
        .route("/users/deactivate", post(deactivate_users))
        .route("/pullRequest/create", post(create_pull_request))
        .route("/pullRequest/merge", post(merge_pull_request))
        .route("/pullRequest/reassign", post(reassign_pull_request))
        .route("/stats/assignmentsByReviewers", get(assignments_stats))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /health: liveness check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /team/add: create a team and reconcile its members.
async fn add_team(
    State(state): State<ReviewState>,
    payload: Result<Json<Team>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let Json(team) = payload?;

    check_len(&team.team_name, "team_name", MAX_NAME_LEN)?;
    for member in &team.members {
        check_len(&member.user_id, "user_id", MAX_ID_LEN)?;
        check_len(&member.username, "username", MAX_NAME_LEN)?;
    }

    let team = team_service::add_team(&state.db, team).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// GET /team/get?team_name=X: team with live membership.
async fn get_team(
    State(state): State<ReviewState>,
    query: Result<Query<TeamNameQuery>, QueryRejection>,
) -> ApiResult<Json<Team>> {
    let Query(params) = query?;
    check_len(&params.team_name, "team_name", MAX_NAME_LEN)?;

    let team = team_service::get_team(&state.db, &params.team_name).await?;
    Ok(Json(team))
}

/// POST /users/setIsActive: flip one user's activity flag.
async fn set_is_active(
    State(state): State<ReviewState>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(req) = payload?;
    check_len(&req.user_id, "user_id", MAX_ID_LEN)?;

    let user = user_service::set_is_active(&state.db, &req.user_id, req.is_active).await?;
    Ok(Json(UserResponse { user }))
}

/// GET /users/getReview?user_id=X: the user's review queue.
async fn get_review(
    State(state): State<ReviewState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> ApiResult<Json<ReviewQueueResponse>> {
    let Query(params) = query?;
    check_len(&params.user_id, "user_id", MAX_ID_LEN)?;

    let (user_id, pull_requests) = user_service::get_user_review(&state.db, &params.user_id).await?;
    Ok(Json(ReviewQueueResponse {
        user_id,
        pull_requests,
    }))
}

/// POST /users/deactivate: deactivate team members and reassign their reviews.
async fn deactivate_users(
    State(state): State<ReviewState>,
    payload: Result<Json<DeactivateUsers>, JsonRejection>,
) -> ApiResult<Json<DeactivateResponse>> {
    let Json(req) = payload?;
    check_len(&req.team_name, "team_name", MAX_NAME_LEN)?;
    for user_id in &req.user_ids {
        check_len(user_id, "user_ids", MAX_ID_LEN)?;
    }

    let deactivated = user_service::deactivate_team_users(&state.db, req).await?;
    Ok(Json(DeactivateResponse { deactivated }))
}

/// POST /pullRequest/create: open a PR and assign reviewers.
async fn create_pull_request(
    State(state): State<ReviewState>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PullRequestResponse>)> {
    let Json(req) = payload?;
    check_len(&req.pull_request_id, "pull_request_id", MAX_ID_LEN)?;
    check_len(&req.pull_request_name, "pull_request_name", MAX_PR_NAME_LEN)?;
    check_len(&req.author_id, "author_id", MAX_ID_LEN)?;

    let pr = pull_request_service::create_pull_request(
        &state.db,
        &req.pull_request_id,
        &req.pull_request_name,
        &req.author_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

/// POST /pullRequest/merge: idempotent merge.
async fn merge_pull_request(
    State(state): State<ReviewState>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> ApiResult<Json<PullRequestResponse>> {
    let Json(req) = payload?;
    check_len(&req.pull_request_id, "pull_request_id", MAX_ID_LEN)?;

    let pr = pull_request_service::merge_pull_request(&state.db, &req.pull_request_id).await?;
    Ok(Json(PullRequestResponse { pr }))
}

/// POST /pullRequest/reassign: swap one reviewer for another teammate.
async fn reassign_pull_request(
    State(state): State<ReviewState>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> ApiResult<Json<ReassignResponse>> {
    let Json(req) = payload?;
    check_len(&req.pull_request_id, "pull_request_id", MAX_ID_LEN)?;
    check_len(&req.old_reviewer_id, "old_reviewer_id", MAX_ID_LEN)?;

    let outcome = pull_request_service::reassign_pull_request(
        &state.db,
        &req.pull_request_id,
        &req.old_reviewer_id,
    )
    .await?;
    Ok(Json(ReassignResponse {
        pr: outcome.pull_request,
        replaced_by: outcome.replaced_by.unwrap_or_default(),
    }))
}

/// GET /stats/assignmentsByReviewers: open review load per reviewer.
async fn assignments_stats(State(state): State<ReviewState>) -> ApiResult<Json<StatsResponse>> {
    let statistics = stats_service::get_assignments_stats_by_reviewers(&state.db).await?;
    Ok(Json(StatsResponse {
        title: "assignments by reviewers",
        statistics,
    }))
}
