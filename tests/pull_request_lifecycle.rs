//! Pull request lifecycle tests.
//!
//! Create with random reviewers, idempotent merge, and reassignment rules.

mod common;

use common::{add_active_team, clear_reviewers, link_reviewer, member, setup_db, team};
use review_roster_lib::error::AppError;
use review_roster_lib::models::PullRequestStatus;
use review_roster_lib::services::{pull_request_service, team_service, user_service};

#[tokio::test]
async fn test_create_assigns_at_most_two_teammates() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c", "d"]).await;
    add_active_team(&pool, "other", &["x"]).await;

    for i in 0..20 {
        let id = format!("pr-{}", i);
        let pr = pull_request_service::create_pull_request(&pool, &id, "Add X", "a")
            .await
            .unwrap();

        assert_eq!(pr.status, PullRequestStatus::Open);
        assert_eq!(pr.author_id, "a");
        assert_eq!(pr.assigned_reviewers.len(), 2);
        assert_ne!(pr.assigned_reviewers[0], pr.assigned_reviewers[1]);
        for reviewer in &pr.assigned_reviewers {
            assert!(["b", "c", "d"].contains(&reviewer.as_str()));
        }
        assert!(pr.merged_at.is_none());
    }

    println!("✅ Reviewers capped at two, never the author or outsiders");
}

#[tokio::test]
async fn test_create_skips_inactive_teammates() {
    let (_dir, pool) = setup_db().await;
    team_service::add_team(
        &pool,
        team("beta", vec![member("a", true), member("b", false), member("c", true)]),
    )
    .await
    .unwrap();

    let pr = pull_request_service::create_pull_request(&pool, "pr-1", "Fix", "a")
        .await
        .unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["c"]);
}

#[tokio::test]
async fn test_create_with_no_candidates_is_valid() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "solo", &["a"]).await;

    let pr = pull_request_service::create_pull_request(&pool, "pr-1", "Alone", "a")
        .await
        .unwrap();
    assert!(pr.assigned_reviewers.is_empty());
    assert_eq!(pr.status, PullRequestStatus::Open);
}

#[tokio::test]
async fn test_create_rejects_duplicate_and_unknown_author() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b"]).await;

    pull_request_service::create_pull_request(&pool, "pr-1", "First", "a")
        .await
        .unwrap();

    let err = pull_request_service::create_pull_request(&pool, "pr-1", "Again", "b")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PullRequestExists { .. }));

    let err = pull_request_service::create_pull_request(&pool, "pr-2", "Ghost", "nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorOrTeamNotFound { ref author_id } if author_id == "nobody"));
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c"]).await;
    let created = pull_request_service::create_pull_request(&pool, "pr-1", "Ship", "a")
        .await
        .unwrap();

    let first = pull_request_service::merge_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(first.status, PullRequestStatus::Merged);
    assert!(first.merged_at.is_some());
    assert_eq!(first.assigned_reviewers, created.assigned_reviewers);

    let second = pull_request_service::merge_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(second, first);

    let err = pull_request_service::merge_pull_request(&pool, "missing").await.unwrap_err();
    assert!(matches!(err, AppError::PullRequestNotFound { .. }));

    println!("✅ Merge is idempotent");
}

#[tokio::test]
async fn test_reassign_picks_outside_current_reviewers() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c", "d"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Refactor", "a")
        .await
        .unwrap();

    clear_reviewers(&pool, "pr-1").await;
    link_reviewer(&pool, "pr-1", "b").await;
    link_reviewer(&pool, "pr-1", "c").await;

    let outcome = pull_request_service::reassign_pull_request(&pool, "pr-1", "b")
        .await
        .unwrap();
    assert_eq!(outcome.replaced_by.as_deref(), Some("d"));
    // The replacement takes the old reviewer's slot.
    assert_eq!(outcome.pull_request.assigned_reviewers, vec!["d", "c"]);
}

#[tokio::test]
async fn test_reassign_without_candidate_leaves_pr_unchanged() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Refactor", "a")
        .await
        .unwrap();

    let before = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
    let outcome = pull_request_service::reassign_pull_request(&pool, "pr-1", "b")
        .await
        .unwrap();

    assert_eq!(outcome.replaced_by, None);
    assert_eq!(outcome.pull_request, before);
}

#[tokio::test]
async fn test_reassign_error_order() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Refactor", "a")
        .await
        .unwrap();

    let err = pull_request_service::reassign_pull_request(&pool, "missing", "ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PullRequestNotFound { .. }));

    pull_request_service::merge_pull_request(&pool, "pr-1").await.unwrap();

    // Unknown reviewer is reported before the merged state.
    let err = pull_request_service::reassign_pull_request(&pool, "pr-1", "ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound { .. }));

    let err = pull_request_service::reassign_pull_request(&pool, "pr-1", "b")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyMerged { .. }));
}

#[tokio::test]
async fn test_reassign_ignores_inactive_and_foreign_users() {
    let (_dir, pool) = setup_db().await;
    team_service::add_team(
        &pool,
        team(
            "alpha",
            vec![member("a", true), member("b", true), member("c", false), member("e", true)],
        ),
    )
    .await
    .unwrap();
    add_active_team(&pool, "other", &["x"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Refactor", "a")
        .await
        .unwrap();

    clear_reviewers(&pool, "pr-1").await;
    link_reviewer(&pool, "pr-1", "b").await;

    let outcome = pull_request_service::reassign_pull_request(&pool, "pr-1", "b")
        .await
        .unwrap();
    assert_eq!(outcome.replaced_by.as_deref(), Some("e"));
    assert_eq!(outcome.pull_request.assigned_reviewers, vec!["e"]);
}

#[tokio::test]
async fn test_user_review_queue() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b"]).await;

    pull_request_service::create_pull_request(&pool, "pr-1", "One", "a")
        .await
        .unwrap();
    pull_request_service::create_pull_request(&pool, "pr-2", "Two", "a")
        .await
        .unwrap();
    pull_request_service::merge_pull_request(&pool, "pr-1").await.unwrap();

    let (user_id, queue) = user_service::get_user_review(&pool, "b").await.unwrap();
    assert_eq!(user_id, "b");
    let mut ids: Vec<&str> = queue.iter().map(|pr| pr.pull_request_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["pr-1", "pr-2"]);

    let (_, empty) = user_service::get_user_review(&pool, "a").await.unwrap();
    assert!(empty.is_empty());

    let err = user_service::get_user_review(&pool, "ghost").await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound { .. }));
}

#[tokio::test]
async fn test_set_is_active_keeps_links() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "One", "a")
        .await
        .unwrap();

    let user = user_service::set_is_active(&pool, "b", false).await.unwrap();
    assert!(!user.is_active);
    assert_eq!(user.team_name, "alpha");

    let pr = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["b"]);

    let err = user_service::set_is_active(&pool, "ghost", true).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound { .. }));
}

#[tokio::test]
async fn test_reassign_unlinked_reviewer_reports_pick_without_rewrite() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c", "d"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Refactor", "a")
        .await
        .unwrap();
    clear_reviewers(&pool, "pr-1").await;
    link_reviewer(&pool, "pr-1", "b").await;

    // c exists but does not review pr-1.
    let outcome = pull_request_service::reassign_pull_request(&pool, "pr-1", "c")
        .await
        .unwrap();
    assert_eq!(outcome.replaced_by.as_deref(), Some("d"));
    assert_eq!(outcome.pull_request.assigned_reviewers, vec!["b"]);
}
