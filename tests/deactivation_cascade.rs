//! Bulk deactivation tests.
//!
//! Deactivating a batch reassigns every open review the batch holds to an
//! active teammate of the author outside the batch, then flags the batch
//! inactive. Merged history is left alone.

mod common;

use common::{add_active_team, clear_reviewers, link_reviewer, setup_db};
use review_roster_lib::db::users;
use review_roster_lib::error::AppError;
use review_roster_lib::models::DeactivateUsers;
use review_roster_lib::services::{pull_request_service, stats_service, user_service};

fn request(team_name: &str, user_ids: &[&str]) -> DeactivateUsers {
    DeactivateUsers {
        team_name: team_name.into(),
        user_ids: user_ids.iter().map(|id| id.to_string()).collect(),
    }
}

#[tokio::test]
async fn test_deactivate_without_replacement_leaves_slot() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "beta", &["a", "b"]).await;
    let pr = pull_request_service::create_pull_request(&pool, "pr-1", "Fix", "a")
        .await
        .unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["b"]);

    let result = user_service::deactivate_team_users(&pool, request("beta", &["b"]))
        .await
        .unwrap();
    assert_eq!(result, request("beta", &["b"]));

    let b = users::get_user(&pool, "b").await.unwrap().unwrap();
    assert!(!b.is_active);

    let pr = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["b"]);

    println!("✅ Gap left when no teammate qualifies");
}

#[tokio::test]
async fn test_deactivate_reassigns_outside_batch() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c", "d"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Feature", "a")
        .await
        .unwrap();
    clear_reviewers(&pool, "pr-1").await;
    link_reviewer(&pool, "pr-1", "b").await;
    link_reviewer(&pool, "pr-1", "c").await;

    // b and c leave together: only d qualifies, and only for one slot.
    user_service::deactivate_team_users(&pool, request("alpha", &["b", "c"]))
        .await
        .unwrap();

    let pr = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["d", "c"]);

    for id in ["b", "c"] {
        let user = users::get_user(&pool, id).await.unwrap().unwrap();
        assert!(!user.is_active);
    }
    let d = users::get_user(&pool, "d").await.unwrap().unwrap();
    assert!(d.is_active);
}

#[tokio::test]
async fn test_deactivate_never_picks_current_reviewer() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c", "d"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Feature", "a")
        .await
        .unwrap();

    // c stays and already reviews, so only d can take b's slot.
    for _ in 0..10 {
        clear_reviewers(&pool, "pr-1").await;
        link_reviewer(&pool, "pr-1", "b").await;
        link_reviewer(&pool, "pr-1", "c").await;
        user_service::set_is_active(&pool, "b", true).await.unwrap();

        user_service::deactivate_team_users(&pool, request("alpha", &["b"]))
            .await
            .unwrap();

        let pr = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["d", "c"]);
    }
}

#[tokio::test]
async fn test_deactivate_skips_merged_pull_requests() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c"]).await;
    pull_request_service::create_pull_request(&pool, "pr-1", "Old", "a")
        .await
        .unwrap();
    clear_reviewers(&pool, "pr-1").await;
    link_reviewer(&pool, "pr-1", "b").await;
    pull_request_service::merge_pull_request(&pool, "pr-1").await.unwrap();

    user_service::deactivate_team_users(&pool, request("alpha", &["b"]))
        .await
        .unwrap();

    let pr = pull_request_service::get_pull_request(&pool, "pr-1").await.unwrap();
    assert_eq!(pr.assigned_reviewers, vec!["b"]);
}

#[tokio::test]
async fn test_deactivate_unknown_user_writes_nothing() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b"]).await;

    let err = user_service::deactivate_team_users(&pool, request("alpha", &["b", "ghost"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound { ref user_id } if user_id == "ghost"));

    let b = users::get_user(&pool, "b").await.unwrap().unwrap();
    assert!(b.is_active);
}

#[tokio::test]
async fn test_deactivate_foreign_users_rejected() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b"]).await;
    add_active_team(&pool, "other", &["y", "x"]).await;

    let err = user_service::deactivate_team_users(&pool, request("alpha", &["b", "y", "x"]))
        .await
        .unwrap_err();
    match err {
        AppError::UsersNotSameTeam {
            team_name,
            user_ids,
        } => {
            assert_eq!(team_name, "alpha");
            assert_eq!(user_ids, vec!["x", "y"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    for id in ["b", "x", "y"] {
        let user = users::get_user(&pool, id).await.unwrap().unwrap();
        assert!(user.is_active);
    }
}

#[tokio::test]
async fn test_deactivate_empty_batch_is_noop() {
    let (_dir, pool) = setup_db().await;

    let result = user_service::deactivate_team_users(&pool, request("nowhere", &[]))
        .await
        .unwrap();
    assert!(result.user_ids.is_empty());
}

#[tokio::test]
async fn test_stats_count_open_links_only() {
    let (_dir, pool) = setup_db().await;
    add_active_team(&pool, "alpha", &["a", "b", "c"]).await;

    for id in ["pr-1", "pr-2", "pr-3"] {
        pull_request_service::create_pull_request(&pool, id, "Work", "a")
            .await
            .unwrap();
    }
    pull_request_service::merge_pull_request(&pool, "pr-3").await.unwrap();

    let stats = stats_service::get_assignments_stats_by_reviewers(&pool)
        .await
        .unwrap();
    let summary: Vec<(&str, i64)> = stats
        .iter()
        .map(|row| (row.user_id.as_str(), row.count))
        .collect();
    assert_eq!(summary, vec![("b", 2), ("c", 2)]);

    // After a deactivation with no replacement, links stay counted.
    user_service::deactivate_team_users(
        &pool,
        request("alpha", &["b", "c"]),
    )
    .await
    .unwrap();
    let stats = stats_service::get_assignments_stats_by_reviewers(&pool)
        .await
        .unwrap();
    assert_eq!(stats.len(), 2);
}
