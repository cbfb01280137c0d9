use std::{collections::HashSet, sync::Arc};

use richstatus_service::{
    InMemoryUserRepository, InsertError, NewUser, UserNotFound, UserRepository,
};

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser::try_from_parts(username, email).expect("test input should be valid")
}

#[tokio::test]
async fn insert_assigns_unique_identities() {
    let repo = InMemoryUserRepository::new();

    let bob = repo
        .insert(new_user("bob", "bob@x.com"))
        .await
        .expect("first insert should succeed");
    let alice = repo
        .insert(new_user("alice", "alice@x.com"))
        .await
        .expect("second insert should succeed");

    assert!(!bob.id.0.is_nil());
    assert_ne!(bob.id, alice.id);
}

#[tokio::test]
async fn duplicate_email_fails_with_any_username() {
    let repo = InMemoryUserRepository::new();
    repo.insert(new_user("bob", "bob@x.com"))
        .await
        .expect("first insert should succeed");

    let err = repo
        .insert(new_user("robert", "bob@x.com"))
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err, InsertError::DuplicateEmail("bob@x.com".to_string()));
}

#[tokio::test]
async fn duplicate_username_fails_with_any_email() {
    let repo = InMemoryUserRepository::new();
    repo.insert(new_user("bob", "bob@x.com"))
        .await
        .expect("first insert should succeed");

    let err = repo
        .insert(new_user("bob", "other@x.com"))
        .await
        .expect_err("duplicate username must fail");
    assert_eq!(err, InsertError::DuplicateUsername("bob".to_string()));
}

#[tokio::test]
async fn email_conflict_is_reported_before_username_conflict() {
    let repo = InMemoryUserRepository::new();
    repo.insert(new_user("bob", "first@x.com"))
        .await
        .expect("first insert should succeed");
    repo.insert(new_user("carol", "bob@x.com"))
        .await
        .expect("second insert should succeed");

    let err = repo
        .insert(new_user("bob", "bob@x.com"))
        .await
        .expect_err("conflicting insert must fail");
    assert!(matches!(err, InsertError::DuplicateEmail(_)));
}

#[tokio::test]
async fn lookups_report_not_found() {
    let repo = InMemoryUserRepository::new();
    repo.insert(new_user("bob", "bob@x.com"))
        .await
        .expect("insert should succeed");

    let by_email = repo
        .find_by_email("bob@x.com")
        .await
        .expect("lookup should succeed");
    assert_eq!(by_email.username, "bob");

    let by_name = repo
        .find_by_username("bob")
        .await
        .expect("lookup should succeed");
    assert_eq!(by_name.id, by_email.id);

    assert_eq!(
        repo.find_by_email("nobody@x.com").await,
        Err(UserNotFound("nobody@x.com".to_string()))
    );
    assert_eq!(
        repo.find_by_username("nobody").await,
        Err(UserNotFound("nobody".to_string()))
    );
}

#[tokio::test]
async fn list_all_returns_detached_snapshot() {
    let repo = InMemoryUserRepository::new();
    repo.insert(new_user("bob", "bob@x.com"))
        .await
        .expect("insert should succeed");

    let snapshot = repo.list_all().await;
    repo.insert(new_user("alice", "alice@x.com"))
        .await
        .expect("insert should succeed");

    assert_eq!(snapshot.len(), 1);
    assert_eq!(repo.list_all().await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_inserts_commit_once() {
    let repo = Arc::new(InMemoryUserRepository::new());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.insert(new_user(&format!("user{i}"), "shared@x.com"))
                    .await
            })
        })
        .collect();

    let mut committed = 0;
    for task in tasks {
        if task.await.expect("join should succeed").is_ok() {
            committed += 1;
        }
    }

    assert_eq!(committed, 1);
    let ids: HashSet<_> = repo.list_all().await.into_iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 1);
}
