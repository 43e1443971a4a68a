// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wayfare_domain::{Role, User};

use super::{create_test_email, create_test_persistence, create_test_user};
use crate::{Persistence, PersistenceError};

#[test]
fn upsert_creates_new_account_with_given_role() {
    let mut persistence: Persistence = create_test_persistence();

    let stored: User = persistence
        .upsert_user(&create_test_user("alice@example.com"))
        .expect("user stored");

    assert!(stored.user_id.is_some());
    assert_eq!(stored.role, Role::Tourist);
    assert_eq!(stored.email.value(), "alice@example.com");
}

#[test]
fn upsert_refreshes_display_fields_but_preserves_role() {
    let mut persistence: Persistence = create_test_persistence();

    let stored: User = persistence
        .upsert_user(&create_test_user("alice@example.com"))
        .expect("user stored");
    let user_id: i64 = stored.user_id.expect("persisted id");

    persistence
        .set_user_role(user_id, Role::Admin)
        .expect("role set");

    let updated_request: User = User::new(
        create_test_email("alice@example.com"),
        String::from("Alice Renamed"),
        Some(String::from("https://img.example.com/alice.jpg")),
        Role::Tourist,
    );
    let after: User = persistence
        .upsert_user(&updated_request)
        .expect("user updated");

    assert_eq!(after.user_id, Some(user_id));
    assert_eq!(after.name, "Alice Renamed");
    assert_eq!(
        after.photo.as_deref(),
        Some("https://img.example.com/alice.jpg")
    );
    // Upsert never writes the role column
    assert_eq!(after.role, Role::Admin);
}

#[test]
fn get_user_by_email_returns_none_for_unknown_address() {
    let mut persistence: Persistence = create_test_persistence();

    let found = persistence
        .get_user_by_email("nobody@example.com")
        .expect("query succeeds");

    assert!(found.is_none());
}

#[test]
fn list_users_filters_by_role() {
    let mut persistence: Persistence = create_test_persistence();

    let alice: User = persistence
        .upsert_user(&create_test_user("alice@example.com"))
        .expect("user stored");
    persistence
        .upsert_user(&create_test_user("bob@example.com"))
        .expect("user stored");
    persistence
        .set_user_role(alice.user_id.expect("persisted id"), Role::Admin)
        .expect("role set");

    let admins: Vec<User> = persistence
        .list_users(Some(Role::Admin), None)
        .expect("query succeeds");

    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].email.value(), "alice@example.com");
}

#[test]
fn list_users_matches_search_term_against_name_and_email() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .upsert_user(&create_test_user("alice@example.com"))
        .expect("user stored");
    persistence
        .upsert_user(&create_test_user("bob@example.com"))
        .expect("user stored");

    let matched: Vec<User> = persistence
        .list_users(None, Some("alice"))
        .expect("query succeeds");

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].email.value(), "alice@example.com");
}

#[test]
fn set_role_on_missing_user_reports_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    let result = persistence.set_user_role(9999, Role::Admin);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn delete_user_removes_account_and_sessions() {
    let mut persistence: Persistence = create_test_persistence();

    let stored: User = persistence
        .upsert_user(&create_test_user("alice@example.com"))
        .expect("user stored");
    let user_id: i64 = stored.user_id.expect("persisted id");

    persistence
        .create_session("token-1", user_id, "2027-01-01T00:00:00Z")
        .expect("session created");

    persistence.delete_user(user_id).expect("user deleted");

    assert!(
        persistence
            .get_user_by_id(user_id)
            .expect("query succeeds")
            .is_none()
    );
    assert!(
        persistence
            .get_session_by_token("token-1")
            .expect("query succeeds")
            .is_none()
    );
}
