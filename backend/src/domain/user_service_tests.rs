//! Tests for the user service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, UserPersistenceError};
use crate::domain::{Age, EmailAddress, ErrorCode, PasswordHash, PlainPassword, Role, Username};
use crate::test_support::fixtures;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
) -> UserService<MockUserRepository, MockPasswordHasher> {
    UserService::new(Arc::new(users), Arc::new(hasher))
}

fn returning_user(users: &mut MockUserRepository, user: &User) {
    let stored = user.clone();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
}

#[tokio::test]
async fn update_profile_applies_changes_and_persists() {
    let actor = fixtures::user(Role::User);
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &actor);
    users
        .expect_update()
        .withf(|user| {
            user.profile.location.as_deref() == Some("Leeds")
                && user.profile.age.map(Age::get) == Some(31)
        })
        .times(1)
        .return_once(|_| Ok(true));

    let service = make_service(users, MockPasswordHasher::new());
    let changes = ProfileChanges {
        location: Some(" Leeds ".to_owned()),
        age: Some(Age::new(31).expect("age")),
        ..ProfileChanges::default()
    };
    let updated = service
        .update_profile(&actor, changes)
        .await
        .expect("profile updated");

    assert_eq!(updated.profile.location.as_deref(), Some("Leeds"));
    assert!(updated.updated_at >= actor.updated_at);
}

#[tokio::test]
async fn get_user_reports_missing_accounts() {
    let actor = fixtures::user(Role::User);
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let service = make_service(users, MockPasswordHasher::new());
    let error = service
        .get_user(&actor, &UserId::random())
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::member(Role::User)]
#[case::psychologist(Role::Psychologist)]
#[tokio::test]
async fn non_admins_cannot_modify_other_accounts(#[case] role: Role) {
    let actor = fixtures::user(role);
    let other = fixtures::user_named("someone", "someone@example.com", Role::User);
    let other_id = other.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(other.clone())));
    users.expect_update().never();
    users.expect_delete().never();
    let service = make_service(users, MockPasswordHasher::new());

    let patch = service
        .update_user(&actor, &other_id, UserChanges::default())
        .await
        .expect_err("forbidden");
    assert_eq!(patch.code(), ErrorCode::Forbidden);

    let delete = service
        .delete_user(&actor, &other_id)
        .await
        .expect_err("forbidden");
    assert_eq!(delete.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn non_admins_cannot_change_their_own_role() {
    let actor = fixtures::user(Role::User);
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &actor);
    users.expect_update().never();
    let service = make_service(users, MockPasswordHasher::new());
    let changes = UserChanges {
        role: Some(Role::Admin),
        ..UserChanges::default()
    };
    let error = service
        .update_user(&actor, &actor.id, changes)
        .await
        .expect_err("forbidden");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn admin_patch_rehashes_password_and_sets_role() {
    let admin = fixtures::user(Role::Admin);
    let target = fixtures::user(Role::User);
    let target_id = target.id;
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &target);
    users
        .expect_update()
        .withf(|user| {
            user.role == Role::Psychologist
                && user.is_staff()
                && user.password_hash.as_str() == "$argon2id$new"
        })
        .times(1)
        .return_once(|_| Ok(true));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password.expose() == "a much better one")
        .times(1)
        .return_once(|_| Ok(PasswordHash::new("$argon2id$new")));

    let service = make_service(users, hasher);
    let changes = UserChanges {
        password: Some(PlainPassword::new("a much better one").expect("password")),
        role: Some(Role::Psychologist),
        ..UserChanges::default()
    };
    let updated = service
        .update_user(&admin, &target_id, changes)
        .await
        .expect("patched");
    assert_eq!(updated.role, Role::Psychologist);
}

#[tokio::test]
async fn patch_rejects_email_held_by_another_account() {
    let actor = fixtures::user(Role::User);
    let other = fixtures::user_named("taken", "taken@example.com", Role::User);
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &actor);
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(other)));

    let service = make_service(users, MockPasswordHasher::new());
    let changes = UserChanges {
        email: Some(EmailAddress::new("taken@example.com").expect("email")),
        ..UserChanges::default()
    };
    let error = service
        .update_user(&actor, &actor.id, changes)
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().expect("details")["code"], "email_taken");
}

#[tokio::test]
async fn patch_rejects_username_held_by_another_account() {
    let actor = fixtures::user(Role::User);
    let other = fixtures::user_named("taken", "taken@example.com", Role::User);
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &actor);
    users
        .expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(Some(other)));

    let service = make_service(users, MockPasswordHasher::new());
    let changes = UserChanges {
        username: Some(Username::new("taken").expect("username")),
        ..UserChanges::default()
    };
    let error = service
        .update_user(&actor, &actor.id, changes)
        .await
        .expect_err("duplicate");
    assert_eq!(error.details().expect("details")["code"], "username_taken");
}

#[rstest]
#[case::member(Role::User)]
#[case::psychologist(Role::Psychologist)]
#[case::admin(Role::Admin)]
#[tokio::test]
async fn unknown_ids_are_not_found_for_any_caller(#[case] role: Role) {
    let actor = fixtures::user(role);
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(2).returning(|_| Ok(None));
    users.expect_update().never();
    users.expect_delete().never();
    let service = make_service(users, MockPasswordHasher::new());

    let patch = service
        .update_user(&actor, &UserId::random(), UserChanges::default())
        .await
        .expect_err("missing");
    assert_eq!(patch.code(), ErrorCode::NotFound);

    let delete = service
        .delete_user(&actor, &UserId::random())
        .await
        .expect_err("missing");
    assert_eq!(delete.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_racing_another_removal_is_not_found() {
    let admin = fixtures::user(Role::Admin);
    let target = fixtures::user(Role::User);
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &target);
    users.expect_delete().times(1).return_once(|_| Ok(false));

    let service = make_service(users, MockPasswordHasher::new());
    let error = service
        .delete_user(&admin, &target.id)
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn owners_can_delete_themselves() {
    let actor = fixtures::user(Role::User);
    let expected = actor.id;
    let mut users = MockUserRepository::new();
    returning_user(&mut users, &actor);
    users
        .expect_delete()
        .withf(move |id| *id == expected)
        .times(1)
        .return_once(|_| Ok(true));

    let service = make_service(users, MockPasswordHasher::new());
    service
        .delete_user(&actor, &actor.id)
        .await
        .expect("deleted");
}

#[tokio::test]
async fn list_maps_query_failures_to_internal() {
    let actor = fixtures::user(Role::User);
    let mut users = MockUserRepository::new();
    users
        .expect_list()
        .times(1)
        .return_once(|| Err(UserPersistenceError::query("syntax error")));

    let service = make_service(users, MockPasswordHasher::new());
    let error = service.list_users(&actor).await.expect_err("internal");
    assert_eq!(error.code(), ErrorCode::InternalError);
}
