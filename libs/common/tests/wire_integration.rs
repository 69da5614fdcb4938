//! Integration tests for the shared data model
//!
//! These tests feed payloads shaped like the backend's responses and the
//! console's form submissions through the models and validators.

use common::error::ApiError;
use common::models::{
    ActionKind, AuditLog, KnownRole, NewUser, Page, Role, User, UserStatus, join_roles,
};
use common::validation;

const BACKEND_USER: &str = r#"{
    "id": "42",
    "firstName": "Grace",
    "lastName": "Hopper",
    "email": "grace@example.com",
    "password": "should-never-leak",
    "roles": "ROLE_ADMIN, ROLE_AUDITOR,,ROLE_COMPILER_WRANGLER",
    "jobTitle": "Rear Admiral",
    "createdDate": "2024-02-01T08:30:00Z",
    "updatedDate": "2024-02-03T10:00:00Z",
    "lastLoginDate": null,
    "accountNonExpired": true,
    "accountNonLocked": false,
    "credentialsNonExpired": true,
    "enabled": true
}"#;

#[test]
fn backend_user_is_interpreted() -> Result<(), Box<dyn std::error::Error>> {
    let user: User = serde_json::from_str(BACKEND_USER)?;

    assert_eq!(user.status(), UserStatus::Disabled, "locked accounts are disabled");
    assert_eq!(user.full_name(), "Grace Hopper");
    assert!(user.last_login_date.is_none());

    let roles = user.role_list();
    assert_eq!(roles.len(), 3);
    assert_eq!(roles[0], Role::Known(KnownRole::Admin));
    assert!(!roles[2].is_trusted());
    assert_eq!(roles[2].as_str(), "ROLE_COMPILER_WRANGLER");

    let stripped = serde_json::to_value(user.without_password())?;
    assert!(stripped.get("password").is_none());
    Ok(())
}

#[test]
fn user_form_round_trips_roles_as_joined_string() -> Result<(), Box<dyn std::error::Error>> {
    let form: NewUser = serde_json::from_str(
        r#"{
            "firstName": "Linus",
            "lastName": "Torvalds",
            "email": "linus@example.com",
            "roles": ["ROLE_USER", "ROLE_MAINTAINER"]
        }"#,
    )?;

    validation::validate_new_user(&form)?;
    assert!(form.enabled && form.account_non_locked);

    let wire = serde_json::to_value(&form)?;
    assert_eq!(wire["roles"], "ROLE_USER,ROLE_MAINTAINER");
    assert_eq!(join_roles(&form.roles), "ROLE_USER,ROLE_MAINTAINER");
    Ok(())
}

#[test]
fn user_form_errors_name_the_field() {
    let form: NewUser = serde_json::from_str(
        r#"{
            "firstName": "L",
            "lastName": "Torvalds",
            "email": "linus@example.com",
            "roles": "ROLE_USER"
        }"#,
    )
    .unwrap();

    match validation::validate_new_user(&form) {
        Err(ApiError::Validation { field, .. }) => assert_eq!(field, "firstName"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn audit_listing_page_is_classified() -> Result<(), Box<dyn std::error::Error>> {
    let page: Page<AuditLog> = serde_json::from_str(
        r#"{
            "items": [
                {"id": "1", "timestamp": "2024-03-01T12:00:00Z", "user": "admin@example.com",
                 "action": "USER_DELETE", "details": "Deleted bob", "entity": "User"},
                {"id": "2", "timestamp": "2024-03-01T12:05:00Z", "user": "bob@example.com",
                 "action": "LOGIN_SUCCESS", "details": "Signed in", "entity": "Session"}
            ],
            "total": 2,
            "currentPage": 1,
            "totalPages": 1
        }"#,
    )?;

    assert_eq!(page.items[0].action_kind(), ActionKind::Destructive);
    assert_eq!(page.items[0].action_label(), "USER DELETE");
    assert_eq!(page.items[1].action_kind(), ActionKind::Change);
    Ok(())
}
