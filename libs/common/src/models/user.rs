//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageRequest;
use super::role::Role;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Only ever populated by a careless backend; stripped before use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Comma-separated role names
    pub roles: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    #[serde(default)]
    pub last_login_date: Option<DateTime<Utc>>,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
}

/// Derived account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Disabled,
}

impl User {
    /// Active iff enabled, not locked and not expired
    pub fn status(&self) -> UserStatus {
        if self.enabled && self.account_non_locked && self.account_non_expired {
            UserStatus::Active
        } else {
            UserStatus::Disabled
        }
    }

    pub fn role_list(&self) -> Vec<Role> {
        Role::parse_list(&self.roles)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Drop the password field before handing the user to a caller
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    /// Whether the user has the given role
    pub fn has_role(&self, role: &Role) -> bool {
        self.role_list().iter().any(|r| r == role)
    }
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(with = "crate::models::role::wire")]
    pub roles: Vec<Role>,
    #[serde(default = "default_true")]
    pub account_non_expired: bool,
    #[serde(default = "default_true")]
    pub account_non_locked: bool,
    #[serde(default = "default_true")]
    pub credentials_non_expired: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// User update payload; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(
        default,
        with = "crate::models::role::wire::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub roles: Option<Vec<Role>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_non_expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_non_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_non_expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Query parameters for the user listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Matches name or email
    pub search: Option<String>,
    /// Exact role name filter
    pub role: Option<String>,
}

impl UserQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_optional(self.page, self.limit)
    }

    /// Query-string pairs; empty search and role values are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.page_request().query_pairs();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(role) = self.role.as_deref().filter(|r| !r.is_empty()) {
            pairs.push(("role", role.to_string()));
        }
        pairs
    }
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Response for user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request for a password reset email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request for completing a password reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request for changing the authenticated user's password
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
