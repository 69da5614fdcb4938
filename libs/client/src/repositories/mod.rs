//! Repository seam between the domain services and a backend
//!
//! The same services run against the REST backend ([`HttpBackend`]) or the
//! in-memory mock ([`MockBackend`]) without code changes.

use async_trait::async_trait;
use common::error::ApiResult;
use common::models::{
    AuditLog, ChangePasswordRequest, ContactSupportRequest, FeedbackRequest,
    ForgotPasswordRequest, Language, LoginRequest, LoginResponse, MarkAllReadResponse, NewUser,
    NotificationList, NotificationMessage, NotificationPreferences, NotificationQuery, Page,
    PageRequest, RegisterRequest, ResetPasswordRequest, StatusMessage, UpdateUser, User,
    UserQuery,
};

pub mod http;
pub mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

/// User accounts and roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self, query: &UserQuery) -> ApiResult<Page<User>>;
    async fn get_user(&self, id: &str) -> ApiResult<Option<User>>;
    async fn create_user(&self, user: &NewUser) -> ApiResult<User>;
    async fn update_user(&self, id: &str, update: &UpdateUser) -> ApiResult<User>;
    async fn delete_user(&self, id: &str) -> ApiResult<()>;
    /// Every distinct role name in use
    async fn unique_roles(&self) -> ApiResult<Vec<String>>;
    /// The user the current token belongs to
    async fn current_user(&self) -> ApiResult<Option<User>>;
    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<StatusMessage>;
}

/// Append-only audit trail
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn list_audit_logs(&self, page: PageRequest) -> ApiResult<Page<AuditLog>>;
}

/// Per-user notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list_notifications(&self, query: &NotificationQuery) -> ApiResult<NotificationList>;
    async fn mark_notification_read(&self, id: &str) -> ApiResult<Option<NotificationMessage>>;
    async fn mark_all_notifications_read(&self) -> ApiResult<MarkAllReadResponse>;
    async fn clear_notifications(&self) -> ApiResult<StatusMessage>;
}

/// Authentication, settings and support submissions
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;
    async fn register(&self, request: &RegisterRequest) -> ApiResult<StatusMessage>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<StatusMessage>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<StatusMessage>;
    async fn update_notification_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> ApiResult<StatusMessage>;
    async fn update_language(&self, language: Language) -> ApiResult<StatusMessage>;
    async fn contact_support(&self, request: ContactSupportRequest) -> ApiResult<StatusMessage>;
    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<StatusMessage>;
}

/// A backend implementing every repository
pub trait Backend:
    UserRepository + AuditLogRepository + NotificationRepository + AccountRepository
{
}

impl<T> Backend for T where
    T: UserRepository + AuditLogRepository + NotificationRepository + AccountRepository
{
}
