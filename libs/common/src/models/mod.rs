//! Data model shared by the client and the console
//!
//! All entities are owned by the external backend; these are transient,
//! request-scoped copies.

pub mod audit_log;
pub mod notification;
pub mod pagination;
pub mod role;
pub mod settings;
pub mod support;
pub mod user;

// Re-export for convenience
pub use audit_log::{ActionKind, AuditLog};
pub use notification::{
    MarkAllReadResponse, NotificationList, NotificationMessage, NotificationQuery,
    NotificationStatus,
};
pub use pagination::{Page, PageRequest};
pub use role::{KnownRole, Role, join_roles};
pub use settings::{Language, LanguagePreference, NotificationPreferences};
pub use support::{
    Attachment, ContactSupportRequest, FeedbackRequest, FeedbackType, InquiryType, StatusMessage,
};
pub use user::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, NewUser,
    RegisterRequest, ResetPasswordRequest, UpdateUser, User, UserQuery, UserStatus,
};
