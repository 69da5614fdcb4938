//! In-memory backend with artificial latency
//!
//! Used for local development and tests before (or instead of) a real
//! backend. It never stores passwords: login only checks that an enabled
//! account exists for the email.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::error::{ApiError, ApiResult};
use common::models::{
    AuditLog, ChangePasswordRequest, ContactSupportRequest, FeedbackRequest,
    ForgotPasswordRequest, KnownRole, Language, LoginRequest, LoginResponse,
    MarkAllReadResponse, NewUser, NotificationList, NotificationMessage, NotificationPreferences,
    NotificationQuery, NotificationStatus, Page, PageRequest, RegisterRequest,
    ResetPasswordRequest, Role, StatusMessage, UpdateUser, User, UserQuery, UserStatus,
    join_roles,
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{AccountRepository, AuditLogRepository, NotificationRepository, UserRepository};

/// 2024-01-15T09:00:00Z, the first seeded account's creation time
const SEED_EPOCH: i64 = 1_705_309_200;

const SEED_NAMES: [(&str, &str, &str); 25] = [
    ("Admin", "User", "System Administrator"),
    ("Alice", "Johnson", "Engineering Manager"),
    ("Bob", "Smith", "Software Engineer"),
    ("Carol", "Williams", "Content Editor"),
    ("David", "Brown", "Support Specialist"),
    ("Eve", "Davis", "Compliance Auditor"),
    ("Frank", "Miller", "Product Manager"),
    ("Grace", "Wilson", "QA Engineer"),
    ("Henry", "Moore", "Technical Writer"),
    ("Ivy", "Taylor", "Data Analyst"),
    ("Jack", "Anderson", "DevOps Engineer"),
    ("Karen", "Thomas", "HR Coordinator"),
    ("Leo", "Jackson", "Sales Representative"),
    ("Mia", "White", "UX Designer"),
    ("Noah", "Harris", "Security Analyst"),
    ("Olivia", "Martin", "Marketing Lead"),
    ("Paul", "Thompson", "Contractor"),
    ("Quinn", "Garcia", "Customer Success"),
    ("Rita", "Martinez", "Finance Officer"),
    ("Sam", "Robinson", "Intern"),
    ("Tina", "Clark", "Office Manager"),
    ("Uma", "Rodriguez", "Site Reliability Engineer"),
    ("Victor", "Lewis", "Legal Counsel"),
    ("Wendy", "Lee", "Recruiter"),
    ("Xavier", "Walker", "Guest Lecturer"),
];

fn seed_time(offset_hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(SEED_EPOCH + offset_hours * 3600, 0).unwrap_or_default()
}

fn seed_roles(index: usize) -> Vec<Role> {
    if index == 0 {
        return vec![KnownRole::Admin.into(), KnownRole::User.into()];
    }
    let primary = KnownRole::ALL[index % KnownRole::ALL.len()];
    if primary == KnownRole::User {
        vec![KnownRole::User.into()]
    } else {
        vec![KnownRole::User.into(), primary.into()]
    }
}

fn seed_users() -> Vec<User> {
    SEED_NAMES
        .iter()
        .enumerate()
        .map(|(i, (first, last, title))| {
            let created = seed_time(i as i64 * 24);
            User {
                id: format!("user-{:03}", i + 1),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}@example.com", first.to_lowercase()),
                password: None,
                roles: join_roles(&seed_roles(i)),
                job_title: Some(title.to_string()),
                created_date: created,
                updated_date: created,
                last_login_date: (i % 3 != 2).then(|| seed_time(24 * 30 + i as i64)),
                account_non_expired: true,
                account_non_locked: i % 7 != 6,
                credentials_non_expired: true,
                enabled: i % 5 != 4,
            }
        })
        .collect()
}

fn seed_audit_logs() -> Vec<AuditLog> {
    let entries = [
        ("admin@example.com", "LOGIN_SUCCESS", "Signed in from 10.0.0.12", "Session"),
        ("admin@example.com", "USER_CREATE", "Created user bob@example.com", "User"),
        ("alice@example.com", "USER_UPDATE", "Updated roles for carol@example.com", "User"),
        ("unknown@example.com", "LOGIN_FAILED", "Invalid credentials", "Session"),
        ("admin@example.com", "USER_DELETE", "Deleted user temp@example.com", "User"),
        ("carol@example.com", "PROFILE_UPDATE", "Changed job title", "User"),
        ("alice@example.com", "LOGOUT", "Signed out", "Session"),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, (user, action, details, entity))| AuditLog {
            id: format!("log-{:03}", i + 1),
            timestamp: seed_time(24 * 31 + i as i64),
            user: user.to_string(),
            action: action.to_string(),
            details: details.to_string(),
            entity: entity.to_string(),
        })
        .collect()
}

fn seed_notifications() -> Vec<NotificationMessage> {
    let entries = [
        ("New user registered", "bob@example.com created an account.", false),
        ("Role updated", "Your roles were changed by an administrator.", false),
        ("System maintenance", "Scheduled maintenance on Sunday 02:00 UTC.", true),
        ("Password changed", "Your password was changed successfully.", true),
        ("New login", "A new login to your account was detected.", false),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, (title, message, read))| NotificationMessage {
            id: format!("notif-{:03}", i + 1),
            title: title.to_string(),
            message: message.to_string(),
            timestamp: seed_time(24 * 32 + i as i64),
            read: *read,
        })
        .collect()
}

fn matches_search(user: &User, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        user.first_name.as_str(),
        user.last_name.as_str(),
        user.email.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
        || user.full_name().to_lowercase().contains(&term)
}

fn email_taken() -> ApiError {
    ApiError::Status {
        status: 409,
        message: "A user with this email already exists.".to_string(),
        details: None,
    }
}

/// In-memory backend
pub struct MockBackend {
    delay: Duration,
    users: RwLock<Vec<User>>,
    audit_logs: RwLock<Vec<AuditLog>>,
    notifications: RwLock<Vec<NotificationMessage>>,
    preferences: RwLock<NotificationPreferences>,
    language: RwLock<Language>,
    current_user_id: RwLock<Option<String>>,
    feedback: RwLock<Vec<FeedbackRequest>>,
    support_requests: RwLock<Vec<ContactSupportRequest>>,
}

impl MockBackend {
    /// Empty backend
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            users: RwLock::new(Vec::new()),
            audit_logs: RwLock::new(Vec::new()),
            notifications: RwLock::new(Vec::new()),
            preferences: RwLock::new(NotificationPreferences::default()),
            language: RwLock::new(Language::En),
            current_user_id: RwLock::new(None),
            feedback: RwLock::new(Vec::new()),
            support_requests: RwLock::new(Vec::new()),
        }
    }

    /// Backend preloaded with sample users, audit logs and notifications;
    /// the administrator account is signed in
    pub fn seeded(delay: Duration) -> Self {
        let users = seed_users();
        let current = users.first().map(|u| u.id.clone());
        let backend = Self::new(delay);
        Self {
            users: RwLock::new(users),
            audit_logs: RwLock::new(seed_audit_logs()),
            notifications: RwLock::new(seed_notifications()),
            current_user_id: RwLock::new(current),
            ..backend
        }
    }

    /// Replace the user collection
    pub fn with_users(self, users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
            ..self
        }
    }

    /// Replace the notification collection
    pub fn with_notifications(self, notifications: Vec<NotificationMessage>) -> Self {
        Self {
            notifications: RwLock::new(notifications),
            ..self
        }
    }

    pub async fn notification_preferences(&self) -> NotificationPreferences {
        *self.preferences.read().await
    }

    pub async fn language(&self) -> Language {
        *self.language.read().await
    }

    pub async fn feedback_count(&self) -> usize {
        self.feedback.read().await.len()
    }

    pub async fn support_request_count(&self) -> usize {
        self.support_requests.read().await.len()
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    async fn actor(&self) -> String {
        let current = self.current_user_id.read().await.clone();
        let users = self.users.read().await;
        current
            .and_then(|id| users.iter().find(|u| u.id == id).map(|u| u.email.clone()))
            .unwrap_or_else(|| "system".to_string())
    }

    async fn record(&self, user: String, action: &str, details: String, entity: &str) {
        let mut logs = self.audit_logs.write().await;
        let log = AuditLog {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            user,
            action: action.to_string(),
            details,
            entity: entity.to_string(),
        };
        // Newest first, like the backend
        logs.insert(0, log);
    }
}

#[async_trait]
impl UserRepository for MockBackend {
    async fn list_users(&self, query: &UserQuery) -> ApiResult<Page<User>> {
        self.simulate_latency().await;
        let users = self.users.read().await;

        let role = query
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(Role::parse);
        let search = query.search.as_deref().filter(|s| !s.is_empty());

        let filtered: Vec<User> = users
            .iter()
            .filter(|u| search.is_none_or(|term| matches_search(u, term)))
            .filter(|u| role.as_ref().is_none_or(|r| u.has_role(r)))
            .cloned()
            .collect();

        Ok(Page::slice(&filtered, query.page_request()))
    }

    async fn get_user(&self, id: &str) -> ApiResult<Option<User>> {
        self.simulate_latency().await;
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        self.simulate_latency().await;
        let actor = self.actor().await;

        let created = {
            let mut users = self.users.write().await;
            if users
                .iter()
                .any(|u| u.email.eq_ignore_ascii_case(&user.email))
            {
                return Err(email_taken());
            }

            let now = Utc::now();
            let created = User {
                id: Uuid::new_v4().to_string(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                password: None,
                roles: join_roles(&user.roles),
                job_title: user.job_title.clone(),
                created_date: now,
                updated_date: now,
                last_login_date: None,
                account_non_expired: user.account_non_expired,
                account_non_locked: user.account_non_locked,
                credentials_non_expired: user.credentials_non_expired,
                enabled: user.enabled,
            };
            users.push(created.clone());
            created
        };

        self.record(
            actor,
            "USER_CREATE",
            format!("Created user {}", created.email),
            "User",
        )
        .await;
        info!("Mock backend created user {}", created.id);
        Ok(created)
    }

    async fn update_user(&self, id: &str, update: &UpdateUser) -> ApiResult<User> {
        self.simulate_latency().await;
        let actor = self.actor().await;

        let updated = {
            let mut users = self.users.write().await;
            if let Some(email) = &update.email {
                if users
                    .iter()
                    .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
                {
                    return Err(email_taken());
                }
            }
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| ApiError::NotFound(format!("User {}", id)))?;

            if let Some(first_name) = &update.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &update.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(email) = &update.email {
                user.email = email.clone();
            }
            if let Some(job_title) = &update.job_title {
                user.job_title = Some(job_title.clone()).filter(|t| !t.is_empty());
            }
            if let Some(roles) = &update.roles {
                user.roles = join_roles(roles);
            }
            if let Some(flag) = update.account_non_expired {
                user.account_non_expired = flag;
            }
            if let Some(flag) = update.account_non_locked {
                user.account_non_locked = flag;
            }
            if let Some(flag) = update.credentials_non_expired {
                user.credentials_non_expired = flag;
            }
            if let Some(flag) = update.enabled {
                user.enabled = flag;
            }
            user.updated_date = Utc::now();
            user.clone()
        };

        self.record(
            actor,
            "USER_UPDATE",
            format!("Updated user {}", updated.email),
            "User",
        )
        .await;
        Ok(updated)
    }

    async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.simulate_latency().await;
        let actor = self.actor().await;

        let removed = {
            let mut users = self.users.write().await;
            let index = users
                .iter()
                .position(|u| u.id == id)
                .ok_or_else(|| ApiError::NotFound(format!("User {}", id)))?;
            users.remove(index)
        };

        self.record(
            actor,
            "USER_DELETE",
            format!("Deleted user {}", removed.email),
            "User",
        )
        .await;
        Ok(())
    }

    async fn unique_roles(&self) -> ApiResult<Vec<String>> {
        self.simulate_latency().await;
        let users = self.users.read().await;
        let roles: BTreeSet<String> = users
            .iter()
            .flat_map(User::role_list)
            .map(|r| r.as_str().to_string())
            .collect();
        Ok(roles.into_iter().collect())
    }

    async fn current_user(&self) -> ApiResult<Option<User>> {
        self.simulate_latency().await;
        let Some(id) = self.current_user_id.read().await.clone() else {
            return Ok(None);
        };
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        if self.current_user_id.read().await.is_none() {
            return Err(ApiError::Status {
                status: 401,
                message: "Unauthorized".to_string(),
                details: None,
            });
        }
        // Passwords are never stored here; only the request shape is checked.
        if request.current_password.is_empty() {
            return Err(ApiError::Status {
                status: 400,
                message: "Current password is incorrect.".to_string(),
                details: None,
            });
        }
        let actor = self.actor().await;
        self.record(actor, "PASSWORD_UPDATE", "Changed password".to_string(), "User")
            .await;
        Ok(StatusMessage::ok("Password changed successfully."))
    }
}

#[async_trait]
impl AuditLogRepository for MockBackend {
    async fn list_audit_logs(&self, page: PageRequest) -> ApiResult<Page<AuditLog>> {
        self.simulate_latency().await;
        let logs = self.audit_logs.read().await;
        Ok(Page::slice(logs.as_slice(), page))
    }
}

#[async_trait]
impl NotificationRepository for MockBackend {
    async fn list_notifications(&self, query: &NotificationQuery) -> ApiResult<NotificationList> {
        self.simulate_latency().await;
        let notifications = self.notifications.read().await;

        let unread_count = notifications.iter().filter(|n| !n.read).count() as u64;
        let filtered: Vec<NotificationMessage> = notifications
            .iter()
            .filter(|n| query.status != Some(NotificationStatus::Unread) || !n.read)
            .cloned()
            .collect();
        let total = filtered.len() as u64;

        let notifications = if query.page.is_some() || query.limit.is_some() {
            Page::slice(&filtered, PageRequest::from_optional(query.page, query.limit)).items
        } else {
            filtered
        };

        Ok(NotificationList {
            notifications,
            total,
            unread_count,
        })
    }

    async fn mark_notification_read(&self, id: &str) -> ApiResult<Option<NotificationMessage>> {
        self.simulate_latency().await;
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("Notification {}", id)))?;
        notification.read = true;
        Ok(Some(notification.clone()))
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<MarkAllReadResponse> {
        self.simulate_latency().await;
        let mut notifications = self.notifications.write().await;
        let marked = notifications.iter().filter(|n| !n.read).count();
        notifications.iter_mut().for_each(|n| n.read = true);
        Ok(MarkAllReadResponse {
            success: true,
            message: format!("{} notifications marked as read.", marked),
            unread_count_after: 0,
        })
    }

    async fn clear_notifications(&self) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        self.notifications.write().await.clear();
        Ok(StatusMessage::ok("All notifications cleared."))
    }
}

#[async_trait]
impl AccountRepository for MockBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.simulate_latency().await;
        let user = {
            let mut users = self.users.write().await;
            users
                .iter_mut()
                .find(|u| u.email.eq_ignore_ascii_case(&request.email))
                .filter(|u| u.status() == UserStatus::Active)
                .map(|u| {
                    u.last_login_date = Some(Utc::now());
                    u.clone()
                })
        };

        let Some(user) = user else {
            self.record(
                request.email.clone(),
                "LOGIN_FAILED",
                "Invalid credentials".to_string(),
                "Session",
            )
            .await;
            return Err(ApiError::Status {
                status: 401,
                message: "Invalid email or password.".to_string(),
                details: None,
            });
        };

        *self.current_user_id.write().await = Some(user.id.clone());
        self.record(
            user.email.clone(),
            "LOGIN_SUCCESS",
            "Signed in".to_string(),
            "Session",
        )
        .await;

        Ok(LoginResponse {
            token: format!("mock-{}", Uuid::new_v4()),
            user: Some(user),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<StatusMessage> {
        let new_user = NewUser {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            password: None,
            job_title: None,
            roles: vec![KnownRole::User.into()],
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            enabled: true,
        };
        self.create_user(&new_user).await?;
        Ok(StatusMessage::ok("Registration successful."))
    }

    async fn forgot_password(&self, _request: &ForgotPasswordRequest) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        Ok(StatusMessage::ok(
            "If an account exists for this email, a reset link has been sent.",
        ))
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        if !request.token.starts_with("reset-") {
            return Err(ApiError::Status {
                status: 400,
                message: "Invalid or expired reset token.".to_string(),
                details: None,
            });
        }
        Ok(StatusMessage::ok("Password has been reset."))
    }

    async fn update_notification_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        *self.preferences.write().await = *preferences;
        Ok(StatusMessage::ok(
            "Your notification settings have been updated.",
        ))
    }

    async fn update_language(&self, language: Language) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        *self.language.write().await = language;
        Ok(StatusMessage::ok("Language preference saved."))
    }

    async fn contact_support(&self, request: ContactSupportRequest) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        self.support_requests.write().await.push(request);
        Ok(StatusMessage::ok(
            "Your message has been sent. We will get back to you shortly.",
        ))
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<StatusMessage> {
        self.simulate_latency().await;
        self.feedback.write().await.push(request.clone());
        Ok(StatusMessage::ok("Thank you for your feedback!"))
    }
}
