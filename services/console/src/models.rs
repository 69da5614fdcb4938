//! Page data returned by the console

use client::services::UserSummary;
use common::models::{ActionKind, AuditLog, User};
use serde::{Deserialize, Serialize};

/// Number of audit log entries shown on the dashboard
pub const RECENT_AUDIT_LOGS: u32 = 5;

/// Landing page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingView {
    pub authenticated: bool,
    pub next: &'static str,
}

/// Dashboard counters and the latest activity
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub total_users: u64,
    pub active_users: u64,
    pub unread_notifications: u64,
    pub recent_audit_logs: Vec<AuditLogView>,
}

impl DashboardView {
    pub fn new(
        summary: UserSummary,
        unread_notifications: u64,
        recent_audit_logs: Vec<AuditLog>,
    ) -> Self {
        Self {
            total_users: summary.total,
            active_users: summary.active,
            unread_notifications,
            recent_audit_logs: recent_audit_logs.into_iter().map(AuditLogView::from).collect(),
        }
    }
}

/// Audit entry with its badge classification and display label
#[derive(Debug, Serialize)]
pub struct AuditLogView {
    #[serde(flatten)]
    pub log: AuditLog,
    pub kind: ActionKind,
    pub label: String,
}

impl From<AuditLog> for AuditLogView {
    fn from(log: AuditLog) -> Self {
        Self {
            kind: log.action_kind(),
            label: log.action_label(),
            log,
        }
    }
}

/// Signed-in user's profile page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: User,
    pub full_name: String,
    pub roles: Vec<String>,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            roles: user.role_list().iter().map(|r| r.as_str().to_string()).collect(),
            user,
        }
    }
}

/// Query parameters for the audit log listing
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Roles known to the backend
#[derive(Debug, Serialize)]
pub struct RolesView {
    pub roles: Vec<String>,
}
