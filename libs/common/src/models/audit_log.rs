//! Audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable audit record produced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Actor identifier
    pub user: String,
    /// Action code, e.g. `USER_CREATE` or `LOGIN_FAILED`
    pub action: String,
    pub details: String,
    /// Entity type the action touched
    pub entity: String,
}

/// Coarse classification of an action code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Change,
    Destructive,
    Session,
    Other,
}

impl AuditLog {
    pub fn action_kind(&self) -> ActionKind {
        let action = self.action.as_str();
        if ["CREATE", "SUCCESS", "UPDATE"].iter().any(|k| action.contains(k)) {
            ActionKind::Change
        } else if ["DELETE", "FAILED"].iter().any(|k| action.contains(k)) {
            ActionKind::Destructive
        } else if ["LOGIN", "LOGOUT", "PROFILE"].iter().any(|k| action.contains(k)) {
            ActionKind::Session
        } else {
            ActionKind::Other
        }
    }

    /// Action code with its first underscore shown as a space
    pub fn action_label(&self) -> String {
        self.action.replacen('_', " ", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(action: &str) -> AuditLog {
        AuditLog {
            id: "1".to_string(),
            timestamp: Utc::now(),
            user: "admin@example.com".to_string(),
            action: action.to_string(),
            details: String::new(),
            entity: "User".to_string(),
        }
    }

    #[test]
    fn classifies_action_codes() {
        assert_eq!(log("USER_CREATE").action_kind(), ActionKind::Change);
        assert_eq!(log("LOGIN_SUCCESS").action_kind(), ActionKind::Change);
        assert_eq!(log("LOGIN_FAILED").action_kind(), ActionKind::Destructive);
        assert_eq!(log("USER_LOGOUT").action_kind(), ActionKind::Session);
        assert_eq!(log("EXPORT").action_kind(), ActionKind::Other);
    }

    #[test]
    fn label_replaces_first_underscore_only() {
        assert_eq!(log("ROLE_ASSIGN_BULK").action_label(), "ROLE ASSIGN_BULK");
    }
}
