//! Notification model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Read-state filter for the notification listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    All,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::All => "all",
        }
    }
}

/// Query parameters for the notification listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotificationQuery {
    pub status: Option<NotificationStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl NotificationQuery {
    /// Query-string pairs; only parameters that are set are sent
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Notification listing with counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<NotificationMessage>,
    pub total: u64,
    pub unread_count: u64,
}

/// Response for mark-all-read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub success: bool,
    pub message: String,
    pub unread_count_after: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_sends_nothing() {
        assert!(NotificationQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn query_sends_status_and_paging() {
        let query = NotificationQuery {
            status: Some(NotificationStatus::Unread),
            page: Some(1),
            limit: Some(20),
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("status", "unread".to_string()),
                ("page", "1".to_string()),
                ("limit", "20".to_string())
            ]
        );
    }
}
