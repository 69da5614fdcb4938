//! Notification inbox

use std::sync::Arc;

use common::models::{
    MarkAllReadResponse, NotificationList, NotificationMessage, NotificationQuery, StatusMessage,
};
use tracing::error;

use crate::repositories::NotificationRepository;

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Notifications with counters; empty with zero unread on failure
    pub async fn get_notifications(&self, query: &NotificationQuery) -> NotificationList {
        match self.repo.list_notifications(query).await {
            Ok(list) => list,
            Err(e) => {
                error!("Failed to fetch notifications: {}", e);
                NotificationList::default()
            }
        }
    }

    pub async fn mark_as_read(&self, id: &str) -> Option<NotificationMessage> {
        match self.repo.mark_notification_read(id).await {
            Ok(notification) => notification,
            Err(e) => {
                error!("Failed to mark notification {} as read: {}", id, e);
                None
            }
        }
    }

    pub async fn mark_all_as_read(&self) -> Option<MarkAllReadResponse> {
        match self.repo.mark_all_notifications_read().await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Failed to mark all notifications as read: {}", e);
                None
            }
        }
    }

    pub async fn clear_all(&self) -> Option<StatusMessage> {
        match self.repo.clear_notifications().await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Failed to clear all notifications: {}", e);
                None
            }
        }
    }
}
