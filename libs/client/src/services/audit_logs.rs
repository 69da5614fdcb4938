//! Audit log listing

use std::sync::Arc;

use common::models::{AuditLog, Page, PageRequest};
use tracing::error;

use crate::repositories::AuditLogRepository;

#[derive(Clone)]
pub struct AuditLogService {
    repo: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    pub fn new(repo: Arc<dyn AuditLogRepository>) -> Self {
        Self { repo }
    }

    /// One page of audit logs; empty on failure
    pub async fn get_audit_logs(&self, page: u32, limit: u32) -> Page<AuditLog> {
        match self.repo.list_audit_logs(PageRequest::new(page, limit)).await {
            Ok(logs) => logs,
            Err(e) => {
                error!("Failed to fetch audit logs: {}", e);
                Page::empty()
            }
        }
    }
}
