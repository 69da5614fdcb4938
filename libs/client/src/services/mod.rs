//! Domain functions used by the console pages
//!
//! Read paths degrade to empty results so a backend outage never breaks a
//! listing page; write paths propagate errors so the submitting form can show
//! them and stay populated for a retry.

use std::sync::Arc;

use crate::repositories::Backend;
use crate::token::TokenStore;

pub mod account;
pub mod audit_logs;
pub mod notifications;
pub mod users;

pub use account::AccountService;
pub use audit_logs::AuditLogService;
pub use notifications::NotificationService;
pub use users::{UserService, UserSummary};

/// Every domain service, wired to one backend
#[derive(Clone)]
pub struct Hub {
    pub users: UserService,
    pub audit_logs: AuditLogService,
    pub notifications: NotificationService,
    pub account: AccountService,
}

impl Hub {
    pub fn new<B: Backend + 'static>(backend: Arc<B>) -> Self {
        Self {
            users: UserService::new(backend.clone()),
            audit_logs: AuditLogService::new(backend.clone()),
            notifications: NotificationService::new(backend.clone()),
            account: AccountService::new(backend),
        }
    }

    /// Persist tokens issued at login and clear them at logout
    pub fn with_token_store(mut self, tokens: Arc<TokenStore>) -> Self {
        self.account = self.account.with_token_store(tokens);
        self
    }
}
