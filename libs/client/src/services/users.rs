//! User management

use std::sync::Arc;

use common::error::ApiResult;
use common::models::pagination::MAX_PAGE_SIZE;
use common::models::{
    ChangePasswordRequest, NewUser, Page, StatusMessage, UpdateUser, User, UserQuery, UserStatus,
};
use common::validation;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::repositories::UserRepository;

/// Counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total: u64,
    pub active: u64,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// One page of users with passwords stripped; empty on failure
    pub async fn get_users(&self, query: &UserQuery) -> Page<User> {
        match self.repo.list_users(query).await {
            Ok(page) => page.map(User::without_password),
            Err(e) => {
                error!("Failed to fetch users: {}", e);
                Page::empty()
            }
        }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Option<User> {
        match self.repo.get_user(id).await {
            Ok(user) => user.map(User::without_password),
            Err(e) => {
                error!("Failed to get user {}: {}", id, e);
                None
            }
        }
    }

    /// The signed-in user, or `None` when the token is missing or rejected
    pub async fn get_current_user(&self) -> Option<User> {
        match self.repo.current_user().await {
            Ok(user) => user.map(User::without_password),
            Err(e) => {
                debug!("No current user: {}", e);
                None
            }
        }
    }

    /// Distinct role names, sorted; empty on failure
    pub async fn get_unique_roles(&self) -> Vec<String> {
        match self.repo.unique_roles().await {
            Ok(mut roles) => {
                roles.sort();
                roles
            }
            Err(e) => {
                error!("Failed to get unique roles: {}", e);
                Vec::new()
            }
        }
    }

    /// Walk every page and count active accounts
    pub async fn summarize(&self) -> UserSummary {
        let mut summary = UserSummary::default();
        let mut page = 1;
        loop {
            let query = UserQuery {
                page: Some(page),
                limit: Some(MAX_PAGE_SIZE),
                ..Default::default()
            };
            let result = match self.repo.list_users(&query).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Failed to summarize users: {}", e);
                    return summary;
                }
            };

            summary.total = result.total;
            summary.active += result
                .items
                .iter()
                .filter(|u| u.status() == UserStatus::Active)
                .count() as u64;

            if result.items.is_empty() || page >= result.total_pages {
                return summary;
            }
            page += 1;
        }
    }

    pub async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        validation::validate_new_user(user)?;
        let created = self.repo.create_user(user).await.map_err(|e| {
            error!("Failed to create user {}: {}", user.email, e);
            e
        })?;
        info!("Created user {}", created.id);
        Ok(created.without_password())
    }

    pub async fn update_user(&self, id: &str, update: &UpdateUser) -> ApiResult<User> {
        validation::validate_update_user(update)?;
        let updated = self.repo.update_user(id, update).await.map_err(|e| {
            error!("Failed to update user {}: {}", id, e);
            e
        })?;
        Ok(updated.without_password())
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.repo.delete_user(id).await.map_err(|e| {
            error!("Failed to delete user {}: {}", id, e);
            e
        })?;
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Change the signed-in user's password
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<StatusMessage> {
        validation::validate_change_password(request)?;
        self.repo.change_password(request).await.map_err(|e| {
            error!("Failed to change password: {}", e);
            e
        })
    }
}
