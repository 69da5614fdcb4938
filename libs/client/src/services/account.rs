//! Authentication, settings and support

use std::sync::Arc;

use common::error::{ApiError, ApiResult};
use common::models::{
    ContactSupportRequest, FeedbackRequest, ForgotPasswordRequest, Language, LoginRequest,
    LoginResponse, NotificationPreferences, RegisterRequest, ResetPasswordRequest, StatusMessage,
};
use common::validation;
use tracing::{error, info};

use crate::repositories::AccountRepository;
use crate::token::TokenStore;

#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    tokens: Option<Arc<TokenStore>>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo, tokens: None }
    }

    pub fn with_token_store(mut self, tokens: Arc<TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sign in and keep the issued token
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        validation::validate_login(request)?;
        let mut response = self.repo.login(request).await.map_err(|e| {
            error!("Login failed for {}: {}", request.email, e);
            e
        })?;

        if response.token.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        if let Some(tokens) = &self.tokens {
            tokens.set(&response.token);
        }
        response.user = response.user.map(|u| u.without_password());

        info!("Signed in as {}", request.email);
        Ok(response)
    }

    /// Forget the stored token
    pub fn logout(&self) {
        if let Some(tokens) = &self.tokens {
            tokens.clear();
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<StatusMessage> {
        validation::validate_register(request)?;
        self.repo.register(request).await.map_err(|e| {
            error!("Registration failed for {}: {}", request.email, e);
            e
        })
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<StatusMessage> {
        validation::validate_forgot_password(request)?;
        self.repo.forgot_password(request).await.map_err(|e| {
            error!("Password reset request failed: {}", e);
            e
        })
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<StatusMessage> {
        validation::validate_reset_password(request)?;
        self.repo.reset_password(request).await.map_err(|e| {
            error!("Password reset failed: {}", e);
            e
        })
    }

    pub async fn update_notification_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> ApiResult<StatusMessage> {
        self.repo
            .update_notification_preferences(preferences)
            .await
            .map_err(|e| {
                error!("Failed to save notification preferences: {}", e);
                e
            })
    }

    pub async fn update_language(&self, language: Language) -> ApiResult<StatusMessage> {
        if !language.is_available() {
            return Err(ApiError::validation(
                "language",
                format!("Language '{}' is not available yet.", language.code()),
            ));
        }
        self.repo.update_language(language).await.map_err(|e| {
            error!("Failed to save language preference: {}", e);
            e
        })
    }

    pub async fn contact_support(&self, request: ContactSupportRequest) -> ApiResult<StatusMessage> {
        validation::validate_contact_support(&request)?;
        self.repo.contact_support(request).await.map_err(|e| {
            error!("Failed to submit support request: {}", e);
            e
        })
    }

    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<StatusMessage> {
        validation::validate_feedback(request)?;
        self.repo.submit_feedback(request).await.map_err(|e| {
            error!("Failed to submit feedback: {}", e);
            e
        })
    }
}
