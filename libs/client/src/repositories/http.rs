//! Repositories backed by the REST backend

use async_trait::async_trait;
use common::error::{ApiError, ApiResult};
use common::models::{
    AuditLog, ChangePasswordRequest, ContactSupportRequest, FeedbackRequest,
    ForgotPasswordRequest, Language, LanguagePreference, LoginRequest, LoginResponse,
    MarkAllReadResponse, NewUser, NotificationList, NotificationMessage, NotificationPreferences,
    NotificationQuery, Page, PageRequest, RegisterRequest, ResetPasswordRequest, StatusMessage,
    UpdateUser, User, UserQuery,
};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use super::{AccountRepository, AuditLogRepository, NotificationRepository, UserRepository};
use crate::api_client::{ApiClient, RequestBody, path_segment};

/// Response for the user listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsersResponse {
    users: Vec<User>,
    total: u64,
    current_page: u32,
    total_pages: u32,
}

/// Response wrapping a single user
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct RolesResponse {
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditLogsResponse {
    logs: Vec<AuditLog>,
    total: u64,
    current_page: u32,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct NotificationEnvelope {
    #[serde(default)]
    notification: Option<NotificationMessage>,
}

/// Read an acknowledgement leniently: the backend may answer 204, or with
/// any JSON object that may carry `success` and `message`
fn acknowledgement(value: Option<Value>, default_message: &str) -> StatusMessage {
    let value = value.unwrap_or(Value::Null);
    StatusMessage {
        success: value.get("success").and_then(Value::as_bool).unwrap_or(true),
        message: value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(default_message)
            .to_string(),
    }
}

/// Backend reached over HTTP
#[derive(Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn post_ack<T: serde::Serialize + Sync>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &T,
        default_message: &str,
    ) -> ApiResult<StatusMessage> {
        let value: Option<Value> = self
            .client
            .request(method, endpoint, Some(RequestBody::json(payload)?))
            .await?;
        Ok(acknowledgement(value, default_message))
    }
}

#[async_trait]
impl UserRepository for HttpBackend {
    async fn list_users(&self, query: &UserQuery) -> ApiResult<Page<User>> {
        let response: UsersResponse = self
            .client
            .get_with_query("/users", &query.query_pairs())
            .await?
            .ok_or(ApiError::EmptyResponse)?;

        Ok(Page {
            items: response.users,
            total: response.total,
            current_page: response.current_page,
            total_pages: response.total_pages,
        })
    }

    async fn get_user(&self, id: &str) -> ApiResult<Option<User>> {
        let envelope: Option<UserEnvelope> = self
            .client
            .request(Method::GET, &format!("/users/{}", path_segment(id)?), None)
            .await?;
        Ok(envelope.and_then(|e| e.user))
    }

    async fn create_user(&self, user: &NewUser) -> ApiResult<User> {
        let envelope: UserEnvelope = self
            .client
            .request_json(Method::POST, "/users", Some(RequestBody::json(user)?))
            .await?;
        envelope.user.ok_or(ApiError::EmptyResponse)
    }

    async fn update_user(&self, id: &str, update: &UpdateUser) -> ApiResult<User> {
        let envelope: UserEnvelope = self
            .client
            .request_json(
                Method::PUT,
                &format!("/users/{}", path_segment(id)?),
                Some(RequestBody::json(update)?),
            )
            .await?;
        envelope.user.ok_or(ApiError::EmptyResponse)
    }

    async fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.client
            .request::<Value>(Method::DELETE, &format!("/users/{}", path_segment(id)?), None)
            .await?;
        Ok(())
    }

    async fn unique_roles(&self) -> ApiResult<Vec<String>> {
        let response: RolesResponse = self
            .client
            .request_json(Method::GET, "/roles/unique", None)
            .await?;
        Ok(response.roles)
    }

    async fn current_user(&self) -> ApiResult<Option<User>> {
        let envelope: Option<UserEnvelope> =
            self.client.request(Method::GET, "/auth/me", None).await?;
        Ok(envelope.and_then(|e| e.user))
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::POST,
            "/auth/change-password",
            request,
            "Password changed successfully.",
        )
        .await
    }
}

#[async_trait]
impl AuditLogRepository for HttpBackend {
    async fn list_audit_logs(&self, page: PageRequest) -> ApiResult<Page<AuditLog>> {
        let response: AuditLogsResponse = self
            .client
            .get_with_query("/audit-logs", &page.query_pairs())
            .await?
            .ok_or(ApiError::EmptyResponse)?;

        Ok(Page {
            items: response.logs,
            total: response.total,
            current_page: response.current_page,
            total_pages: response.total_pages,
        })
    }
}

#[async_trait]
impl NotificationRepository for HttpBackend {
    async fn list_notifications(&self, query: &NotificationQuery) -> ApiResult<NotificationList> {
        self.client
            .get_with_query("/notifications", &query.query_pairs())
            .await?
            .ok_or(ApiError::EmptyResponse)
    }

    async fn mark_notification_read(&self, id: &str) -> ApiResult<Option<NotificationMessage>> {
        let envelope: Option<NotificationEnvelope> = self
            .client
            .request(Method::PATCH, &format!("/notifications/{}/read", path_segment(id)?), None)
            .await?;
        Ok(envelope.and_then(|e| e.notification))
    }

    async fn mark_all_notifications_read(&self) -> ApiResult<MarkAllReadResponse> {
        self.client
            .request_json(Method::POST, "/notifications/mark-all-read", None)
            .await
    }

    async fn clear_notifications(&self) -> ApiResult<StatusMessage> {
        let value: Option<Value> = self
            .client
            .request(Method::DELETE, "/notifications", None)
            .await?;
        Ok(acknowledgement(value, "All notifications cleared."))
    }
}

#[async_trait]
impl AccountRepository for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.client
            .request_json(Method::POST, "/auth/login", Some(RequestBody::json(request)?))
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::POST,
            "/auth/register",
            request,
            "Registration successful.",
        )
        .await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::POST,
            "/auth/forgot-password",
            request,
            "If an account exists for this email, a reset link has been sent.",
        )
        .await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::POST,
            "/auth/reset-password",
            request,
            "Password has been reset.",
        )
        .await
    }

    async fn update_notification_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::PUT,
            "/settings/notifications",
            preferences,
            "Your notification settings have been updated.",
        )
        .await
    }

    async fn update_language(&self, language: Language) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::PUT,
            "/settings/language",
            &LanguagePreference { language },
            "Language preference saved.",
        )
        .await
    }

    async fn contact_support(&self, request: ContactSupportRequest) -> ApiResult<StatusMessage> {
        let mut form = Form::new();
        for (name, value) in request.text_fields() {
            form = form.text(name, value);
        }

        if let Some(attachment) = request.attachment {
            let mut part = Part::bytes(attachment.bytes).file_name(attachment.file_name);
            if let Some(content_type) = attachment.content_type {
                part = part.mime_str(&content_type).map_err(|e| {
                    ApiError::validation("attachment", format!("Invalid attachment type: {}", e))
                })?;
            }
            form = form.part("attachment", part);
        }

        let value: Option<Value> = self
            .client
            .request(
                Method::POST,
                "/support/contact",
                Some(RequestBody::Multipart(form)),
            )
            .await?;
        Ok(acknowledgement(
            value,
            "Your message has been sent. We will get back to you shortly.",
        ))
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> ApiResult<StatusMessage> {
        self.post_ack(
            Method::POST,
            "/feedback",
            request,
            "Thank you for your feedback!",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledgement_defaults_on_empty_body() {
        let ack = acknowledgement(None, "done");
        assert_eq!(ack, StatusMessage::ok("done"));
    }

    #[test]
    fn acknowledgement_reads_backend_fields() {
        let ack = acknowledgement(
            Some(serde_json::json!({"success": false, "message": "Wrong password"})),
            "done",
        );
        assert!(!ack.success);
        assert_eq!(ack.message, "Wrong password");
    }
}
