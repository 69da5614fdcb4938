//! Console routes

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::CookieJar;
use client::token::{auth_cookie, removal_cookie};
use common::error::ApiError;
use common::models::{
    Attachment, ChangePasswordRequest, ContactSupportRequest, FeedbackRequest,
    ForgotPasswordRequest, InquiryType, LanguagePreference, LoginRequest, NewUser,
    NotificationPreferences, NotificationQuery, NotificationStatus, PageRequest, RegisterRequest,
    ResetPasswordRequest, StatusMessage, UpdateUser, UserQuery,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ConsoleError, ConsoleResult},
    middleware::route_guard,
    models::{
        AuditLogQuery, AuditLogView, DashboardView, LandingView, ProfileView, RECENT_AUDIT_LOGS, RolesView,
    },
    state::{AppState, session_token},
};

/// Create the router for the console service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(landing))
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/roles", get(list_roles))
        .route("/audit-logs", get(list_audit_logs))
        .route(
            "/notifications",
            get(list_notifications).delete(clear_notifications),
        )
        .route("/notifications/mark-all-read", post(mark_all_notifications_read))
        .route("/notifications/:id/read", post(mark_notification_read))
        .route("/profile", get(profile))
        .route("/profile/password", post(change_password))
        .route("/settings/notifications", put(update_notification_preferences))
        .route("/settings/language", put(update_language))
        .route("/contact-support", post(contact_support))
        .route("/feedback", post(submit_feedback))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/logout", post(logout))
        .layer(middleware::from_fn(route_guard))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "console"
    }))
}

pub async fn landing(jar: CookieJar) -> Json<LandingView> {
    let authenticated = session_token(&jar).is_some();
    Json(LandingView {
        authenticated,
        next: if authenticated { "/dashboard" } else { "/login" },
    })
}

/// User counters, unread notifications and the latest audit entries
pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Json<DashboardView> {
    let hub = state.hub(&jar);
    let unread = NotificationQuery {
        status: Some(NotificationStatus::Unread),
        ..Default::default()
    };

    let (summary, inbox, logs) = tokio::join!(
        hub.users.summarize(),
        hub.notifications.get_notifications(&unread),
        hub.audit_logs.get_audit_logs(1, RECENT_AUDIT_LOGS),
    );

    Json(DashboardView::new(summary, inbox.unread_count, logs.items))
}

pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(state.hub(&jar).users.get_users(&query).await)
}

pub async fn get_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ConsoleResult<impl IntoResponse> {
    let user = state
        .hub(&jar)
        .users
        .get_user_by_id(&id)
        .await
        .ok_or_else(|| ConsoleError::NotFound("User".to_string()))?;

    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<NewUser>,
) -> ConsoleResult<impl IntoResponse> {
    let user = state.hub(&jar).users.create_user(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUser>,
) -> ConsoleResult<impl IntoResponse> {
    let user = state.hub(&jar).users.update_user(&id, &payload).await?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ConsoleResult<StatusCode> {
    state.hub(&jar).users.delete_user(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_roles(State(state): State<AppState>, jar: CookieJar) -> Json<RolesView> {
    Json(RolesView {
        roles: state.hub(&jar).users.get_unique_roles().await,
    })
}

pub async fn list_audit_logs(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<AuditLogQuery>,
) -> impl IntoResponse {
    let request = PageRequest::from_optional(query.page, query.limit);
    let page = state
        .hub(&jar)
        .audit_logs
        .get_audit_logs(request.page, request.limit)
        .await;

    Json(page.map(AuditLogView::from))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    Json(state.hub(&jar).notifications.get_notifications(&query).await)
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ConsoleResult<impl IntoResponse> {
    let notification = state
        .hub(&jar)
        .notifications
        .mark_as_read(&id)
        .await
        .ok_or_else(|| ConsoleError::NotFound("Notification".to_string()))?;

    Ok(Json(notification))
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ConsoleResult<impl IntoResponse> {
    let response = state
        .hub(&jar)
        .notifications
        .mark_all_as_read()
        .await
        .ok_or_else(|| {
            ConsoleError::Upstream("Failed to mark all notifications as read".to_string())
        })?;

    Ok(Json(response))
}

pub async fn clear_notifications(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ConsoleResult<impl IntoResponse> {
    let response = state
        .hub(&jar)
        .notifications
        .clear_all()
        .await
        .ok_or_else(|| ConsoleError::Upstream("Failed to clear notifications".to_string()))?;

    Ok(Json(response))
}

pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ConsoleResult<Json<ProfileView>> {
    let user = state
        .hub(&jar)
        .users
        .get_current_user()
        .await
        .ok_or(ConsoleError::Unauthorized)?;

    Ok(Json(ProfileView::from(user)))
}

pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ChangePasswordRequest>,
) -> ConsoleResult<Json<StatusMessage>> {
    Ok(Json(state.hub(&jar).users.change_password(&payload).await?))
}

pub async fn update_notification_preferences(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<NotificationPreferences>,
) -> ConsoleResult<Json<StatusMessage>> {
    let response = state
        .hub(&jar)
        .account
        .update_notification_preferences(&payload)
        .await?;

    Ok(Json(response))
}

pub async fn update_language(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LanguagePreference>,
) -> ConsoleResult<Json<StatusMessage>> {
    let response = state
        .hub(&jar)
        .account
        .update_language(payload.language)
        .await?;

    Ok(Json(response))
}

/// Contact-support form; text fields plus an optional `attachment` file
pub async fn contact_support(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> ConsoleResult<Json<StatusMessage>> {
    let mut fields = HashMap::new();
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConsoleError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "attachment" {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ConsoleError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                attachment = Some(Attachment {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ConsoleError::BadRequest(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    let mut take = |key: &str| fields.remove(key).unwrap_or_default();
    let inquiry_type = InquiryType::parse(&take("inquiryType"))
        .ok_or_else(|| ApiError::validation("inquiryType", "Please select an inquiry type."))?;
    let request = ContactSupportRequest {
        name: take("name"),
        email: take("email"),
        subject: take("subject"),
        inquiry_type,
        message: take("message"),
        attachment,
    };

    Ok(Json(state.hub(&jar).account.contact_support(request).await?))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<FeedbackRequest>,
) -> ConsoleResult<Json<StatusMessage>> {
    Ok(Json(state.hub(&jar).account.submit_feedback(&payload).await?))
}

/// Sign in and hand the token back as the auth cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ConsoleResult<impl IntoResponse> {
    let response = state.hub(&jar).account.login(&payload).await?;
    info!("Session started for {}", payload.email);

    Ok((jar.add(auth_cookie(response.token.clone())), Json(response)))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> ConsoleResult<Json<StatusMessage>> {
    Ok(Json(state.hub(&jar).account.register(&payload).await?))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ConsoleResult<Json<StatusMessage>> {
    Ok(Json(state.hub(&jar).account.forgot_password(&payload).await?))
}

pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<ResetPasswordRequest>,
) -> ConsoleResult<Json<StatusMessage>> {
    Ok(Json(state.hub(&jar).account.reset_password(&payload).await?))
}

/// Drop the auth cookie
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(removal_cookie()),
        Json(StatusMessage::ok("Signed out")),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, header};
    use client::MockBackend;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    const SESSION: &str = "authToken=mock-session";

    fn app() -> (Router, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::seeded(Duration::ZERO));
        (create_router(AppState::mock(backend.clone())), backend)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, SESSION)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn anonymous_dashboard_redirects_to_login() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn empty_cookie_counts_as_signed_out() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/users", Some("authToken=")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn signed_in_login_page_redirects_to_dashboard() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/login", Some(SESSION))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn signed_in_form_post_to_login_is_sent_to_dashboard_as_get() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/login",
                json!({ "email": "admin@example.com", "password": "secret" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn landing_is_open_to_everyone() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["next"], "/login");
    }

    #[tokio::test]
    async fn dashboard_shows_counters() {
        let (app, _) = app();
        let response = app.oneshot(get_request("/dashboard", Some(SESSION))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["totalUsers"], 25);
        assert_eq!(body["unreadNotifications"], 3);
        assert_eq!(body["recentAuditLogs"].as_array().unwrap().len(), 5);
        assert!(body["recentAuditLogs"][0]["kind"].is_string());
        assert!(body["activeUsers"].as_u64().unwrap() < 25);
    }

    #[tokio::test]
    async fn audit_logs_carry_badge_kind_and_label() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/audit-logs?page=1&limit=10", Some(SESSION)))
            .await
            .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["total"], 7);
        let first = &body["items"][0];
        assert_eq!(first["action"], "LOGIN_SUCCESS");
        assert_eq!(first["kind"], "change");
        assert_eq!(first["label"], "LOGIN SUCCESS");

        let failed = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["action"] == "LOGIN_FAILED")
            .unwrap();
        assert_eq!(failed["kind"], "destructive");
    }

    #[tokio::test]
    async fn user_listing_is_paginated_without_passwords() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/users?page=2&limit=10", Some(SESSION)))
            .await
            .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["total"], 25);
        assert_eq!(body["currentPage"], 2);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["id"], "user-011");
        assert!(items.iter().all(|u| u.get("password").is_none()));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (app, _) = app();
        let response = app
            .oneshot(get_request("/users/nobody", Some(SESSION)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "User not found");
    }

    #[tokio::test]
    async fn creating_a_user_without_roles_is_rejected() {
        let (app, _) = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/users",
                json!({
                    "firstName": "Nina",
                    "lastName": "Simone",
                    "email": "nina@example.com",
                    "roles": []
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "roles");
        assert_eq!(body["error"], "At least one role must be selected.");
    }

    #[tokio::test]
    async fn creating_a_user_with_blank_roles_is_rejected() {
        let (app, backend) = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/users",
                json!({
                    "firstName": "Nina",
                    "lastName": "Simone",
                    "email": "nina@example.com",
                    "roles": ["", "  "]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["field"], "roles");

        let hub = client::Hub::new(backend);
        assert_eq!(hub.users.summarize().await.total, 25);
    }

    #[tokio::test]
    async fn creating_a_user_returns_created() {
        let (app, backend) = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/users",
                json!({
                    "firstName": "Nina",
                    "lastName": "Simone",
                    "email": "nina@example.com",
                    "roles": "ROLE_USER,ROLE_EDITOR"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["roles"], "ROLE_USER,ROLE_EDITOR");

        let hub = client::Hub::new(backend);
        assert_eq!(hub.users.summarize().await.total, 26);
    }

    #[tokio::test]
    async fn login_sets_the_auth_cookie() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": "admin@example.com", "password": "secret" }).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("authToken=mock-"));
        assert!(cookie.contains("Path=/"));
    }

    #[tokio::test]
    async fn logout_removes_the_auth_cookie() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, SESSION)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("authToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn unavailable_language_is_rejected() {
        let (app, backend) = app();
        let response = app
            .oneshot(json_request(
                "PUT",
                "/settings/language",
                json!({ "language": "fr" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            backend.language().await,
            common::models::Language::En
        );
    }

    #[tokio::test]
    async fn mark_all_read_clears_the_unread_count() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/notifications/mark-all-read", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["unreadCountAfter"], 0);

        let response = app
            .oneshot(get_request("/notifications?status=unread", Some(SESSION)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["unreadCount"], 0);
    }

    #[tokio::test]
    async fn contact_support_accepts_multipart_with_attachment() {
        let (app, backend) = app();
        let boundary = "hub-boundary";
        let mut body = String::new();
        for (name, value) in [
            ("name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("subject", "Cannot log in"),
            ("inquiryType", "account_access"),
            ("message", "My account has been locked since yesterday."),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"attachment\"; filename=\"log.txt\"\r\nContent-Type: text/plain\r\n\r\nstack trace\r\n--{boundary}--\r\n"
        ));

        let request = Request::builder()
            .method("POST")
            .uri("/contact-support")
            .header(header::COOKIE, SESSION)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
        assert_eq!(backend.support_request_count().await, 1);
    }
}
