//! REST client for the User Hub backend
//!
//! The client attaches the bearer token, issues one request, and normalizes
//! every failure into [`ApiError`]. There are no retries, timeouts or backoff;
//! failures surface directly to the caller.

use std::sync::Arc;

use common::error::{ApiError, ApiResult, UNKNOWN_API_ERROR};
use reqwest::{Method, Response, StatusCode, Url, header, multipart::Form};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, error};

use crate::token::TokenSource;

/// Body of an outgoing request
pub enum RequestBody {
    /// Serialized as JSON with `Content-Type: application/json`
    Json(Value),
    /// Sent as `multipart/form-data`; the encoder sets the content type
    Multipart(Form),
}

impl RequestBody {
    /// Serialize a payload into a JSON body
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> ApiResult<Self> {
        serde_json::to_value(payload)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Decode(format!("Failed to encode request body: {}", e)))
    }
}

/// Percent-encode `id` as exactly one path segment
///
/// `/`, `?`, `#` and `%` are escaped so an id can never address another
/// endpoint; empty and dot-only ids are rejected.
pub fn path_segment(id: &str) -> ApiResult<String> {
    if matches!(id, "" | "." | "..") {
        return Err(ApiError::NotFound(format!("'{}'", id)));
    }
    let mut url = Url::parse("http://segment.invalid/")
        .map_err(|e| ApiError::Configuration(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::Configuration("URL cannot carry path segments".to_string()))?
        .pop_if_empty()
        .push(id);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Structured error body returned by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<Value>,
}

/// HTTP client wrapper
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a new client for `base_url`, reading bearer tokens from `tokens`
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Same client, authenticating with a different token source
    pub fn with_tokens(&self, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue a request; a 204 response resolves to `None`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> ApiResult<Option<T>> {
        self.execute(method, endpoint, &[], body).await
    }

    /// Issue a GET with query-string parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> ApiResult<Option<T>> {
        self.execute(Method::GET, endpoint, query, None).await
    }

    /// Issue a request whose success response must carry a body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
    ) -> ApiResult<T> {
        self.request(method, endpoint, body)
            .await?
            .ok_or(ApiError::EmptyResponse)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&'static str, String)],
        body: Option<RequestBody>,
    ) -> ApiResult<Option<T>> {
        let url = self.build_url(endpoint);
        debug!("{} {}", method, url);

        let mut req = self.http.request(method, &url);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(token) = self.tokens.token() {
            req = req.bearer_auth(token);
        }

        match body {
            Some(RequestBody::Json(value)) => {
                req = req.json(&value);
            }
            Some(RequestBody::Multipart(form)) => {
                req = req.multipart(form);
            }
            None => {
                req = req.header(header::CONTENT_TYPE, "application/json");
            }
        }

        let response = req.send().await.map_err(|e| {
            error!("API request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = Self::error_from_response(response).await;
            error!("API Error: {} ({})", err, status);
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        if bytes.is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into an error carrying a display message
    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let fallback = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));

        let parsed = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok());

        match parsed {
            Some(body) => ApiError::Status {
                status: status.as_u16(),
                message: body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
                details: body.details,
            },
            None => ApiError::Status {
                status: status.as_u16(),
                message: fallback,
                details: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticToken;

    fn client(url: &str, token: Option<&str>) -> ApiClient {
        ApiClient::new(url, Arc::new(StaticToken(token.map(str::to_string)))).unwrap()
    }

    #[test]
    fn ids_are_encoded_as_a_single_segment() {
        assert_eq!(path_segment("user-001").unwrap(), "user-001");
        assert_eq!(
            path_segment("../../admin/secrets").unwrap(),
            "..%2F..%2Fadmin%2Fsecrets"
        );
        assert_eq!(path_segment("a?b#c").unwrap(), "a%3Fb%23c");
        assert!(matches!(path_segment(".."), Err(ApiError::NotFound(_))));
        assert!(path_segment("").is_err());
    }

    #[tokio::test]
    async fn no_content_resolves_to_empty_result() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/users/7")
            .with_status(204)
            .create_async()
            .await;

        let result: Option<Value> = client(&server.url(), None)
            .request(Method::DELETE, "/users/7", None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn structured_error_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/users")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"X","details":{"field":"email"}}"#)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .request::<Value>(Method::POST, "/users", Some(RequestBody::Json(Value::Null)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "X");
        match err {
            ApiError::Status { status, details, .. } => {
                assert_eq!(status, 409);
                assert_eq!(details.unwrap()["field"], "email");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unstructured_error_falls_back_to_status_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/roles/unique")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .request::<Value>(Method::GET, "/roles/unique", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[tokio::test]
    async fn json_error_without_message_uses_generic_text() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/auth/me")
            .with_status(401)
            .with_body(r#"{"error":"nope"}"#)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .request::<Value>(Method::GET, "/auth/me", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), UNKNOWN_API_ERROR);
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn bearer_token_is_attached_when_present() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/auth/me")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .expect(1)
            .create_async()
            .await;

        let value: Value = client(&server.url(), Some("secret-token"))
            .request_json(Method::GET, "/auth/me", None)
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn authorization_header_is_omitted_without_token() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/audit-logs")
            .match_header("authorization", mockito::Matcher::Missing)
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("page".into(), "2".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"logs":[]}"#)
            .create_async()
            .await;

        let value: Option<Value> = client(&server.url(), None)
            .get_with_query(
                "/audit-logs",
                &[("page", "2".to_string()), ("limit", "10".to_string())],
            )
            .await
            .unwrap();
        assert!(value.is_some());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn request_json_rejects_no_content() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/feedback")
            .with_status(204)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .request_json::<Value>(Method::POST, "/feedback", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/notifications")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .request::<Value>(Method::GET, "/notifications", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let err = client("http://127.0.0.1:1", None)
            .request::<Value>(Method::GET, "/users", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
