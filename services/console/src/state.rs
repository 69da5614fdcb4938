//! Application state shared across handlers

use std::sync::Arc;

use axum_extra::extract::CookieJar;
use client::token::AUTH_TOKEN_KEY;
use client::{ApiClient, HttpBackend, Hub, MockBackend, StaticToken, TokenStore};
use common::config::HubConfig;
use common::error::ApiResult;

/// Where page data comes from
#[derive(Clone)]
pub enum BackendMode {
    /// In-memory sample data
    Mock(Arc<MockBackend>),
    /// External REST backend; each request authenticates with its own cookie,
    /// falling back to the token store configured by `TOKEN_STORE_PATH`
    Remote(ApiClient),
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendMode,
}

impl AppState {
    pub fn from_config(config: &HubConfig) -> ApiResult<Self> {
        if config.use_mock_backend {
            return Ok(Self::mock(Arc::new(MockBackend::seeded(config.mock_delay()))));
        }
        let client = ApiClient::new(
            config.api_base_url.clone(),
            Arc::new(TokenStore::from_config(config)),
        )?;
        Ok(Self {
            backend: BackendMode::Remote(client),
        })
    }

    pub fn mock(backend: Arc<MockBackend>) -> Self {
        Self {
            backend: BackendMode::Mock(backend),
        }
    }

    /// Domain services acting on behalf of the request's session
    pub fn hub(&self, jar: &CookieJar) -> Hub {
        match &self.backend {
            BackendMode::Mock(backend) => Hub::new(backend.clone()),
            BackendMode::Remote(client) => {
                let client = match session_token(jar) {
                    Some(token) => client.with_tokens(Arc::new(StaticToken(Some(token)))),
                    None => client.clone(),
                };
                Hub::new(Arc::new(HttpBackend::new(client)))
            }
        }
    }
}

/// Value of the auth cookie; an empty value counts as absent
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_TOKEN_KEY)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
