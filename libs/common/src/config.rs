//! Configuration for the User Hub services
//!
//! Values come from built-in defaults overlaid by environment variables.

use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Default base URL of the external REST backend
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default bind address of the console service
pub const DEFAULT_CONSOLE_ADDR: &str = "0.0.0.0:3000";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Base URL of the external REST backend (`API_BASE_URL`)
    pub api_base_url: String,
    /// Console bind address (`CONSOLE_ADDR`)
    pub console_addr: String,
    /// Serve from the in-memory mock backend instead of the REST backend (`USE_MOCK_BACKEND`)
    pub use_mock_backend: bool,
    /// Artificial latency of the mock backend in milliseconds (`MOCK_DELAY_MS`)
    pub mock_delay_ms: u64,
    /// File backing the client's persistent token store (`TOKEN_STORE_PATH`)
    #[serde(default)]
    pub token_store_path: Option<String>,
}

impl HubConfig {
    /// Create a new HubConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_BASE_URL`: backend base URL (default: "http://localhost:8080/api")
    /// - `CONSOLE_ADDR`: console bind address (default: "0.0.0.0:3000")
    /// - `USE_MOCK_BACKEND`: use the mock backend (default: false)
    /// - `MOCK_DELAY_MS`: mock backend latency (default: 300)
    /// - `TOKEN_STORE_PATH`: token store file (default: unset, in-memory)
    pub fn from_env() -> ApiResult<Self> {
        let settings = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)
            .and_then(|b| b.set_default("console_addr", DEFAULT_CONSOLE_ADDR))
            .and_then(|b| b.set_default("use_mock_backend", false))
            .and_then(|b| b.set_default("mock_delay_ms", 300))
            .map_err(|e| ApiError::Configuration(e.to_string()))?
            .add_source(Environment::default().try_parsing(true))
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let config: HubConfig = settings
            .try_deserialize()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://")
        {
            return Err(ApiError::Configuration(format!(
                "API_BASE_URL must be an http(s) URL, got {}",
                config.api_base_url
            )));
        }

        Ok(config)
    }

    /// Mock backend latency as a duration
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_hub_config_defaults() {
        unsafe {
            std::env::remove_var("API_BASE_URL");
            std::env::remove_var("USE_MOCK_BACKEND");
        }

        let config = HubConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(!config.use_mock_backend);
    }

    #[test]
    #[serial]
    fn test_hub_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("API_BASE_URL", "https://hub.example.com/api");
            std::env::set_var("USE_MOCK_BACKEND", "true");
            std::env::set_var("MOCK_DELAY_MS", "5");
        }

        let config = HubConfig::from_env().unwrap();
        assert_eq!(config.api_base_url, "https://hub.example.com/api");
        assert!(config.use_mock_backend);
        assert_eq!(config.mock_delay(), Duration::from_millis(5));

        unsafe {
            std::env::remove_var("API_BASE_URL");
            std::env::remove_var("USE_MOCK_BACKEND");
            std::env::remove_var("MOCK_DELAY_MS");
        }
    }

    #[test]
    #[serial]
    fn test_hub_config_rejects_non_http_base_url() {
        unsafe {
            std::env::set_var("API_BASE_URL", "ftp://hub.example.com");
        }

        let err = HubConfig::from_env().unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));

        unsafe {
            std::env::remove_var("API_BASE_URL");
        }
    }
}
