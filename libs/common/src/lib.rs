//! Common library for the User Hub application
//!
//! This crate provides the shared data model, error taxonomy, configuration
//! and form validation used by the API client and the console service.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{ApiError, ApiResult};

/// Example usage of the configuration module
///
/// ```rust,no_run
/// use common::config::HubConfig;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HubConfig::from_env()?;
///     println!("Backend base URL: {}", config.api_base_url);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
