//! REST client for the User Hub backend
//!
//! This crate holds the HTTP client, the bearer token store, the repository
//! seam (REST or in-memory mock) and the domain functions the console pages
//! call.

pub mod api_client;
pub mod repositories;
pub mod services;
pub mod token;

pub use api_client::{ApiClient, RequestBody};
pub use repositories::{Backend, HttpBackend, MockBackend};
pub use services::Hub;
pub use token::{StaticToken, TokenSource, TokenStore};
