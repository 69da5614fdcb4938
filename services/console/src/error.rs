//! Error responses for the console service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::ApiError;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the console service
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// No signed-in user behind the request
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request the handler could not interpret
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Requested entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The backend call failed and the domain function swallowed the cause
    #[error("{0}")]
    Upstream(String),

    /// Error from the backend client or form validation
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ConsoleError {
    fn status_code(&self) -> StatusCode {
        match self {
            ConsoleError::Unauthorized => StatusCode::UNAUTHORIZED,
            ConsoleError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ConsoleError::NotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Api(err) => match err {
                ApiError::Status { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Network(_) | ApiError::EmptyResponse | ApiError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
                ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = json!({
            "error": self.to_string(),
        });
        if let ConsoleError::Api(ApiError::Validation { field, .. }) = &self {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

/// Type alias for console handler results
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_status_is_carried_over() {
        let err = ConsoleError::from(ApiError::Status {
            status: 409,
            message: "Email already in use".to_string(),
            details: None,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Email already in use");
    }

    #[test]
    fn transport_failures_map_to_bad_gateway() {
        let err = ConsoleError::from(ApiError::Network("connection refused".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        let err = ConsoleError::from(ApiError::validation("email", "Invalid email address."));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
