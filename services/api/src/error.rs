//! Custom error types for the catalog service
//!
//! Repositories raise these typed failures; the `IntoResponse` impl is the
//! single place where they are mapped to an HTTP status and JSON envelope.
//! Store errors are logged server-side and never leak their text to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the catalog service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Catalog payload validation failed; carries every violated field
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Page or limit outside the accepted bounds
    #[error("Invalid pagination parameters")]
    InvalidPagination,

    /// Search endpoint called with a blank term
    #[error("Search query is required")]
    EmptyQuery,

    /// Missing resource, or one owned by somebody else (indistinguishable)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Profile update with neither username nor email
    #[error("No valid fields to update")]
    NoFieldsProvided,

    /// Replacement password below the minimum length
    #[error("New password must be at least 6 characters long")]
    WeakPassword,

    /// Unknown email or wrong password (uniform on purpose)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing, malformed, or expired bearer token (uniform on purpose)
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Status code this error maps to on the wire
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidPagination
            | ApiError::EmptyQuery
            | ApiError::BadRequest(_)
            | ApiError::NoFieldsProvided
            | ApiError::WeakPassword => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateUsername | ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Catalog-shaped failure body: `{success:false, message, errors}`
fn catalog_body(status: StatusCode, message: String, errors: Vec<String>) -> Response {
    let body = Json(json!({
        "success": false,
        "message": message,
        "errors": errors,
    }));
    (status, body).into_response()
}

/// Auth-shaped failure body: `{error}`
fn auth_body(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message,
    }));
    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match self {
            ApiError::Validation(errors) => catalog_body(status, message, errors),
            ApiError::InvalidPagination => catalog_body(
                status,
                "Invalid pagination parameters. Page must be >= 1, limit must be between 1 and 100"
                    .to_string(),
                vec![],
            ),
            ApiError::EmptyQuery => catalog_body(
                status,
                message,
                vec!["Please provide a search term".to_string()],
            ),
            ApiError::NotFound(resource) => catalog_body(
                status,
                message,
                vec![format!(
                    "{resource} with the specified ID does not exist or you don't have permission to view it"
                )],
            ),
            ApiError::BadRequest(message) => auth_body(status, message),
            ApiError::NoFieldsProvided
            | ApiError::WeakPassword
            | ApiError::InvalidCredentials
            | ApiError::InvalidToken
            | ApiError::DuplicateUsername
            | ApiError::DuplicateEmail => auth_body(status, message),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                auth_body(status, "Internal server error".to_string())
            }
            ApiError::Internal(e) => {
                error!("Internal error: {}", e);
                auth_body(status, "Internal server error".to_string())
            }
        }
    }
}

/// Type alias for service results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidPagination.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyQuery.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Movie").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::WeakPassword.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_response_status_matches_variant() {
        let response = ApiError::NotFound("Movie").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_uniform_credential_message() {
        // Unknown email and wrong password must render identically.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
