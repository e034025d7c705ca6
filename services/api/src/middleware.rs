//! Access control middleware for bearer token validation
//!
//! Per request: header present, `Bearer ` prefix, token verifies, identity
//! still exists. Every negative branch short-circuits with the same 401 body
//! so callers cannot probe which step failed.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Identity attached to the request after successful authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Extract the token from an Authorization header value
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// Validate the bearer token and attach the resolved identity to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::InvalidToken)?;

    let token = bearer_token(auth_header).ok_or(ApiError::InvalidToken)?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        warn!("Token validation failed: {}", e);
        ApiError::InvalidToken
    })?;

    // The account may have been deleted since the token was issued.
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
        email: user.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
