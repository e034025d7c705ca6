//! Authentication and profile handlers

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::user::{ChangePassword, LoginCredentials, NewUser, UpdateProfile, UserResponse},
    state::AppState,
};

/// Register a new user and hand back a session token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_repository.create(&payload).await?;
    let token = state.jwt_service.issue(user.id)?;

    info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserResponse::from(&user),
            "token": token,
        })),
    ))
}

/// Log a user in
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.jwt_service.issue(user.id)?;

    info!("User {} logged in", user.username);

    Ok(Json(json!({
        "message": "Login successful",
        "user": UserResponse::from(&user),
        "token": token,
    })))
}

/// Return the authenticated user's profile
pub async fn get_profile(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    Json(json!({
        "user": UserResponse::from(&user),
    }))
}

/// Update username and/or email
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.user_repository.update_profile(user.id, &payload).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": UserResponse::from(&updated),
    })))
}

/// Change the authenticated user's password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePassword>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .user_repository
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(json!({
        "message": "Password changed successfully",
    })))
}

/// Delete the authenticated user's account and all owned movies
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_repository.delete_account(user.id).await?;

    Ok(Json(json!({
        "message": "Account deleted successfully",
    })))
}

/// Confirm that the presented token still resolves to a live identity
pub async fn verify(Extension(user): Extension<AuthUser>) -> impl IntoResponse {
    Json(json!({
        "valid": true,
        "user": UserResponse::from(&user),
    }))
}
