//! HTTP routes for the catalog service

pub mod auth;
pub mod movies;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/profile", get(auth::get_profile))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/auth/change-password", put(auth::change_password))
        .route("/api/auth/account", delete(auth::delete_account))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/movies", get(movies::list_movies))
        .route("/api/movies", post(movies::create_movie))
        .route("/api/movies/search", get(movies::search_movies))
        .route("/api/movies/filter", get(movies::filter_movies))
        .route("/api/movies/:id", get(movies::get_movie))
        .route("/api/movies/:id", put(movies::update_movie))
        .route("/api/movies/:id", delete(movies::delete_movie))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "movie-catalog-api"
    }))
}
