//! Catalog handlers: translation between HTTP and the movie repository
//!
//! The owner id always comes from the authenticated request context, never
//! from client input.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::{
        Pagination,
        movie::{FilterCriteria, FilterQuery, MovieInput, PageQuery, SearchQuery},
    },
    state::AppState,
};

/// List the user's movies with pagination
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let (movies, total) = state.movie_repository.list(user.id, page, limit).await?;

    Ok(Json(json!({
        "success": true,
        "data": movies,
        "pagination": Pagination::new(page, limit, total),
        "message": "Your movies retrieved successfully",
    })))
}

/// Search the user's movies across the free-text fields
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let term = query.q.unwrap_or_default();
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);

    let (movies, total) = state
        .movie_repository
        .search(&term, user.id, page, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": movies,
        "pagination": Pagination::new(page, limit, total),
        "message": format!("Found {} movies matching \"{}\"", total, term.trim()),
    })))
}

/// Filter the user's movies by the sparse criteria set
pub async fn filter_movies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(10);
    let criteria = FilterCriteria::from(&query);

    let (movies, total) = state
        .movie_repository
        .filter(&criteria, user.id, page, limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": movies,
        "pagination": Pagination::new(page, limit, total),
        "message": format!("Found {} movies matching your filters", total),
    })))
}

/// Get one movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state
        .movie_repository
        .get_by_id(id, user.id)
        .await?
        .ok_or(ApiError::NotFound("Movie"))?;

    Ok(Json(json!({
        "success": true,
        "data": movie,
        "message": "Movie retrieved successfully",
    })))
}

/// Add a movie to the user's collection
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<MovieInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state.movie_repository.create(&payload, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": movie,
            "message": "Movie added to your favorites successfully",
        })),
    ))
}

/// Update one of the user's movies
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MovieInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state
        .movie_repository
        .update(id, &payload, user.id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": movie,
        "message": "Movie updated successfully",
    })))
}

/// Remove one of the user's movies
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.movie_repository.delete(id, user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Movie removed from your favorites successfully",
    })))
}
