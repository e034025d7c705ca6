//! Input validation utilities
//!
//! Identity field validators follow the auth rules (first failure wins);
//! catalog payload validation collects every violated field so the client
//! gets the complete list in one response.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ApiError;
use crate::models::movie::{MovieInput, MovieKind, MovieUpdate, NewMovie};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate pagination bounds shared by the listing endpoints
pub fn validate_pagination(page: i64, limit: i64) -> Result<(), ApiError> {
    if page < 1 || limit < 1 || limit > 100 {
        return Err(ApiError::InvalidPagination);
    }
    Ok(())
}

/// Check a required free-text field, recording a violation when it is
/// missing, empty, or over length. Returns the value when usable.
fn check_required(
    value: &Option<String>,
    name: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value {
        None => {
            errors.push(format!("{name} is required"));
            None
        }
        Some(v) if v.is_empty() => {
            errors.push(format!("{name} is required"));
            None
        }
        Some(v) if v.len() > max_len => {
            errors.push(format!("{name} must be less than {max_len} characters"));
            None
        }
        Some(v) => Some(v.clone()),
    }
}

fn check_kind(value: &Option<String>, errors: &mut Vec<String>) -> Option<MovieKind> {
    match value.as_deref().map(MovieKind::parse) {
        Some(Some(kind)) => Some(kind),
        _ => {
            errors.push("Type must be either Movie or TV Show".to_string());
            None
        }
    }
}

fn check_rating(value: Option<f64>, errors: &mut Vec<String>) -> Option<f64> {
    match value {
        Some(r) if !(0.0..=10.0).contains(&r) => {
            errors.push("Rating must be between 0 and 10".to_string());
            None
        }
        other => other,
    }
}

/// Empty optional text is stored as absent, not as an empty string
fn normalize_optional(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

/// Validate a full create payload, reporting every violated field
pub fn validate_new_movie(input: &MovieInput) -> Result<NewMovie, ApiError> {
    let mut errors = Vec::new();

    let title = check_required(&input.title, "Title", 255, &mut errors);
    let kind = check_kind(&input.kind, &mut errors);
    let director = check_required(&input.director, "Director", 255, &mut errors);
    let budget = check_required(&input.budget, "Budget", 100, &mut errors);
    let location = check_required(&input.location, "Location", 255, &mut errors);
    let duration = check_required(&input.duration, "Duration", 100, &mut errors);
    let year_time = check_required(&input.year_time, "Year/Time", 100, &mut errors);
    let rating = check_rating(input.rating, &mut errors);

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Every checker pushed an error or produced a value.
    match (title, kind, director, budget, location, duration, year_time) {
        (
            Some(title),
            Some(kind),
            Some(director),
            Some(budget),
            Some(location),
            Some(duration),
            Some(year_time),
        ) => Ok(NewMovie {
            title,
            kind,
            director,
            budget,
            location,
            duration,
            year_time,
            description: normalize_optional(&input.description),
            rating,
            poster_url: normalize_optional(&input.poster_url),
        }),
        _ => Err(ApiError::Validation(vec!["Validation failed".to_string()])),
    }
}

/// Validate a partial update payload: provided fields must be valid, absent
/// fields are left untouched by the caller
pub fn validate_movie_update(input: &MovieInput) -> Result<MovieUpdate, ApiError> {
    let mut errors = Vec::new();
    let mut update = MovieUpdate::default();

    if input.title.is_some() {
        update.title = check_required(&input.title, "Title", 255, &mut errors);
    }
    if input.kind.is_some() {
        update.kind = check_kind(&input.kind, &mut errors);
    }
    if input.director.is_some() {
        update.director = check_required(&input.director, "Director", 255, &mut errors);
    }
    if input.budget.is_some() {
        update.budget = check_required(&input.budget, "Budget", 100, &mut errors);
    }
    if input.location.is_some() {
        update.location = check_required(&input.location, "Location", 255, &mut errors);
    }
    if input.duration.is_some() {
        update.duration = check_required(&input.duration, "Duration", 100, &mut errors);
    }
    if input.year_time.is_some() {
        update.year_time = check_required(&input.year_time, "Year/Time", 100, &mut errors);
    }
    update.rating = check_rating(input.rating, &mut errors);
    update.description = normalize_optional(&input.description);
    update.poster_url = normalize_optional(&input.poster_url);

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> MovieInput {
        MovieInput {
            title: Some("Inception".to_string()),
            kind: Some("Movie".to_string()),
            director: Some("Christopher Nolan".to_string()),
            budget: Some("$160M".to_string()),
            location: Some("LA, Paris".to_string()),
            duration: Some("148 min".to_string()),
            year_time: Some("2010".to_string()),
            description: None,
            rating: Some(8.8),
            poster_url: None,
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username("no spaces here").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@nodomain").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(validate_pagination(1, 10).is_ok());
        assert!(validate_pagination(1, 100).is_ok());
        assert!(validate_pagination(1, 101).is_err());
        assert!(validate_pagination(0, 10).is_err());
        assert!(validate_pagination(1, 0).is_err());
        assert!(validate_pagination(-1, 10).is_err());
    }

    #[test]
    fn test_new_movie_accepts_full_payload() {
        let movie = validate_new_movie(&full_input()).unwrap();
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.kind, MovieKind::Movie);
        assert_eq!(movie.rating, Some(8.8));
    }

    #[test]
    fn test_new_movie_collects_every_violation() {
        let input = MovieInput {
            title: None,
            kind: Some("Documentary".to_string()),
            director: Some(String::new()),
            budget: None,
            location: None,
            duration: None,
            year_time: None,
            description: None,
            rating: Some(11.0),
            poster_url: None,
        };

        let err = validate_new_movie(&input).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                // title, kind, director, budget, location, duration,
                // year_time, rating
                assert_eq!(errors.len(), 8);
                assert!(errors.iter().any(|e| e == "Title is required"));
                assert!(
                    errors
                        .iter()
                        .any(|e| e == "Type must be either Movie or TV Show")
                );
                assert!(errors.iter().any(|e| e == "Rating must be between 0 and 10"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_movie_normalizes_empty_optionals() {
        let mut input = full_input();
        input.description = Some(String::new());
        input.poster_url = Some(String::new());

        let movie = validate_new_movie(&input).unwrap();
        assert_eq!(movie.description, None);
        assert_eq!(movie.poster_url, None);
    }

    #[test]
    fn test_update_allows_partial_payload() {
        let input = MovieInput {
            title: Some("Tenet".to_string()),
            ..MovieInput::default()
        };

        let update = validate_movie_update(&input).unwrap();
        assert_eq!(update.title.as_deref(), Some("Tenet"));
        assert!(update.director.is_none());
        assert!(update.kind.is_none());
    }

    #[test]
    fn test_update_rejects_provided_but_invalid_fields() {
        let input = MovieInput {
            title: Some(String::new()),
            rating: Some(-1.0),
            ..MovieInput::default()
        };

        let err = validate_movie_update(&input).unwrap_err();
        match err {
            ApiError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
