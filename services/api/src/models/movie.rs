//! Movie models for the catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog item kind. Stored as text (`Movie` / `TV Show`), which is also
/// the wire representation under the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovieKind {
    Movie,
    #[serde(rename = "TV Show")]
    TVShow,
}

impl MovieKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieKind::Movie => "Movie",
            MovieKind::TVShow => "TV Show",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Movie" => Some(MovieKind::Movie),
            "TV Show" => Some(MovieKind::TVShow),
            _ => None,
        }
    }
}

/// Catalog item
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MovieKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming item payload for create and update.
///
/// Every field is optional at the deserialization layer so validation can
/// report all missing or invalid fields at once instead of failing on the
/// first one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieInput {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub director: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year_time: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Fully validated payload for inserting a new item
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub kind: MovieKind,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Validated partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub kind: Option<MovieKind>,
    pub director: Option<String>,
    pub budget: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub year_time: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// Query parameters for plain listing
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for text search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for the filter endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FilterQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub director: Option<String>,
    #[serde(rename = "yearFrom")]
    pub year_from: Option<String>,
    #[serde(rename = "yearTo")]
    pub year_to: Option<String>,
    pub rating: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Sparse set of AND-combined filter predicates. Absent criteria impose no
/// constraint beyond the owner scope.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub kind: Option<String>,
    pub director: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub min_rating: Option<f64>,
    pub location: Option<String>,
}

impl From<&FilterQuery> for FilterCriteria {
    fn from(query: &FilterQuery) -> Self {
        Self {
            // "All" is the client's no-op selection
            kind: query.kind.clone().filter(|k| k != "All"),
            director: query.director.clone().filter(|s| !s.is_empty()),
            year_from: query.year_from.clone().filter(|s| !s.is_empty()),
            year_to: query.year_to.clone().filter(|s| !s.is_empty()),
            // Non-numeric rating text degrades to "no rating predicate"
            min_rating: query
                .rating
                .as_deref()
                .and_then(|s| s.trim().parse::<f64>().ok()),
            location: query.location.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_text() {
        assert_eq!(MovieKind::parse("Movie"), Some(MovieKind::Movie));
        assert_eq!(MovieKind::parse("TV Show"), Some(MovieKind::TVShow));
        assert_eq!(MovieKind::parse("Documentary"), None);
        assert_eq!(MovieKind::TVShow.as_str(), "TV Show");
    }

    #[test]
    fn test_kind_serializes_wire_names() {
        assert_eq!(
            serde_json::to_value(MovieKind::TVShow).unwrap(),
            serde_json::json!("TV Show")
        );
        assert_eq!(
            serde_json::from_value::<MovieKind>(serde_json::json!("Movie")).unwrap(),
            MovieKind::Movie
        );
    }

    #[test]
    fn test_movie_serializes_kind_under_type() {
        let movie = Movie {
            id: 1,
            user_id: 7,
            title: "Inception".to_string(),
            kind: MovieKind::Movie,
            director: "Christopher Nolan".to_string(),
            budget: "$160M".to_string(),
            location: "LA, Paris".to_string(),
            duration: "148 min".to_string(),
            year_time: "2010".to_string(),
            description: None,
            rating: Some(8.8),
            poster_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["type"], "Movie");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_filter_criteria_skips_all_kind() {
        let query = FilterQuery {
            kind: Some("All".to_string()),
            director: None,
            year_from: None,
            year_to: None,
            rating: None,
            location: None,
            page: None,
            limit: None,
        };
        assert!(FilterCriteria::from(&query).kind.is_none());
    }

    #[test]
    fn test_filter_criteria_coerces_rating() {
        let mut query = FilterQuery {
            kind: None,
            director: None,
            year_from: None,
            year_to: None,
            rating: Some("7.5".to_string()),
            location: None,
            page: None,
            limit: None,
        };
        assert_eq!(FilterCriteria::from(&query).min_rating, Some(7.5));

        query.rating = Some("not-a-number".to_string());
        assert_eq!(FilterCriteria::from(&query).min_rating, None);
    }
}
