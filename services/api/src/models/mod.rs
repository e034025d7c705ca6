//! Models for request and response payloads

pub mod movie;
pub mod user;

// Re-export for convenience
pub use movie::{FilterCriteria, FilterQuery, Movie, MovieInput, MovieKind, PageQuery, SearchQuery};
pub use user::{ChangePassword, LoginCredentials, NewUser, UpdateProfile, User, UserResponse};

use serde::Serialize;

/// Pagination block attached to every list-shaped response
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(2, 25, 51).total_pages, 3);
    }

    #[test]
    fn test_pagination_serializes_camel_case_total_pages() {
        let value = serde_json::to_value(Pagination::new(1, 10, 25)).unwrap();
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["total"], 25);
    }
}
