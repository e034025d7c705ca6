//! Movie repository: ownership-scoped CRUD and the search/filter query engine
//!
//! Every query is scoped by `user_id`. A row owned by somebody else is
//! indistinguishable from a missing row at this layer, so nothing here can
//! confirm that a foreign item exists.

use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::info;

use crate::{
    error::ApiError,
    models::movie::{FilterCriteria, Movie, MovieInput, MovieKind},
    validation,
};

/// Movie repository
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

fn movie_from_row(row: &PgRow) -> Result<Movie, ApiError> {
    let kind: String = row.get("kind");
    let kind = MovieKind::parse(&kind).ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!(
            "unrecognized kind {:?} stored for movie {}",
            kind,
            row.get::<i64, _>("id")
        ))
    })?;

    Ok(Movie {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        kind,
        director: row.get("director"),
        budget: row.get("budget"),
        location: row.get("location"),
        duration: row.get("duration"),
        year_time: row.get("year_time"),
        description: row.get("description"),
        rating: row.get("rating"),
        poster_url: row.get("poster_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn movies_from_rows(rows: &[PgRow]) -> Result<Vec<Movie>, ApiError> {
    rows.iter().map(movie_from_row).collect()
}

/// Append the sparse AND-combined filter predicates. Used for both the page
/// query and the COUNT query so the two always agree.
fn push_filter_conditions(builder: &mut QueryBuilder<Postgres>, criteria: &FilterCriteria) {
    if let Some(kind) = &criteria.kind {
        builder.push(" AND kind = ");
        builder.push_bind(kind.clone());
    }
    if let Some(director) = &criteria.director {
        builder.push(" AND director ILIKE ");
        builder.push_bind(format!("%{}%", director));
    }
    // year_time is free text, so the range is a lexical string comparison;
    // callers must supply fixed-width years for sensible ordering.
    if let Some(year_from) = &criteria.year_from {
        builder.push(" AND year_time >= ");
        builder.push_bind(year_from.clone());
    }
    if let Some(year_to) = &criteria.year_to {
        builder.push(" AND year_time <= ");
        builder.push_bind(year_to.clone());
    }
    if let Some(min_rating) = criteria.min_rating {
        builder.push(" AND rating >= ");
        builder.push_bind(min_rating);
    }
    if let Some(location) = &criteria.location {
        builder.push(" AND location ILIKE ");
        builder.push_bind(format!("%{}%", location));
    }
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a user's movies, newest first
    pub async fn list(
        &self,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Movie>, i64), ApiError> {
        validation::validate_pagination(page, limit)?;
        let offset = (page - 1) * limit;

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration,
                   year_time, description, rating, poster_url, created_at, updated_at
            FROM movies
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((movies_from_rows(&rows)?, total))
    }

    /// Get one movie by ID, owner-scoped
    pub async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<Movie>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration,
                   year_time, description, rating, poster_url, created_at, updated_at
            FROM movies
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(movie_from_row).transpose()
    }

    /// Insert a new movie for a user
    ///
    /// Fails with a validation error listing every violated field.
    pub async fn create(&self, input: &MovieInput, owner_id: i64) -> Result<Movie, ApiError> {
        let new_movie = validation::validate_new_movie(input)?;

        info!("Creating movie {:?} for user {}", new_movie.title, owner_id);

        let row = sqlx::query(
            r#"
            INSERT INTO movies (user_id, title, kind, director, budget, location,
                                duration, year_time, description, rating, poster_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, title, kind, director, budget, location, duration,
                      year_time, description, rating, poster_url, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&new_movie.title)
        .bind(new_movie.kind.as_str())
        .bind(&new_movie.director)
        .bind(&new_movie.budget)
        .bind(&new_movie.location)
        .bind(&new_movie.duration)
        .bind(&new_movie.year_time)
        .bind(&new_movie.description)
        .bind(new_movie.rating)
        .bind(&new_movie.poster_url)
        .fetch_one(&self.pool)
        .await?;

        movie_from_row(&row)
    }

    /// Update a movie in place; absent fields keep their stored values
    pub async fn update(
        &self,
        id: i64,
        input: &MovieInput,
        owner_id: i64,
    ) -> Result<Movie, ApiError> {
        let update = validation::validate_movie_update(input)?;

        let row = sqlx::query(
            r#"
            UPDATE movies SET
                title = COALESCE($1, title),
                kind = COALESCE($2, kind),
                director = COALESCE($3, director),
                budget = COALESCE($4, budget),
                location = COALESCE($5, location),
                duration = COALESCE($6, duration),
                year_time = COALESCE($7, year_time),
                description = COALESCE($8, description),
                rating = COALESCE($9, rating),
                poster_url = COALESCE($10, poster_url),
                updated_at = now()
            WHERE id = $11 AND user_id = $12
            RETURNING id, user_id, title, kind, director, budget, location, duration,
                      year_time, description, rating, poster_url, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(update.kind.map(|k| k.as_str()))
        .bind(&update.director)
        .bind(&update.budget)
        .bind(&update.location)
        .bind(&update.duration)
        .bind(&update.year_time)
        .bind(&update.description)
        .bind(update.rating)
        .bind(&update.poster_url)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("Movie"))?;

        info!("Updated movie {} for user {}", id, owner_id);
        movie_from_row(&row)
    }

    /// Delete a movie, owner-scoped
    pub async fn delete(&self, id: i64, owner_id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Movie"));
        }

        info!("Deleted movie {} for user {}", id, owner_id);
        Ok(())
    }

    /// Case-insensitive substring search across the free-text columns
    pub async fn search(
        &self,
        term: &str,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Movie>, i64), ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ApiError::EmptyQuery);
        }
        validation::validate_pagination(page, limit)?;

        let offset = (page - 1) * limit;
        let pattern = format!("%{}%", term);

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration,
                   year_time, description, rating, poster_url, created_at, updated_at
            FROM movies
            WHERE user_id = $1 AND (
                title ILIKE $2 OR
                director ILIKE $2 OR
                location ILIKE $2 OR
                budget ILIKE $2 OR
                duration ILIKE $2 OR
                year_time ILIKE $2
            )
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM movies
            WHERE user_id = $1 AND (
                title ILIKE $2 OR
                director ILIKE $2 OR
                location ILIKE $2 OR
                budget ILIKE $2 OR
                duration ILIKE $2 OR
                year_time ILIKE $2
            )
            "#,
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((movies_from_rows(&rows)?, total))
    }

    /// Filter a user's movies by a sparse set of criteria
    ///
    /// Predicates are assembled as parameterized (predicate, bound value)
    /// pairs; nothing from the request is interpolated into the SQL text.
    pub async fn filter(
        &self,
        criteria: &FilterCriteria,
        owner_id: i64,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Movie>, i64), ApiError> {
        validation::validate_pagination(page, limit)?;
        let offset = (page - 1) * limit;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT id, user_id, title, kind, director, budget, location, duration,
                   year_time, description, rating, poster_url, created_at, updated_at
            FROM movies
            WHERE user_id = "#,
        );
        builder.push_bind(owner_id);
        push_filter_conditions(&mut builder, criteria);
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM movies WHERE user_id = ");
        count_builder.push_bind(owner_id);
        push_filter_conditions(&mut count_builder, criteria);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((movies_from_rows(&rows)?, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_sql(criteria: &FilterCriteria) -> String {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM movies WHERE user_id = ");
        builder.push_bind(1i64);
        push_filter_conditions(&mut builder, criteria);
        builder.into_sql()
    }

    #[test]
    fn test_absent_criteria_add_no_predicates() {
        let sql = rendered_sql(&FilterCriteria::default());
        assert_eq!(sql, "SELECT COUNT(*) FROM movies WHERE user_id = $1");
    }

    #[test]
    fn test_all_criteria_are_bound_parameters() {
        let criteria = FilterCriteria {
            kind: Some("Movie".to_string()),
            director: Some("Nolan".to_string()),
            year_from: Some("2000".to_string()),
            year_to: Some("2020".to_string()),
            min_rating: Some(7.0),
            location: Some("Paris".to_string()),
        };
        let sql = rendered_sql(&criteria);

        // Every predicate present, every value a placeholder.
        assert!(sql.contains("kind = $2"));
        assert!(sql.contains("director ILIKE $3"));
        assert!(sql.contains("year_time >= $4"));
        assert!(sql.contains("year_time <= $5"));
        assert!(sql.contains("rating >= $6"));
        assert!(sql.contains("location ILIKE $7"));
        assert!(!sql.contains("Nolan"));
        assert!(!sql.contains("Paris"));
    }
}
