//! User repository for identity storage and credential checks

use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use tracing::info;

use crate::{
    error::ApiError,
    models::user::{NewUser, UpdateProfile, User},
    password, validation,
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a store-level unique violation onto the conflicting field.
///
/// The unique constraints are the source of truth for duplicate detection; a
/// pre-check would race against concurrent registrations, so the conflict is
/// read back from the constraint name instead.
fn map_unique_violation(err: sqlx::Error) -> ApiError {
    let constraint = err
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint())
        .map(str::to_owned);

    match constraint.as_deref() {
        Some("users_username_key") => ApiError::DuplicateUsername,
        Some("users_email_key") => ApiError::DuplicateEmail,
        _ => ApiError::Database(err),
    }
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user
    ///
    /// Field shapes are validated before the write; uniqueness is left to the
    /// store and surfaced as `DuplicateUsername` / `DuplicateEmail`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, ApiError> {
        validation::validate_username(&new_user.username).map_err(ApiError::BadRequest)?;
        validation::validate_email(&new_user.email).map_err(ApiError::BadRequest)?;
        validation::validate_password(&new_user.password).map_err(ApiError::BadRequest)?;

        info!("Creating new user: {}", new_user.username);

        let password_hash = password::hash_password(&new_user.password)?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user_from_row(&row))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Check a user's credentials
    ///
    /// Unknown email and wrong password both fail with `InvalidCredentials`;
    /// the two cases must stay indistinguishable to callers.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Update username and/or email
    pub async fn update_profile(
        &self,
        id: i64,
        update: &UpdateProfile,
    ) -> Result<User, ApiError> {
        if update.username.is_none() && update.email.is_none() {
            return Err(ApiError::NoFieldsProvided);
        }

        if let Some(username) = &update.username {
            validation::validate_username(username).map_err(ApiError::BadRequest)?;
        }
        if let Some(email) = &update.email {
            validation::validate_email(email).map_err(ApiError::BadRequest)?;
        }

        info!("Updating profile for user {}", id);

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET updated_at = now()");
        if let Some(username) = &update.username {
            builder.push(", username = ");
            builder.push_bind(username.clone());
        }
        if let Some(email) = &update.email {
            builder.push(", email = ");
            builder.push_bind(email.clone());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING id, username, email, password_hash, created_at, updated_at");

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?
            .ok_or(ApiError::NotFound("User"))?;

        Ok(user_from_row(&row))
    }

    /// Change a user's password after verifying the current one
    pub async fn change_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let user = self.find_by_id(id).await?.ok_or(ApiError::NotFound("User"))?;

        if !password::verify_password(current_password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        if validation::validate_password(new_password).is_err() {
            return Err(ApiError::WeakPassword);
        }

        let password_hash = password::hash_password(new_password)?;

        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, updated_at = now()
            WHERE id = $2
            "#,
        )
        .bind(&password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        info!("Password changed for user {}", id);
        Ok(())
    }

    /// Delete a user account
    ///
    /// Owned catalog items are removed by the `movies.user_id` cascade.
    pub async fn delete_account(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("User"));
        }

        info!("Deleted user account {}", id);
        Ok(())
    }
}
