//! User repository for database operations.
//!
//! Queries use sqlx's runtime API with explicit row structs; rows are
//! converted to domain types at the boundary, with invalid stored data
//! surfacing as `RepositoryError::DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tradepost_core::Email;

use super::RepositoryError;
use crate::models::User;

/// Database row for the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(User {
            email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT email, created_at, updated_at
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Create a new user with email and password hash.
    ///
    /// Uniqueness is enforced by the primary key; a concurrent duplicate
    /// insert loses with `Conflict` rather than silently overwriting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already exists"))?;

        Ok(User {
            email: email.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<(String, String, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r"
            SELECT email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some((stored_email, password_hash, created_at, updated_at)) = row else {
            return Ok(None);
        };

        let email = Email::parse(&stored_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Some((
            User {
                email,
                created_at,
                updated_at,
            },
            password_hash,
        )))
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password_hash(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = ?1, updated_at = ?2
            WHERE email = ?3
            ",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
