//! Database operations for the storefront's embedded SQLite store.
//!
//! # Tables
//!
//! - `users` - Credential records (email + Argon2id hash)
//! - `categories` - One-level hierarchy rooted at the sentinel `Root`
//! - `product_listings` - Listings with an active/removed lifecycle
//! - `buyers` / `sellers` / `local_vendors` - Identity directory
//! - `addresses` / `zipcode_info` / `credit_cards` - Denormalized
//!   location and payment data, joined at the application level
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/`, are embedded via
//! `sqlx::migrate!`, and run at process start (the schema is created on
//! first run) or explicitly via:
//! ```bash
//! cargo run -p tradepost-cli -- migrate
//! ```

pub mod catalog;
pub mod identity;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use identity::IdentityRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email or listing ID).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique-constraint
    /// violation, passing everything else through as `Database`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_msg.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if missing; the schema itself comes from
/// [`run_migrations`].
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the file cannot be
/// opened.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply embedded migrations, creating the schema if absent.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
