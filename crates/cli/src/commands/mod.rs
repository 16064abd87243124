//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;

use tradepost_storefront::db;

/// Connect to the database named by `TRADEPOST_DATABASE_URL`.
///
/// Loads `.env` first; a missing database file is created.
pub async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TRADEPOST_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "TRADEPOST_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;
    Ok(pool)
}
