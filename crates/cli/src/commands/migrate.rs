//! Database migration command.
//!
//! The storefront binary also applies migrations at startup; this
//! command exists for provisioning a database ahead of time and for
//! running migrations in deploy scripts.

use tracing::info;

use tradepost_storefront::db;

/// Create the database if missing and apply pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    info!("Connected to database");

    info!("Running migrations...");
    db::run_migrations(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
