//! Database seeding commands.
//!
//! `categories` loads the category tree from a YAML file; `demo` inserts
//! a couple of accounts and listings so a fresh local database has
//! something to show.

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use tradepost_core::Price;
use tradepost_storefront::db::RepositoryError;
use tradepost_storefront::db::catalog::{CatalogRepository, ROOT_CATEGORY};
use tradepost_storefront::models::NewListing;
use tradepost_storefront::services::{AuthService, ListingService};
use tradepost_storefront::services::auth::AuthError;

/// One category in the YAML seed file.
#[derive(Debug, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    /// Parent category name; top-level categories omit it.
    #[serde(default)]
    pub parent: Option<String>,
}

/// The YAML seed file: a flat list of categories.
#[derive(Debug, Deserialize)]
pub struct CategoriesConfig {
    pub categories: Vec<CategoryEntry>,
}

/// Validate the category config before touching the database.
///
/// Every parent must be the root sentinel or another entry in the file,
/// and names must be unique.
fn validate_categories(config: &CategoriesConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for entry in &config.categories {
        if entry.name == ROOT_CATEGORY {
            errors.push(format!("'{ROOT_CATEGORY}' is reserved and cannot be seeded"));
        }
        if !seen.insert(entry.name.as_str()) {
            errors.push(format!("duplicate category '{}'", entry.name));
        }
    }

    for entry in &config.categories {
        if let Some(parent) = &entry.parent
            && parent != ROOT_CATEGORY
            && !seen.contains(parent.as_str())
        {
            errors.push(format!(
                "category '{}' has unknown parent '{parent}'",
                entry.name
            ));
        }
    }

    errors
}

/// Seed the category tree from a YAML file.
///
/// Already-present categories are skipped, so re-running against the
/// same file is harmless.
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or if a database
/// operation fails.
pub async fn categories(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = std::path::Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading categories from file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let config: CategoriesConfig = serde_yaml::from_str(&content)?;

    info!(categories = config.categories.len(), "Parsed configuration");

    let errors = validate_categories(&config);
    if !errors.is_empty() {
        error!("Configuration validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let pool = super::connect().await?;
    info!("Connected to database");

    let catalog = CatalogRepository::new(&pool);
    let mut inserted = 0u32;
    let mut skipped = 0u32;

    for entry in &config.categories {
        let parent = entry.parent.as_deref().unwrap_or(ROOT_CATEGORY);
        match catalog.insert_category(&entry.name, parent).await {
            Ok(()) => inserted += 1,
            Err(RepositoryError::Conflict(_)) => skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    info!("  Categories inserted: {inserted}");
    info!("  Categories skipped (already exist): {skipped}");
    Ok(())
}

const DEMO_SELLER: &str = "seller@tradepost.test";
const DEMO_BUYER: &str = "buyer@tradepost.test";
const DEMO_PASSWORD: &str = "demo-password-1";

/// Seed demo accounts and listings for local development.
///
/// Creates a seller and a buyer account (password `demo-password-1`),
/// a small category tree if none exists, and a few active listings.
///
/// # Errors
///
/// Returns an error if a database operation fails.
pub async fn demo() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    info!("Connected to database");

    seed_demo_categories(&pool).await?;
    seed_demo_accounts(&pool).await?;
    seed_demo_directory(&pool).await?;
    seed_demo_listings(&pool).await?;

    info!("Demo data seeded!");
    info!("  Seller: {DEMO_SELLER} / {DEMO_PASSWORD}");
    info!("  Buyer:  {DEMO_BUYER} / {DEMO_PASSWORD}");
    Ok(())
}

async fn seed_demo_categories(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CatalogRepository::new(pool);

    let tree = [
        ("Books", ROOT_CATEGORY),
        ("Electronics", ROOT_CATEGORY),
        ("Home", ROOT_CATEGORY),
        ("Fiction", "Books"),
        ("Textbooks", "Books"),
        ("Audio", "Electronics"),
    ];

    for (name, parent) in tree {
        match catalog.insert_category(name, parent).await {
            Ok(()) | Err(RepositoryError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

async fn seed_demo_accounts(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let auth = AuthService::new(pool);

    for email in [DEMO_SELLER, DEMO_BUYER] {
        match auth.register_with_password(email, DEMO_PASSWORD).await {
            Ok(_) => info!(email, "Account created"),
            Err(AuthError::UserAlreadyExists) => warn!(email, "Account already exists"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Directory rows for the demo accounts: a seller record (gating the
/// management pages), a buyer profile with a resolved address, and one
/// saved card.
async fn seed_demo_directory(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::query(
        "INSERT OR IGNORE INTO sellers (email, routing_number, account_number, balance)
         VALUES (?1, '021000021', 12345678, 0)",
    )
    .bind(DEMO_SELLER)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO zipcode_info (zipcode, city, state_id)
         VALUES (30332, 'Atlanta', 'GA')",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO addresses (id, zipcode, street_num, street_name)
         VALUES ('demo-home', 30332, 801, 'Ferst Drive')",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO buyers
           (email, first_name, last_name, gender, age, home_address_id, billing_address_id)
         VALUES (?1, 'Demo', 'Buyer', NULL, 30, 'demo-home', 'demo-home')",
    )
    .bind(DEMO_BUYER)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO credit_cards
           (cc_num, card_code, expire_month, expire_year, card_type, owner_email)
         VALUES ('4111111111111111', 123, 12, 2030, 'Visa', ?1)",
    )
    .bind(DEMO_BUYER)
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_demo_listings(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let seller = tradepost_core::Email::parse(DEMO_SELLER)?;

    let listings = ListingService::new(pool);

    // Idempotence check: skip if the seller already has listings
    let existing = listings.partition_by_seller(&seller).await?;
    if !existing.active.is_empty() || !existing.removed.is_empty() {
        warn!("Seller already has listings, skipping");
        return Ok(());
    }

    let demo_listings = [
        ("Fiction", "Paperback mystery", "The Long Harbor", "A detective novel in good condition.", "8.50", 2),
        ("Textbooks", "Calculus textbook", "Calculus: Early Transcendentals", "Eighth edition, lightly annotated.", "45.00", 1),
        ("Audio", "Bluetooth speaker", "SoundBrick Mini", "Small portable speaker, barely used.", "19.99", 3),
    ];

    for (category, title, name, description, price, quantity) in demo_listings {
        let id = listings
            .create_listing(
                &seller,
                &NewListing {
                    category: category.to_string(),
                    title: title.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    price: Price::parse(price)?,
                    quantity,
                },
            )
            .await?;
        info!(%id, title, "Listing created");
    }

    Ok(())
}
