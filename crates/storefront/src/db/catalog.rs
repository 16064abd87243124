//! Catalog repository: categories and product listings.
//!
//! Listings are soft-deleted only - `removed_at` is stamped and rows are
//! never physically deleted. The `list_id` primary key doubles as the
//! collision detector for the random ID allocator: the INSERT itself is
//! the uniqueness check, so two concurrent creates cannot both win the
//! same ID.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tradepost_core::{Email, ListingId, Price};

use super::RepositoryError;
use crate::models::{NewListing, ProductListing};

/// The sentinel category name meaning "top level, unfiltered".
pub const ROOT_CATEGORY: &str = "Root";

/// A category row: a name and its parent in the one-level hierarchy.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub name: String,
    pub parent: String,
}

/// Database row for the `product_listings` table.
#[derive(sqlx::FromRow)]
struct ListingRow {
    list_id: i64,
    seller_email: String,
    category: String,
    title: String,
    name: String,
    description: String,
    price: String,
    quantity: i64,
    started_at: DateTime<Utc>,
    removed_at: Option<DateTime<Utc>>,
}

impl ListingRow {
    fn into_domain(self) -> Result<ProductListing, RepositoryError> {
        let seller_email = Email::parse(&self.seller_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid seller email in database: {e}"))
        })?;
        let price = Price::parse(&self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price '{}' for listing {}: {e}",
                self.price, self.list_id
            ))
        })?;

        Ok(ProductListing {
            id: ListingId::new(self.list_id),
            seller_email,
            category: self.category,
            title: self.title,
            name: self.name,
            description: self.description,
            price,
            quantity: self.quantity,
            started_at: self.started_at,
            removed_at: self.removed_at,
        })
    }
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Whether a category row with this name exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Categories whose parent equals the given name - one hierarchy
    /// level at a time, no recursive descent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn children_of(&self, parent: &str) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<Category> = sqlx::query_as(
            r"
            SELECT name, parent
            FROM categories
            WHERE parent = ?1
            ORDER BY name ASC
            ",
        )
        .bind(parent)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Every category row, ordered by name. Backs the category picker on
    /// the listing form.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<Category> =
            sqlx::query_as("SELECT name, parent FROM categories ORDER BY name ASC")
                .fetch_all(self.pool)
                .await?;
        Ok(rows)
    }

    /// Insert a category row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    pub async fn insert_category(&self, name: &str, parent: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO categories (name, parent) VALUES (?1, ?2)")
            .bind(name)
            .bind(parent)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "category already exists"))?;
        Ok(())
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Try to insert a listing under a candidate ID.
    ///
    /// The allocator calls this in a retry loop: `Conflict` means the
    /// candidate collided with a live row and a fresh draw is needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on an ID collision.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn try_insert_listing(
        &self,
        id: ListingId,
        seller: &Email,
        listing: &NewListing,
        started_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_listings
                (list_id, seller_email, category, title, name, description,
                 price, quantity, started_at, removed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL)
            ",
        )
        .bind(id.as_i64())
        .bind(seller.as_str())
        .bind(&listing.category)
        .bind(&listing.title)
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(listing.price.storage_form())
        .bind(listing.quantity)
        .bind(started_at)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "listing id already allocated"))?;
        Ok(())
    }

    /// Get a listing by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` for invalid stored data.
    pub async fn get_listing(
        &self,
        id: ListingId,
    ) -> Result<Option<ProductListing>, RepositoryError> {
        let row: Option<ListingRow> = sqlx::query_as(
            r"
            SELECT list_id, seller_email, category, title, name, description,
                   price, quantity, started_at, removed_at
            FROM product_listings
            WHERE list_id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(ListingRow::into_domain).transpose()
    }

    /// Stamp the removal timestamp on an active listing.
    ///
    /// The `removed_at IS NULL` guard makes removal terminal: an
    /// already-removed listing keeps its original timestamp and this
    /// returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_removed(
        &self,
        id: ListingId,
        removed_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product_listings
            SET removed_at = ?1
            WHERE list_id = ?2 AND removed_at IS NULL
            ",
        )
        .bind(removed_at)
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All of a seller's listings, active and removed, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` for invalid stored data.
    pub async fn listings_by_seller(
        &self,
        seller: &Email,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        let rows: Vec<ListingRow> = sqlx::query_as(
            r"
            SELECT list_id, seller_email, category, title, name, description,
                   price, quantity, started_at, removed_at
            FROM product_listings
            WHERE seller_email = ?1
            ORDER BY rowid ASC
            ",
        )
        .bind(seller.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ListingRow::into_domain).collect()
    }

    /// Active listings, optionally filtered by category.
    ///
    /// `category == "Root"` is the sentinel for "top level": only the
    /// active-status filter applies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` for invalid stored data.
    pub async fn active_listings(
        &self,
        category: &str,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        let rows: Vec<ListingRow> = if category == ROOT_CATEGORY {
            sqlx::query_as(
                r"
                SELECT list_id, seller_email, category, title, name, description,
                       price, quantity, started_at, removed_at
                FROM product_listings
                WHERE removed_at IS NULL
                ORDER BY rowid ASC
                ",
            )
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as(
                r"
                SELECT list_id, seller_email, category, title, name, description,
                       price, quantity, started_at, removed_at
                FROM product_listings
                WHERE category = ?1 AND removed_at IS NULL
                ORDER BY rowid ASC
                ",
            )
            .bind(category)
            .fetch_all(self.pool)
            .await?
        };

        rows.into_iter().map(ListingRow::into_domain).collect()
    }

    /// Number of allocated listing IDs (live rows, active or removed).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn listing_count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product_listings")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
