//! The catalog browser: read-only store queries.
//!
//! The thin read side of the catalog - active listings by category, and
//! one level of child categories for the filter sidebar. `"Root"` is a
//! sentinel meaning "top level, unfiltered by category".

use sqlx::SqlitePool;

use crate::db::RepositoryError;
use crate::db::catalog::{Category, CatalogRepository, ROOT_CATEGORY};
use crate::models::ProductListing;

/// What the store page shows for a category: its child categories (as
/// filter links) and the active listings under it.
#[derive(Debug)]
pub struct StoreView {
    pub child_categories: Vec<Category>,
    pub listings: Vec<ProductListing>,
}

/// Read-only catalog browsing.
pub struct CatalogService<'a> {
    catalog: CatalogRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
        }
    }

    /// Active listings, filtered by category unless it is the `Root`
    /// sentinel. Removed listings never appear.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn active_listings(
        &self,
        category: &str,
    ) -> Result<Vec<ProductListing>, RepositoryError> {
        self.catalog.active_listings(category).await
    }

    /// Categories one level below the given one; no recursive descent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn child_categories(&self, parent: &str) -> Result<Vec<Category>, RepositoryError> {
        self.catalog.children_of(parent).await
    }

    /// Whether a category row with this name exists. The root sentinel
    /// has no row and reports `false` here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn category_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        self.catalog.category_exists(name).await
    }

    /// Every category, for form pickers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn all_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        self.catalog.all_categories().await
    }

    /// Everything the store page needs for one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn browse(&self, category: &str) -> Result<StoreView, RepositoryError> {
        let child_categories = self.child_categories(category).await?;
        let listings = self.active_listings(category).await?;
        Ok(StoreView {
            child_categories,
            listings,
        })
    }

    /// Whether the given name is the top-level sentinel.
    #[must_use]
    pub fn is_root(category: &str) -> bool {
        category == ROOT_CATEGORY
    }
}
