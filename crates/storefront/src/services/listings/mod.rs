//! The listing manager: creation, soft-delete, and seller partition.
//!
//! Listing IDs are allocated by rejection sampling over
//! `[ListingId::MIN, ListingId::MAX]`. Collisions are detected by the
//! primary-key constraint on INSERT, so allocation and persistence are a
//! single atomic step - there is no load-then-write window for two
//! concurrent creates to win the same ID. The loop is bounded: after
//! [`MAX_ID_ATTEMPTS`] failed draws (or when the space is already full)
//! creation fails with [`ListingError::IdSpaceExhausted`] instead of
//! spinning forever.

mod error;

pub use error::ListingError;

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;

use tradepost_core::{Email, ListingId};

use crate::db::RepositoryError;
use crate::db::catalog::CatalogRepository;
use crate::models::{NewListing, ProductListing, SellerListings};

/// Random draws attempted before giving up on allocation.
///
/// With a uniform draw over 6000 slots, 64 consecutive collisions means
/// the space is effectively full; failing fast beats spinning.
pub const MAX_ID_ATTEMPTS: u32 = 64;

/// The listing manager.
pub struct ListingService<'a> {
    catalog: CatalogRepository<'a>,
}

impl<'a> ListingService<'a> {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
        }
    }

    /// Create a listing for a seller, allocating a fresh listing ID.
    ///
    /// The creation timestamp is stamped with the current UTC wall-clock
    /// time; the listing starts active (no removal timestamp).
    ///
    /// # Errors
    ///
    /// Returns `ListingError::InvalidCategory` if the category has no row.
    /// Returns `ListingError::InvalidInput` for a non-positive quantity.
    /// Returns `ListingError::IdSpaceExhausted` if no free ID can be found.
    pub async fn create_listing(
        &self,
        seller: &Email,
        listing: &NewListing,
    ) -> Result<ListingId, ListingError> {
        if listing.quantity < 1 {
            return Err(ListingError::InvalidInput(
                "quantity must be at least 1".to_owned(),
            ));
        }

        if !self.catalog.category_exists(&listing.category).await? {
            return Err(ListingError::InvalidCategory(listing.category.clone()));
        }

        // A full space cannot allocate no matter how many draws we make
        if self.catalog.listing_count().await? >= ListingId::SPACE {
            return Err(ListingError::IdSpaceExhausted);
        }

        let started_at = Utc::now();

        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = ListingId::new(rand::rng().random_range(ListingId::MIN..=ListingId::MAX));

            match self
                .catalog
                .try_insert_listing(candidate, seller, listing, started_at)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        listing_id = %candidate,
                        seller = %seller,
                        category = %listing.category,
                        "listing created"
                    );
                    return Ok(candidate);
                }
                // Collision with a live row: draw again
                Err(RepositoryError::Conflict(_)) => {}
                Err(other) => return Err(ListingError::Repository(other)),
            }
        }

        tracing::warn!(
            attempts = MAX_ID_ATTEMPTS,
            "listing id allocation exhausted its attempt budget"
        );
        Err(ListingError::IdSpaceExhausted)
    }

    /// Soft-delete a listing by stamping its removal timestamp.
    ///
    /// Removing an already-removed listing is a no-op that preserves the
    /// original timestamp; removal is terminal either way. A nonexistent
    /// ID is an error rather than a silent success.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::NotFound` if no listing has this ID.
    pub async fn remove_listing(&self, id: ListingId) -> Result<(), ListingError> {
        let stamped = self.catalog.mark_removed(id, Utc::now()).await?;
        if stamped {
            tracing::info!(listing_id = %id, "listing removed");
            return Ok(());
        }

        // Nothing was stamped: either already removed (fine) or missing
        match self.catalog.get_listing(id).await? {
            Some(_) => Ok(()),
            None => Err(ListingError::NotFound(id)),
        }
    }

    /// Look up a listing by ID, removed or not.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::Repository` if the lookup fails.
    pub async fn get_listing(
        &self,
        id: ListingId,
    ) -> Result<Option<ProductListing>, ListingError> {
        let listing = self.catalog.get_listing(id).await?;
        Ok(listing)
    }

    /// A seller's listings split into active and removed buckets.
    ///
    /// Single scan, bucketed on removal-timestamp presence; disjoint and
    /// exhaustive. Ordering within a bucket is storage order.
    ///
    /// # Errors
    ///
    /// Returns `ListingError::Repository` if the scan fails.
    pub async fn partition_by_seller(
        &self,
        seller: &Email,
    ) -> Result<SellerListings, ListingError> {
        let all = self.catalog.listings_by_seller(seller).await?;

        let mut partition = SellerListings::default();
        for listing in all {
            if listing.removed_at.is_none() {
                partition.active.push(listing);
            } else {
                partition.removed.push(listing);
            }
        }

        Ok(partition)
    }
}
