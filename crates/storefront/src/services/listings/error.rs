//! Listing manager error types.

use thiserror::Error;

use tradepost_core::ListingId;

use crate::db::RepositoryError;

/// Errors that can occur during listing operations.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The requested category has no row in the catalog.
    #[error("category '{0}' does not exist")]
    InvalidCategory(String),

    /// Listing input failed validation (quantity, price).
    #[error("invalid listing: {0}")]
    InvalidInput(String),

    /// The bounded allocator ran out of attempts, or every ID in
    /// `[ListingId::MIN, ListingId::MAX]` is already allocated.
    #[error("listing id space exhausted")]
    IdSpaceExhausted,

    /// No listing with this ID exists.
    #[error("listing {0} not found")]
    NotFound(ListingId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
