//! Product listing domain types.

use chrono::{DateTime, Utc};

use tradepost_core::{Email, ListingId, ListingStatus, Price};

/// A product listing with its active/removed lifecycle.
#[derive(Debug, Clone)]
pub struct ProductListing {
    /// Unique listing ID, allocated from `[ListingId::MIN, ListingId::MAX]`.
    pub id: ListingId,
    /// Seller who owns this listing.
    pub seller_email: Email,
    /// Category name the listing is filed under.
    pub category: String,
    /// Listing headline shown in the store.
    pub title: String,
    /// Product name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Asking price.
    pub price: Price,
    /// Units offered.
    pub quantity: i64,
    /// When the listing was created.
    pub started_at: DateTime<Utc>,
    /// When the listing was removed; `None` while active. Removal is
    /// terminal.
    pub removed_at: Option<DateTime<Utc>>,
}

impl ProductListing {
    /// Lifecycle status derived from the removal timestamp.
    #[must_use]
    pub const fn status(&self) -> ListingStatus {
        ListingStatus::from_removed_at(self.removed_at.as_ref())
    }
}

/// Input for creating a listing (everything except the allocated ID and
/// timestamps).
#[derive(Debug, Clone)]
pub struct NewListing {
    pub category: String,
    pub title: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub quantity: i64,
}

/// A seller's listings partitioned by lifecycle state.
///
/// The partition is disjoint and exhaustive: every listing the seller
/// owns appears in exactly one bucket.
#[derive(Debug, Default)]
pub struct SellerListings {
    pub active: Vec<ProductListing>,
    pub removed: Vec<ProductListing>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tradepost_core::Price;

    fn listing(removed_at: Option<DateTime<Utc>>) -> ProductListing {
        ProductListing {
            id: ListingId::new(1),
            seller_email: Email::parse("s@x.com").unwrap(),
            category: "Books".to_string(),
            title: "T".to_string(),
            name: "N".to_string(),
            description: "D".to_string(),
            price: Price::parse("9.99").unwrap(),
            quantity: 3,
            started_at: Utc::now(),
            removed_at,
        }
    }

    #[test]
    fn test_status_active_without_removal_timestamp() {
        assert!(listing(None).status().is_active());
    }

    #[test]
    fn test_status_removed_with_removal_timestamp() {
        assert!(!listing(Some(Utc::now())).status().is_active());
    }
}
