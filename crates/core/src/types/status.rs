//! Listing lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a product listing.
///
/// A listing is active until its removal timestamp is stamped; removal is
/// terminal - there is no reactivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Active,
    Removed,
}

impl ListingStatus {
    /// Derive the status from the presence of a removal timestamp.
    #[must_use]
    pub const fn from_removed_at<T>(removed_at: Option<&T>) -> Self {
        match removed_at {
            None => Self::Active,
            Some(_) => Self::Removed,
        }
    }

    /// Whether the listing is visible in the store.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}
