//! Newtype IDs for type-safe entity references.

use serde::{Deserialize, Serialize};

/// A product-listing identifier.
///
/// Listing IDs are allocated by rejection sampling from the fixed range
/// `[MIN, MAX]`; the range is part of the public contract of the listing
/// manager, so it lives here rather than in the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(i64);

impl ListingId {
    /// Smallest allocatable listing ID.
    pub const MIN: i64 = 1;
    /// Largest allocatable listing ID.
    pub const MAX: i64 = 6000;
    /// Total number of allocatable IDs.
    pub const SPACE: i64 = Self::MAX - Self::MIN + 1;

    /// Create a new listing ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this ID falls inside the allocatable range.
    #[must_use]
    pub const fn in_range(&self) -> bool {
        self.0 >= Self::MIN && self.0 <= Self::MAX
    }
}

impl core::fmt::Display for ListingId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ListingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ListingId> for i64 {
    fn from(id: ListingId) -> Self {
        id.0
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for ListingId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ListingId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <i64 as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ListingId {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

/// An address record identifier.
///
/// The address table keys on opaque 32-character strings inherited from
/// the upstream data set, so this wraps a `String` rather than an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// Create a new address ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AddressId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AddressId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A US zip code, stored numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZipCode(i64);

impl ZipCode {
    /// Create a new zip code.
    #[must_use]
    pub const fn new(zip: i64) -> Self {
        Self(zip)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ZipCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Leading zeros matter for north-east zip codes
        write!(f, "{:05}", self.0)
    }
}

impl From<i64> for ZipCode {
    fn from(zip: i64) -> Self {
        Self(zip)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_id_range() {
        assert!(ListingId::new(1).in_range());
        assert!(ListingId::new(6000).in_range());
        assert!(!ListingId::new(0).in_range());
        assert!(!ListingId::new(6001).in_range());
    }

    #[test]
    fn test_listing_id_space() {
        assert_eq!(ListingId::SPACE, 6000);
    }

    #[test]
    fn test_listing_id_display() {
        assert_eq!(ListingId::new(42).to_string(), "42");
    }

    #[test]
    fn test_listing_id_serde_transparent() {
        let id = ListingId::new(17);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "17");
        let back: ListingId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_zip_code_display_pads() {
        assert_eq!(ZipCode::new(2139).to_string(), "02139");
        assert_eq!(ZipCode::new(90210).to_string(), "90210");
    }

    #[test]
    fn test_address_id_roundtrip() {
        let id = AddressId::new("a1b2c3");
        assert_eq!(id.as_str(), "a1b2c3");
        assert_eq!(id.to_string(), "a1b2c3");
    }
}
