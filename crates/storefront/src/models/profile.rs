//! Identity directory domain types.
//!
//! Profile records are keyed by email and cross-referenced to address
//! records by identifier. There is no cascade or storage-level
//! consistency between them; the repository resolves the references and
//! absent rows surface as `None` rather than a fault.

use tradepost_core::{AddressId, Email, ZipCode};

/// A buyer profile.
#[derive(Debug, Clone)]
pub struct Buyer {
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub home_address_id: Option<AddressId>,
    pub billing_address_id: Option<AddressId>,
}

/// A seller profile. Presence of this record gates the listing-management
/// surface.
#[derive(Debug, Clone)]
pub struct Seller {
    pub email: Email,
    pub routing_number: Option<String>,
    pub account_number: Option<i64>,
    pub balance: Option<i64>,
}

/// A local-vendor profile.
#[derive(Debug, Clone)]
pub struct LocalVendor {
    pub email: Email,
    pub business_name: Option<String>,
    pub business_address_id: Option<AddressId>,
    pub business_phone: Option<String>,
}

/// A street address record.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub zipcode: Option<ZipCode>,
    pub street_num: i64,
    pub street_name: String,
}

/// City/state data for a zip code.
#[derive(Debug, Clone)]
pub struct ZipCodeInfo {
    pub zipcode: ZipCode,
    pub city: String,
    pub state_id: String,
}

/// A stored credit card.
#[derive(Debug, Clone)]
pub struct CreditCard {
    pub cc_num: String,
    pub card_type: String,
    pub expire_month: i64,
    pub expire_year: i64,
}

impl CreditCard {
    /// Masked form for display: last four digits only.
    #[must_use]
    pub fn masked_number(&self) -> String {
        let last4: String = self
            .cc_num
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("**** {last4}")
    }
}

/// An address resolved to its city/state, for display.
#[derive(Debug, Clone)]
pub struct ResolvedAddress {
    pub address: Address,
    pub zip_info: Option<ZipCodeInfo>,
}

/// A buyer's full profile as shown on the info page: the buyer record
/// with both addresses resolved and any stored cards.
#[derive(Debug, Clone, Default)]
pub struct BuyerProfile {
    pub buyer: Option<Buyer>,
    pub home_address: Option<ResolvedAddress>,
    pub billing_address: Option<ResolvedAddress>,
    pub credit_cards: Vec<CreditCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_number() {
        let card = CreditCard {
            cc_num: "4111111111111111".to_string(),
            card_type: "Visa".to_string(),
            expire_month: 12,
            expire_year: 2030,
        };
        assert_eq!(card.masked_number(), "**** 1111");
    }

    #[test]
    fn test_masked_number_short() {
        let card = CreditCard {
            cc_num: "123".to_string(),
            card_type: "Test".to_string(),
            expire_month: 1,
            expire_year: 2030,
        };
        assert_eq!(card.masked_number(), "**** 123");
    }
}
