//! Identity directory repository: buyers, sellers, vendors, addresses.
//!
//! The original data set has no referential integrity between profile
//! and address rows, so every cross-reference here resolves to `Option`
//! - a dangling address ID renders as a missing section on the profile
//! page, never a fault.

use sqlx::SqlitePool;

use tradepost_core::{AddressId, Email, ZipCode};

use super::RepositoryError;
use crate::models::{
    Address, Buyer, BuyerProfile, CreditCard, LocalVendor, ResolvedAddress, Seller, ZipCodeInfo,
};

#[derive(sqlx::FromRow)]
struct BuyerRow {
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    age: Option<i64>,
    home_address_id: Option<String>,
    billing_address_id: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SellerRow {
    email: String,
    routing_number: Option<String>,
    account_number: Option<i64>,
    balance: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct VendorRow {
    email: String,
    business_name: Option<String>,
    business_address_id: Option<String>,
    business_phone: Option<String>,
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: String,
    zipcode: Option<i64>,
    street_num: i64,
    street_name: String,
}

#[derive(sqlx::FromRow)]
struct CreditCardRow {
    cc_num: String,
    card_type: String,
    expire_month: i64,
    expire_year: i64,
}

fn parse_email(s: &str) -> Result<Email, RepositoryError> {
    Email::parse(s)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

/// Repository for identity-directory lookups.
pub struct IdentityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> IdentityRepository<'a> {
    /// Create a new identity repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a buyer profile by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_buyer(&self, email: &Email) -> Result<Option<Buyer>, RepositoryError> {
        let row: Option<BuyerRow> = sqlx::query_as(
            r"
            SELECT email, first_name, last_name, gender, age,
                   home_address_id, billing_address_id
            FROM buyers
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(Buyer {
                email: parse_email(&r.email)?,
                first_name: r.first_name,
                last_name: r.last_name,
                gender: r.gender,
                age: r.age,
                home_address_id: r.home_address_id.map(AddressId::new),
                billing_address_id: r.billing_address_id.map(AddressId::new),
            })
        })
        .transpose()
    }

    /// Get a seller profile by email.
    ///
    /// `None` means the user is not an authorized seller.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_seller(&self, email: &Email) -> Result<Option<Seller>, RepositoryError> {
        let row: Option<SellerRow> = sqlx::query_as(
            r"
            SELECT email, routing_number, account_number, balance
            FROM sellers
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(Seller {
                email: parse_email(&r.email)?,
                routing_number: r.routing_number,
                account_number: r.account_number,
                balance: r.balance,
            })
        })
        .transpose()
    }

    /// Get a local-vendor profile by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_local_vendor(
        &self,
        email: &Email,
    ) -> Result<Option<LocalVendor>, RepositoryError> {
        let row: Option<VendorRow> = sqlx::query_as(
            r"
            SELECT email, business_name, business_address_id, business_phone
            FROM local_vendors
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(LocalVendor {
                email: parse_email(&r.email)?,
                business_name: r.business_name,
                business_address_id: r.business_address_id.map(AddressId::new),
                business_phone: r.business_phone,
            })
        })
        .transpose()
    }

    /// Get an address record by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_address(&self, id: &AddressId) -> Result<Option<Address>, RepositoryError> {
        let row: Option<AddressRow> = sqlx::query_as(
            r"
            SELECT id, zipcode, street_num, street_name
            FROM addresses
            WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| Address {
            id: AddressId::new(r.id),
            zipcode: r.zipcode.map(ZipCode::new),
            street_num: r.street_num,
            street_name: r.street_name,
        }))
    }

    /// Get city/state data for a zip code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_zip_info(&self, zip: ZipCode) -> Result<Option<ZipCodeInfo>, RepositoryError> {
        let row: Option<(i64, String, String)> = sqlx::query_as(
            r"
            SELECT zipcode, city, state_id
            FROM zipcode_info
            WHERE zipcode = ?1
            ",
        )
        .bind(zip.as_i64())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(zipcode, city, state_id)| ZipCodeInfo {
            zipcode: ZipCode::new(zipcode),
            city,
            state_id,
        }))
    }

    /// Stored cards owned by an email, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credit_cards(
        &self,
        owner: &Email,
    ) -> Result<Vec<CreditCard>, RepositoryError> {
        let rows: Vec<CreditCardRow> = sqlx::query_as(
            r"
            SELECT cc_num, card_type, expire_month, expire_year
            FROM credit_cards
            WHERE owner_email = ?1
            ORDER BY rowid ASC
            ",
        )
        .bind(owner.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CreditCard {
                cc_num: r.cc_num,
                card_type: r.card_type,
                expire_month: r.expire_month,
                expire_year: r.expire_year,
            })
            .collect())
    }

    /// Resolve an optional address reference down to street and
    /// city/state rows, tolerating dangling references at every step.
    async fn resolve_address(
        &self,
        id: Option<&AddressId>,
    ) -> Result<Option<ResolvedAddress>, RepositoryError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let Some(address) = self.get_address(id).await? else {
            return Ok(None);
        };

        let zip_info = match address.zipcode {
            Some(zip) => self.get_zip_info(zip).await?,
            None => None,
        };

        Ok(Some(ResolvedAddress { address, zip_info }))
    }

    /// The full profile shown on the info page: buyer record, both
    /// addresses resolved to city/state, and stored cards.
    ///
    /// Every piece is optional; a user with no buyer record gets an
    /// empty profile, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_buyer_profile(&self, email: &Email) -> Result<BuyerProfile, RepositoryError> {
        let buyer = self.get_buyer(email).await?;

        let (home_address, billing_address) = match &buyer {
            Some(b) => (
                self.resolve_address(b.home_address_id.as_ref()).await?,
                self.resolve_address(b.billing_address_id.as_ref()).await?,
            ),
            None => (None, None),
        };

        let credit_cards = self.get_credit_cards(email).await?;

        Ok(BuyerProfile {
            buyer,
            home_address,
            billing_address,
            credit_cards,
        })
    }
}
