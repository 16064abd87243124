//! Domain models for the storefront.
//!
//! These types represent validated domain objects, separate from the
//! database row types that the repositories map out of.

pub mod listing;
pub mod profile;
pub mod session;
pub mod user;

pub use listing::{NewListing, ProductListing, SellerListings};
pub use profile::{
    Address, Buyer, BuyerProfile, CreditCard, LocalVendor, ResolvedAddress, Seller, ZipCodeInfo,
};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
