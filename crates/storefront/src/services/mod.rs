//! Business-logic services for the storefront.
//!
//! - [`auth`] - registration, login, password change
//! - [`listings`] - the listing manager: ID allocation, soft-delete,
//!   seller partition
//! - [`catalog`] - read-only store browsing

pub mod auth;
pub mod catalog;
pub mod listings;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use listings::ListingService;
