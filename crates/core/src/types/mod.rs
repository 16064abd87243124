//! Core types for Tradepost.
//!
//! Type-safe wrappers for the domain concepts shared by the storefront
//! and the CLI.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{AddressId, ListingId, ZipCode};
pub use price::{Price, PriceError};
pub use status::ListingStatus;
