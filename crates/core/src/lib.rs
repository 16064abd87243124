//! Tradepost Core - Shared domain types.
//!
//! This crate provides common types used across all Tradepost components:
//! - `storefront` - The public storefront site
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, listing IDs, prices, and
//!   listing lifecycle status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
