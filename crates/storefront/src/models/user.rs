//! User domain types.

use chrono::{DateTime, Utc};

use tradepost_core::Email;

/// A storefront user (domain type).
///
/// Deliberately carries no password material: hashes live only in the
/// repository layer, and verification goes through the auth service.
/// There is no readable password anywhere in the system.
#[derive(Debug, Clone)]
pub struct User {
    /// User's email address (the primary key).
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated (e.g. password change).
    pub updated_at: DateTime<Utc>,
}
