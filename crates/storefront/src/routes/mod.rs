//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Home page
//! GET  /home                            - Home page (alias)
//!
//! # Store (requires auth)
//! GET  /store                           - Top-level store page
//! GET  /store/{category}                - Store filtered to a category
//!
//! # Auth
//! GET  /register                        - Registration page
//! POST /register                        - Registration action
//! GET  /login                           - Login page
//! POST /login                           - Login action
//! GET  /logout                          - Logout action
//!
//! # Account (requires auth; {email} must match the session identity)
//! GET  /info/{email}                    - Account info page
//! GET  /change-password/{email}         - Change password page
//! POST /change-password/{email}         - Change password action
//!
//! # Listings (requires auth + seller record)
//! GET  /manage-product-listing/{email}  - Listing management page
//! POST /manage-product-listing/{email}  - Create a listing
//! GET  /remove/{list_id}/{email}        - Remove a listing
//! POST /remove/{list_id}/{email}        - Remove a listing
//! ```

pub mod account;
pub mod auth;
pub mod home;
pub mod listings;
pub mod store;

use axum::{Router, routing::get};
use serde::Deserialize;

use crate::models::ProductListing;
use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Listing display data for templates: everything pre-formatted.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub id: String,
    pub title: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub quantity: i64,
    pub seller_email: String,
    pub started_at: String,
    pub removed_at: Option<String>,
}

impl ListingView {
    /// Format a domain listing for display.
    #[must_use]
    pub fn from_listing(listing: &ProductListing) -> Self {
        Self {
            id: listing.id.to_string(),
            title: listing.title.clone(),
            name: listing.name.clone(),
            description: listing.description.clone(),
            category: listing.category.clone(),
            price: listing.price.to_string(),
            quantity: listing.quantity,
            seller_email: listing.seller_email.to_string(),
            started_at: listing.started_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            removed_at: listing
                .removed_at
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
        }
    }
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page, with /home as an alias
        .route("/", get(home::home))
        .route("/home", get(home::home))
        // Store browsing
        .route("/store", get(store::index))
        .route("/store/{category}", get(store::category))
        // Auth
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Account
        .route("/info/{email}", get(account::info))
        .route(
            "/change-password/{email}",
            get(account::change_password_page).post(account::change_password),
        )
        // Listing management
        .route(
            "/manage-product-listing/{email}",
            get(listings::manage_page).post(listings::create),
        )
        .route(
            "/remove/{list_id}/{email}",
            get(listings::remove).post(listings::remove),
        )
}
