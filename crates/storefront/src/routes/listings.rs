//! Listing management route handlers.
//!
//! Gated twice: the user must be logged in, and the account must have a
//! seller record. The path email must match the session identity.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tradepost_core::{Email, ListingId, Price};

use crate::db::IdentityRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::RequireAuth;
use crate::models::CurrentUser;
use crate::routes::{ListingView, MessageQuery};
use crate::services::listings::ListingError;
use crate::services::{CatalogService, ListingService};
use crate::state::AppState;

/// Parse a path email and check it against the session identity.
fn authorize_path_email(path_email: &str, current: &CurrentUser) -> Result<Email, Response> {
    match Email::parse(path_email) {
        Ok(email) if email == current.email => Ok(email),
        _ => Err(Redirect::to("/store?error=forbidden").into_response()),
    }
}

/// Check that the account has a seller record.
///
/// Non-sellers are bounced to the store page rather than shown an error
/// page; the management surface simply doesn't exist for them.
async fn require_seller(state: &AppState, email: &Email) -> Result<(), Response> {
    let identity = IdentityRepository::new(state.pool());
    match identity.get_seller(email).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(Redirect::to("/store?error=not_seller").into_response()),
        Err(e) => Err(AppError::Database(e).into_response()),
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// New listing form data.
#[derive(Debug, Deserialize)]
pub struct NewListingForm {
    pub category: String,
    pub title: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub quantity: i64,
}

// =============================================================================
// Templates
// =============================================================================

/// Listing management page template.
#[derive(Template, WebTemplate)]
#[template(path = "listings/manage.html")]
pub struct ManageTemplate {
    pub email: String,
    pub categories: Vec<String>,
    pub active: Vec<ListingView>,
    pub removed: Vec<ListingView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Turn a flash code from the query string into display text.
fn flash_text(code: &str) -> String {
    match code {
        "bad_category" => "That category does not exist.".to_string(),
        "bad_price" => "The price must be a positive amount.".to_string(),
        "bad_quantity" => "The quantity must be at least 1.".to_string(),
        "id_space_exhausted" => {
            "The store cannot take new listings right now. Try again later.".to_string()
        }
        "not_found" => "That listing does not exist.".to_string(),
        "created" => "Listing created.".to_string(),
        "removed" => "Listing removed.".to_string(),
        other => other.replace('_', " "),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the listing management page.
///
/// Shows the seller's listings partitioned into active and removed, and
/// the category picker for creating a new one.
pub async fn manage_page(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(email): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return Ok(redirect),
    };
    if let Err(redirect) = require_seller(&state, &email).await {
        return Ok(redirect);
    }

    let listings = ListingService::new(state.pool());
    let partition = listings.partition_by_seller(&email).await?;

    let catalog = CatalogService::new(state.pool());
    let categories = catalog
        .all_categories()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let template = ManageTemplate {
        email: email.to_string(),
        categories,
        active: partition.active.iter().map(ListingView::from_listing).collect(),
        removed: partition
            .removed
            .iter()
            .map(ListingView::from_listing)
            .collect(),
        error: query.error.as_deref().map(flash_text),
        success: query.success.as_deref().map(flash_text),
    };

    Ok(template.into_response())
}

/// Handle new listing form submission.
///
/// The listing ID is allocated at creation time; on success the page
/// reloads and the new listing appears in the active bucket.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(email): Path<String>,
    Form(form): Form<NewListingForm>,
) -> Response {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return redirect,
    };
    if let Err(redirect) = require_seller(&state, &email).await {
        return redirect;
    }

    let back = format!("/manage-product-listing/{email}");

    let Ok(price) = Price::parse(&form.price) else {
        return Redirect::to(&format!("{back}?error=bad_price")).into_response();
    };

    let new_listing = crate::models::NewListing {
        category: form.category,
        title: form.title,
        name: form.name,
        description: form.description,
        price,
        quantity: form.quantity,
    };

    let listings = ListingService::new(state.pool());
    match listings.create_listing(&email, &new_listing).await {
        Ok(_) => Redirect::to(&format!("{back}?success=created")).into_response(),
        Err(ListingError::InvalidCategory(_)) => {
            Redirect::to(&format!("{back}?error=bad_category")).into_response()
        }
        Err(ListingError::InvalidInput(_)) => {
            Redirect::to(&format!("{back}?error=bad_quantity")).into_response()
        }
        Err(ListingError::IdSpaceExhausted) => {
            Redirect::to(&format!("{back}?error=id_space_exhausted")).into_response()
        }
        Err(e) => AppError::Listing(e).into_response(),
    }
}

/// Handle listing removal.
///
/// Removal is a soft delete; the listing keeps its ID and moves to the
/// removed bucket. Removing it again changes nothing. Only the owning
/// seller can remove a listing.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path((list_id, email)): Path<(i64, String)>,
) -> Response {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return redirect,
    };
    if let Err(redirect) = require_seller(&state, &email).await {
        return redirect;
    }

    let back = format!("/manage-product-listing/{email}");
    let id = ListingId::new(list_id);

    let listings = ListingService::new(state.pool());

    // Ownership check before touching anything
    match listings.get_listing(id).await {
        Ok(Some(listing)) if listing.seller_email == email => {}
        Ok(Some(_)) => return Redirect::to("/store?error=forbidden").into_response(),
        Ok(None) => return Redirect::to(&format!("{back}?error=not_found")).into_response(),
        Err(e) => return AppError::Listing(e).into_response(),
    }

    match listings.remove_listing(id).await {
        Ok(()) => Redirect::to(&format!("{back}?success=removed")).into_response(),
        Err(ListingError::NotFound(_)) => {
            Redirect::to(&format!("{back}?error=not_found")).into_response()
        }
        Err(e) => AppError::Listing(e).into_response(),
    }
}
