//! Account route handlers.
//!
//! These routes carry the account email in the path and require a
//! logged-in user; the path email must match the session identity, or
//! the request is bounced to the store page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tradepost_core::Email;

use crate::db::IdentityRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::auth::RequireAuth;
use crate::models::{BuyerProfile, CurrentUser, ResolvedAddress};
use crate::routes::MessageQuery;
use crate::services::AuthService;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Parse a path email and check it against the session identity.
///
/// Account pages are keyed by email in the path, but the path is not an
/// authorization token; only the session identity is.
fn authorize_path_email(path_email: &str, current: &CurrentUser) -> Result<Email, Response> {
    match Email::parse(path_email) {
        Ok(email) if email == current.email => Ok(email),
        _ => Err(Redirect::to("/store?error=forbidden").into_response()),
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Address display data for templates.
#[derive(Debug, Clone)]
pub struct AddressView {
    pub street: String,
    pub city_state: String,
    pub zipcode: String,
}

impl AddressView {
    fn from_resolved(resolved: &ResolvedAddress) -> Self {
        let street = format!(
            "{} {}",
            resolved.address.street_num, resolved.address.street_name
        );
        let city_state = resolved
            .zip_info
            .as_ref()
            .map_or_else(String::new, |z| format!("{}, {}", z.city, z.state_id));
        let zipcode = resolved
            .address
            .zipcode
            .map_or_else(String::new, |z| z.to_string());
        Self {
            street,
            city_state,
            zipcode,
        }
    }
}

/// Credit card display data for templates. Only the masked number is
/// ever handed to a template.
#[derive(Debug, Clone)]
pub struct CardView {
    pub masked_number: String,
    pub card_type: String,
    pub expires: String,
}

/// Buyer profile display data for templates.
#[derive(Debug, Clone, Default)]
pub struct BuyerView {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub home_address: Option<AddressView>,
    pub billing_address: Option<AddressView>,
    pub cards: Vec<CardView>,
}

impl BuyerView {
    fn from_profile(profile: &BuyerProfile) -> Self {
        let Some(buyer) = profile.buyer.as_ref() else {
            return Self::default();
        };

        let full_name = match (&buyer.first_name, &buyer.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        };

        let cards = profile
            .credit_cards
            .iter()
            .map(|c| CardView {
                masked_number: c.masked_number(),
                card_type: c.card_type.clone(),
                expires: format!("{:02}/{}", c.expire_month, c.expire_year),
            })
            .collect();

        Self {
            full_name,
            gender: buyer.gender.clone(),
            age: buyer.age,
            home_address: profile.home_address.as_ref().map(AddressView::from_resolved),
            billing_address: profile
                .billing_address
                .as_ref()
                .map(AddressView::from_resolved),
            cards,
        }
    }
}

/// Seller display data for templates.
#[derive(Debug, Clone)]
pub struct SellerView {
    pub routing_number: String,
    pub balance: String,
}

/// Local vendor display data for templates.
#[derive(Debug, Clone)]
pub struct VendorView {
    pub business_name: String,
    pub business_phone: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Account info page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/info.html")]
pub struct InfoTemplate {
    pub email: String,
    pub member_since: String,
    pub buyer: Option<BuyerView>,
    pub seller: Option<SellerView>,
    pub vendor: Option<VendorView>,
    pub success: Option<String>,
}

/// Change password page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/change_password.html")]
pub struct ChangePasswordTemplate {
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Change password form data.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Turn a flash code from the query string into display text.
fn flash_text(code: &str) -> String {
    match code {
        "wrong_password" => "The current password is incorrect.".to_string(),
        "weak_password" => "New password must be at least 8 characters.".to_string(),
        "password_mismatch" => "The new passwords don't match.".to_string(),
        "password_changed" => "Your password has been changed.".to_string(),
        other => other.replace('_', " "),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the account info page.
///
/// Shows whatever directory records exist for the account: the buyer
/// profile with resolved addresses and masked cards, plus seller and
/// local-vendor records when present.
pub async fn info(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(email): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return Ok(redirect),
    };

    let auth = AuthService::new(state.pool());
    let user = auth
        .get_user(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_string()))?;

    let identity = IdentityRepository::new(state.pool());
    let profile = identity.get_buyer_profile(&email).await?;
    let seller = identity.get_seller(&email).await?;
    let vendor = identity.get_local_vendor(&email).await?;

    let buyer = profile.buyer.is_some().then(|| BuyerView::from_profile(&profile));

    let template = InfoTemplate {
        email: email.to_string(),
        member_since: user.created_at.format("%B %Y").to_string(),
        buyer,
        seller: seller.map(|s| SellerView {
            routing_number: s.routing_number.unwrap_or_default(),
            balance: s
                .balance
                .map_or_else(String::new, |cents| format!("${cents}")),
        }),
        vendor: vendor.map(|v| VendorView {
            business_name: v.business_name.unwrap_or_default(),
            business_phone: v.business_phone.unwrap_or_default(),
        }),
        success: query.success.as_deref().map(flash_text),
    };

    Ok(template.into_response())
}

/// Display the change password page.
pub async fn change_password_page(
    RequireAuth(current_user): RequireAuth,
    Path(email): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return redirect,
    };

    ChangePasswordTemplate {
        email: email.to_string(),
        error: query.error.as_deref().map(flash_text),
        success: query.success.as_deref().map(flash_text),
    }
    .into_response()
}

/// Handle change password form submission.
///
/// The old password is verified before anything is written; a wrong old
/// password changes nothing.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(email): Path<String>,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let email = match authorize_path_email(&email, &current_user) {
        Ok(email) => email,
        Err(redirect) => return redirect,
    };

    let back = format!("/change-password/{email}");

    if form.new_password != form.new_password_confirm {
        return Redirect::to(&format!("{back}?error=password_mismatch")).into_response();
    }

    let auth = AuthService::new(state.pool());
    match auth
        .change_password(&email, &form.old_password, &form.new_password)
        .await
    {
        Ok(()) => {
            tracing::info!(email = %email, "password changed");
            Redirect::to(&format!("/info/{email}?success=password_changed")).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            Redirect::to(&format!("{back}?error=wrong_password")).into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to(&format!("{back}?error=weak_password")).into_response()
        }
        Err(e) => {
            tracing::error!("password change failed: {}", e);
            AppError::Auth(e).into_response()
        }
    }
}
