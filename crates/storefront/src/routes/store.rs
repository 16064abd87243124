//! Store browsing route handlers.
//!
//! Browsing requires a login. `/store` is the top level and
//! `/store/{category}` narrows to one category. Removed listings never
//! appear here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::db::catalog::ROOT_CATEGORY;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::{ListingView, MessageQuery};
use crate::services::CatalogService;
use crate::state::AppState;

/// Category link display data for templates.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
}

/// Store page template.
#[derive(Template, WebTemplate)]
#[template(path = "store/index.html")]
pub struct StoreTemplate {
    pub category: String,
    pub is_root: bool,
    pub child_categories: Vec<CategoryLink>,
    pub listings: Vec<ListingView>,
    pub user_email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Turn a flash code from the query string into display text.
fn flash_text(code: &str) -> String {
    match code {
        "forbidden" => "You can only view your own account pages.".to_string(),
        "not_seller" => "Only seller accounts can manage listings.".to_string(),
        "registered" => "Account created. Welcome!".to_string(),
        other => other.replace('_', " "),
    }
}

/// Render the store page for one category.
async fn render(
    state: &AppState,
    category: String,
    user_email: String,
    query: MessageQuery,
) -> Result<Response, AppError> {
    let catalog = CatalogService::new(state.pool());

    // The root sentinel has no row; anything else must exist
    if !CatalogService::is_root(&category) && !catalog.category_exists(&category).await? {
        return Err(AppError::NotFound(format!("category '{category}'")));
    }

    let view = catalog.browse(&category).await?;

    let template = StoreTemplate {
        is_root: CatalogService::is_root(&category),
        category,
        child_categories: view
            .child_categories
            .into_iter()
            .map(|c| CategoryLink {
                href: format!("/store/{}", c.name),
                name: c.name,
            })
            .collect(),
        listings: view.listings.iter().map(ListingView::from_listing).collect(),
        user_email,
        error: query.error.as_deref().map(flash_text),
        success: query.success.as_deref().map(flash_text),
    };

    Ok(template.into_response())
}

/// Display the top-level store page.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    render(&state, ROOT_CATEGORY.to_string(), user.email.to_string(), query).await
}

/// Display the store page for a category.
pub async fn category(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(category): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    render(&state, category, user.email.to_string(), query).await
}
