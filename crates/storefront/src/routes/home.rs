//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::MessageQuery;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_email: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the home page.
///
/// Works both logged in and logged out; the template adapts its links.
pub async fn home(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    HomeTemplate {
        user_email: user.map(|u| u.email.to_string()),
        error: query.error,
        success: query.success,
    }
}
