//! Authentication route handlers.
//!
//! Login, registration, and logout. Form failures land back on the same
//! page with a short error code in the query string; the page handler
//! turns the code into display text.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::MessageQuery;
use crate::services::AuthService;
use crate::services::auth::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Turn a flash code from the query string into display text.
fn flash_text(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_string(),
        "email_taken" => "An account with this email already exists.".to_string(),
        "invalid_email" => "That email address doesn't look right.".to_string(),
        "weak_password" => "Password must be at least 8 characters.".to_string(),
        "password_mismatch" => "The passwords don't match.".to_string(),
        "session" => "Could not start a session. Please try again.".to_string(),
        "logged_out" => "You have been logged out.".to_string(),
        "registered" => "Account created. Welcome!".to_string(),
        other => other.replace('_', " "),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(flash_text),
        success: query.success.as_deref().map(flash_text),
    }
}

/// Handle login form submission.
///
/// Fails closed: unknown email and wrong password produce the same
/// error code.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login_with_password(&form.email, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser::new(user.email.clone());

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/login?error=session").into_response();
            }

            set_sentry_user(user.email.as_str());
            tracing::info!(email = %user.email, "user logged in");
            Redirect::to("/store").into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("login failed: invalid credentials");
            Redirect::to("/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("login failed: {}", e);
            Redirect::to("/login?error=internal").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(flash_text),
    }
}

/// Handle registration form submission.
///
/// Duplicate emails are rejected by the storage layer, so two racing
/// registrations for the same address cannot both win.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/register?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth
        .register_with_password(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            let current_user = CurrentUser::new(user.email.clone());

            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/login?error=session").into_response();
            }

            set_sentry_user(user.email.as_str());
            tracing::info!(email = %user.email, "user registered");
            Redirect::to("/store?success=registered").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/register?error=email_taken").into_response()
        }
        Err(AuthError::InvalidEmail(_)) => {
            Redirect::to("/register?error=invalid_email").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/register?error=weak_password").into_response()
        }
        Err(e) => {
            tracing::error!("registration failed: {}", e);
            Redirect::to("/register?error=internal").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Clearing an already-empty session is harmless, so this never fails
/// the user; worst case they end up logged out, which is what they
/// asked for.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    clear_sentry_user();
    Redirect::to("/login?success=logged_out").into_response()
}
