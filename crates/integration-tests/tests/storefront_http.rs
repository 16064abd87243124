//! HTTP-level integration tests: the full router with sessions, driven
//! in-process. Covers the auth flow, path-email authorization, the
//! seller gate, and the listing management surface.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use tradepost_integration_tests::{
    TestContext, assert_redirect, body_text, get_path, post_form, session_cookie,
};

const EMAIL: &str = "s@x.com";
const PASSWORD: &str = "correct-horse-battery";

/// Register an account through the router and return its session cookie.
async fn register(router: &axum::Router) -> String {
    let response = post_form(
        router,
        "/register",
        &format!("email={EMAIL}&password={PASSWORD}&password_confirm={PASSWORD}"),
        None,
    )
    .await;
    assert_redirect(&response, "/store?success=registered");
    session_cookie(&response).expect("registration did not set a session cookie")
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;

    let response = get_path(&router, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_public_pages_render_logged_out() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;

    for path in ["/", "/home", "/login", "/register"] {
        let response = get_path(&router, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
    }
}

#[tokio::test]
async fn test_unknown_category_is_404() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = get_path(&router, "/store/Vehicles", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_lists_child_categories() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let body = body_text(get_path(&router, "/store", Some(&cookie)).await).await;
    assert!(body.contains("/store/Books"));
    assert!(body.contains("/store/Electronics"));

    let body = body_text(get_path(&router, "/store/Books", Some(&cookie)).await).await;
    assert!(body.contains("/store/Fiction"));
}

#[tokio::test]
async fn test_authenticated_pages_require_login() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    let router = ctx.router().await;

    for path in [
        "/store",
        "/store/Books",
        "/info/s@x.com",
        "/change-password/s@x.com",
        "/manage-product-listing/s@x.com",
        "/remove/1/s@x.com",
    ] {
        let response = get_path(&router, path, None).await;
        assert_redirect(&response, "/login");
    }
}

#[tokio::test]
async fn test_register_login_and_view_account() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;

    let cookie = register(&router).await;

    let response = get_path(&router, "/info/s@x.com", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(EMAIL));
}

#[tokio::test]
async fn test_login_with_wrong_credentials_bounces_back() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    register(&router).await;

    let response = post_form(
        &router,
        "/login",
        &format!("email={EMAIL}&password=wrong-password"),
        None,
    )
    .await;
    assert_redirect(&response, "/login?error=credentials");
}

#[tokio::test]
async fn test_login_creates_a_session() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    register(&router).await;

    let response = post_form(
        &router,
        "/login",
        &format!("email={EMAIL}&password={PASSWORD}"),
        None,
    )
    .await;
    assert_redirect(&response, "/store");
    let cookie = session_cookie(&response).unwrap();

    let response = get_path(&router, "/info/s@x.com", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = get_path(&router, "/logout", Some(&cookie)).await;
    assert_redirect(&response, "/login?success=logged_out");

    // The old cookie no longer authenticates
    let response = get_path(&router, "/info/s@x.com", Some(&cookie)).await;
    assert_redirect(&response, "/login");
}

#[tokio::test]
async fn test_path_email_must_match_session_identity() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    for path in [
        "/info/other@x.com",
        "/change-password/other@x.com",
        "/manage-product-listing/other@x.com",
        "/remove/1/other@x.com",
    ] {
        let response = get_path(&router, path, Some(&cookie)).await;
        assert_redirect(&response, "/store?error=forbidden");
    }
}

#[tokio::test]
async fn test_change_password_over_http() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = post_form(
        &router,
        "/change-password/s@x.com",
        &format!(
            "old_password={PASSWORD}&new_password=brand-new-password\
             &new_password_confirm=brand-new-password"
        ),
        Some(&cookie),
    )
    .await;
    assert_redirect(&response, "/info/s@x.com?success=password_changed");

    // New credential works on a fresh login
    let response = post_form(
        &router,
        "/login",
        &format!("email={EMAIL}&password=brand-new-password"),
        None,
    )
    .await;
    assert_redirect(&response, "/store");
}

#[tokio::test]
async fn test_change_password_rejects_wrong_old_password() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = post_form(
        &router,
        "/change-password/s@x.com",
        "old_password=wrong&new_password=brand-new-password\
         &new_password_confirm=brand-new-password",
        Some(&cookie),
    )
    .await;
    assert_redirect(&response, "/change-password/s@x.com?error=wrong_password");
}

#[tokio::test]
async fn test_listing_management_requires_a_seller_record() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = get_path(&router, "/manage-product-listing/s@x.com", Some(&cookie)).await;
    assert_redirect(&response, "/store?error=not_seller");

    ctx.make_seller(EMAIL).await;
    let response = get_path(&router, "/manage-product-listing/s@x.com", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_remove_listing_over_http() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    ctx.make_seller(EMAIL).await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    // Create
    let response = post_form(
        &router,
        "/manage-product-listing/s@x.com",
        "category=Books&title=T&name=N&description=D&price=9.99&quantity=3",
        Some(&cookie),
    )
    .await;
    assert_redirect(&response, "/manage-product-listing/s@x.com?success=created");

    // It shows up in the store and on the management page
    let body = body_text(get_path(&router, "/store/Books", Some(&cookie)).await).await;
    assert!(body.contains(">T<"));

    let (id,): (i64,) =
        sqlx::query_as("SELECT list_id FROM product_listings WHERE seller_email = ?1")
            .bind(EMAIL)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert!((1..=6000).contains(&id));

    // Remove
    let response = get_path(&router, &format!("/remove/{id}/s@x.com"), Some(&cookie)).await;
    assert_redirect(&response, "/manage-product-listing/s@x.com?success=removed");

    let body = body_text(get_path(&router, "/store/Books", Some(&cookie)).await).await;
    assert!(!body.contains(">T<"));

    // Management page still shows it, in the removed bucket
    let body = body_text(
        get_path(&router, "/manage-product-listing/s@x.com", Some(&cookie)).await,
    )
    .await;
    assert!(body.contains("Removed listings"));
    assert!(body.contains(">T<"));
}

#[tokio::test]
async fn test_create_listing_with_bad_category_bounces_back() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    ctx.make_seller(EMAIL).await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    let response = post_form(
        &router,
        "/manage-product-listing/s@x.com",
        "category=Vehicles&title=T&name=N&description=D&price=9.99&quantity=3",
        Some(&cookie),
    )
    .await;
    assert_redirect(&response, "/manage-product-listing/s@x.com?error=bad_category");
}

#[tokio::test]
async fn test_remove_someone_elses_listing_is_forbidden() {
    let ctx = TestContext::new().await;
    ctx.seed_categories().await;
    ctx.make_seller(EMAIL).await;
    let router = ctx.router().await;
    let cookie = register(&router).await;

    // A listing owned by a different seller
    sqlx::query(
        "INSERT INTO product_listings
           (list_id, seller_email, category, title, name, description,
            price, quantity, started_at, removed_at)
         VALUES (77, 'other@x.com', 'Books', 'T2', 'N2', 'D2', '5.00', 1,
                 '2026-01-01T00:00:00Z', NULL)",
    )
    .execute(&ctx.pool)
    .await
    .unwrap();

    let response = get_path(&router, "/remove/77/s@x.com", Some(&cookie)).await;
    assert_redirect(&response, "/store?error=forbidden");

    // Still active
    let (removed_at,): (Option<String>,) =
        sqlx::query_as("SELECT removed_at FROM product_listings WHERE list_id = 77")
            .fetch_one(&ctx.pool)
            .await
            .unwrap();
    assert!(removed_at.is_none());
}
