//! Account and credential integration tests against a real migrated
//! database: registration uniqueness, fail-closed login, and the
//! password change flow.

#![allow(clippy::unwrap_used)]

use tradepost_core::Email;
use tradepost_integration_tests::TestContext;
use tradepost_storefront::services::AuthService;
use tradepost_storefront::services::auth::AuthError;

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "correct-horse-battery";

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    let user = auth.register_with_password(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.email.as_str(), EMAIL);

    let user = auth.login_with_password(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(user.email.as_str(), EMAIL);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();

    let err = auth
        .register_with_password(EMAIL, "some-other-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_email_is_normalized_to_lowercase() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    let user = auth
        .register_with_password("User@Example.COM", PASSWORD)
        .await
        .unwrap();
    assert_eq!(user.email.as_str(), EMAIL);

    // The differently-cased spelling is the same account
    auth.login_with_password("USER@example.com", PASSWORD)
        .await
        .unwrap();
    let err = auth
        .register_with_password("user@EXAMPLE.com", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_login_fails_closed() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();

    // Unknown account, wrong password, and unparsable email all produce
    // the same error
    let err = auth
        .login_with_password("nobody@example.com", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = auth
        .login_with_password(EMAIL, "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = auth
        .login_with_password("not an email", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    let err = auth
        .register_with_password("not an email", PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail(_)));

    let err = auth.register_with_password(EMAIL, "short").await.unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword(_)));
}

#[tokio::test]
async fn test_stored_credential_is_a_hash() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();

    let (hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE email = ?1")
            .bind(EMAIL)
            .fetch_one(&ctx.pool)
            .await
            .unwrap();

    assert_ne!(hash, PASSWORD);
    assert!(!hash.contains(PASSWORD));
    assert!(hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_change_password_requires_the_old_one() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);
    let email = Email::parse(EMAIL).unwrap();

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();

    let err = auth
        .change_password(&email, "wrong-password", "brand-new-password")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // Nothing changed
    auth.login_with_password(EMAIL, PASSWORD).await.unwrap();
}

#[tokio::test]
async fn test_change_password_rotates_the_credential() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);
    let email = Email::parse(EMAIL).unwrap();

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();
    auth.change_password(&email, PASSWORD, "brand-new-password")
        .await
        .unwrap();

    // Old password is dead, new one works
    let err = auth.login_with_password(EMAIL, PASSWORD).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    auth.login_with_password(EMAIL, "brand-new-password")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_change_password_rejects_weak_replacement() {
    let ctx = TestContext::new().await;
    let auth = AuthService::new(&ctx.pool);
    let email = Email::parse(EMAIL).unwrap();

    auth.register_with_password(EMAIL, PASSWORD).await.unwrap();

    let err = auth
        .change_password(&email, PASSWORD, "short")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword(_)));

    // The old credential survives a rejected change
    auth.login_with_password(EMAIL, PASSWORD).await.unwrap();
}
