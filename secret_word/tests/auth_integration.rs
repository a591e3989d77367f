//! Integration tests for the authentication system against PostgreSQL.
//!
//! Ignored by default; run with `cargo test -- --ignored` against a
//! migrated, disposable database.

use secret_word::auth::{AuthError, AuthManager, LoginRequest, RegisterRequest};
use secret_word::db::{Database, DatabaseConfig};
use sqlx::PgPool;
use std::sync::Arc;

/// Helper to create a test database pool
async fn setup_test_db() -> Arc<PgPool> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/secret_word_test".to_string());

    let config = DatabaseConfig {
        database_url,
        max_connections: 5,
        min_connections: 1,
        connection_timeout_secs: 5,
        idle_timeout_secs: 300,
        max_lifetime_secs: 1800,
    };

    let db = Database::new(&config)
        .await
        .expect("Failed to create test database");

    Arc::new(db.pool().clone())
}

/// Helper to create a test auth manager
async fn setup_auth_manager() -> AuthManager {
    let pool = setup_test_db().await;
    AuthManager::new(
        pool,
        "test_pepper_for_testing_only".to_string(),
        "test_secret_key_for_testing_only".to_string(),
    )
}

fn unique_email(prefix: &str) -> String {
    let suffix: u32 = rand::random();
    format!("{prefix}_{suffix}@example.com")
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn register_and_login_round_trip() {
    let auth = setup_auth_manager().await;
    let email = unique_email("round_trip");

    let user = auth
        .register(RegisterRequest {
            name: "Round Trip".to_string(),
            email: email.clone(),
            password: "Secure1!".to_string(),
        })
        .await
        .expect("Registration should succeed");
    assert!(user.id > 0);
    assert_eq!(user.email_verified_at, None);

    let (logged_in, token) = auth
        .login(LoginRequest {
            email,
            password: "Secure1!".to_string(),
        })
        .await
        .expect("Login should succeed");
    assert_eq!(logged_in.id, user.id);

    let claims = auth.verify_access_token(&token).unwrap();
    assert_eq!(claims.sub, user.id);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn duplicate_email_is_rejected() {
    let auth = setup_auth_manager().await;
    let email = unique_email("duplicate");

    auth.register(RegisterRequest {
        name: "First".to_string(),
        email: email.clone(),
        password: "Secure1!".to_string(),
    })
    .await
    .expect("First registration should succeed");

    let err = auth
        .register(RegisterRequest {
            name: "Second".to_string(),
            email,
            password: "Secure2!".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::EmailTaken));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn wrong_password_and_unknown_email_look_the_same() {
    let auth = setup_auth_manager().await;
    let email = unique_email("credentials");

    auth.register(RegisterRequest {
        name: "Credentials".to_string(),
        email: email.clone(),
        password: "Secure1!".to_string(),
    })
    .await
    .unwrap();

    let wrong_password = auth
        .login(LoginRequest {
            email,
            password: "Wrong1!!".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = auth
        .login(LoginRequest {
            email: unique_email("missing"),
            password: "Secure1!".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::UserNotFound));
    assert!(matches!(unknown_email, AuthError::UserNotFound));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn find_by_id_returns_registered_user() {
    let auth = setup_auth_manager().await;
    let email = unique_email("find_by_id");

    let user = auth
        .register(RegisterRequest {
            name: "Find Me".to_string(),
            email,
            password: "Secure1!".to_string(),
        })
        .await
        .unwrap();

    let found = auth.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Find Me");

    assert!(auth.find_by_id(i64::MAX).await.unwrap().is_none());
}
