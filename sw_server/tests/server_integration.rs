//! Integration tests for the HTTP API.
//!
//! The middleware and validation tests drive the router directly with
//! `tower::ServiceExt::oneshot` over a lazily-connected pool, so they run
//! without a database. The full-flow tests at the bottom require a migrated
//! PostgreSQL instance and are ignored by default.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secret_word::auth::AuthManager;
use secret_word::db::PgGameRepository;
use secret_word::game::GameManager;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // For `oneshot` method

const TEST_PEPPER: &str = "test_pepper_for_testing_only";
const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

/// Build app state over the given pool
fn build_state(pool: Arc<PgPool>) -> sw_server::api::AppState {
    let auth_manager = Arc::new(AuthManager::new(
        pool.clone(),
        TEST_PEPPER.to_string(),
        TEST_JWT_SECRET.to_string(),
    ));
    let repository = Arc::new(PgGameRepository::new(pool.clone()));
    let game_manager = Arc::new(GameManager::new(repository));

    sw_server::api::AppState {
        auth_manager,
        game_manager,
        pool,
    }
}

/// Router over a lazy pool; requests that never reach the database can be
/// exercised without one.
fn create_offline_router() -> axum::Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://postgres@localhost/secret_word_offline")
        .expect("lazy pool construction should not fail");

    sw_server::api::create_router(build_state(Arc::new(pool)))
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Middleware and Validation Tests (no database required)
// ============================================================================

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = create_offline_router();

    let request = Request::builder()
        .uri("/api/v1/games/current")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_garbage_token_is_unauthorized() {
    let app = create_offline_router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/games/current/guesses")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"word": "плита"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_invalid_signature_is_rejected() {
    let app = create_offline_router();

    // Structurally a JWT, but not signed with the server's secret.
    let request = Request::builder()
        .uri("/api/v1/games/current")
        .header(
            header::AUTHORIZATION,
            "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOjF9.invalid",
        )
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_with_weak_password_is_rejected_before_storage() {
    let app = create_offline_router();

    let response = app
        .oneshot(json_request(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Player One",
                "email": "player@example.com",
                "password": "weak"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Password"));
}

#[tokio::test]
async fn register_with_malformed_email_is_rejected_before_storage() {
    let app = create_offline_router();

    let response = app
        .oneshot(json_request(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Player One",
                "email": "not-an-email",
                "password": "Secure1!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = create_offline_router();

    let response = app
        .oneshot(json_request(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Player One",
                "email": "bad",
                "password": "Secure1!"
            }),
        ))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn provided_request_id_is_echoed_back() {
    let app = create_offline_router();

    let request = Request::builder()
        .uri("/api/v1/games/current")
        .header("x-request-id", "trace-me-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-me-42"
    );
}

// ============================================================================
// Full-flow Tests (require a migrated PostgreSQL instance)
// ============================================================================

/// Helper to create a test router over a real database
async fn create_test_router() -> (axum::Router, Arc<PgPool>) {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/secret_word_test".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    let pool = Arc::new(pool);

    (sw_server::api::create_router(build_state(pool.clone())), pool)
}

/// Generate a unique email for tests
fn unique_email(prefix: &str) -> String {
    let rand_id: u32 = rand::random();
    format!("{}_{}@example.com", prefix, rand_id % 100_000)
}

async fn register_and_login(app: &axum::Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "/api/v1/auth/register",
            serde_json::json!({
                "name": "Integration Tester",
                "email": email,
                "password": "Secure1!"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/v1/auth/login",
            serde_json::json!({"email": email, "password": "Secure1!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

fn bearer_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn bearer_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn health_check_reports_healthy() {
    let (app, _pool) = create_test_router().await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn full_game_flow_over_http() {
    let (app, pool) = create_test_router().await;

    // Seed the dictionary
    let repository = PgGameRepository::new(pool.clone());
    use secret_word::db::GameRepository as _;
    repository
        .save_words(&["сковы".to_string(), "плита".to_string()])
        .await
        .unwrap();

    let email = unique_email("full_flow");
    let token = register_and_login(&app, &email).await;

    // No game yet
    let response = app
        .clone()
        .oneshot(bearer_get("/api/v1/games/current", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Start a game
    let response = app
        .clone()
        .oneshot(bearer_post(
            "/api/v1/games/current",
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["is_won"].is_null());
    assert_eq!(body["guesses"].as_array().unwrap().len(), 0);

    // Starting another conflicts
    let response = app
        .clone()
        .oneshot(bearer_post(
            "/api/v1/games/current",
            &token,
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A word outside the dictionary is rejected
    let response = app
        .clone()
        .oneshot(bearer_post(
            "/api/v1/games/current/guesses",
            &token,
            serde_json::json!({"word": "zzzzz"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Fish the secret word out of the database and win with it
    let secret: String = sqlx::query_scalar(
        "SELECT w.word FROM games g JOIN words w ON w.id = g.word_id \
         JOIN users u ON u.id = g.user_id \
         WHERE u.email = $1 AND g.is_playing = TRUE",
    )
    .bind(&email)
    .fetch_one(pool.as_ref())
    .await
    .unwrap();

    let response = app
        .clone()
        .oneshot(bearer_post(
            "/api/v1/games/current/guesses",
            &token,
            serde_json::json!({"word": secret}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["is_won"], true);
    let letters = body["guesses"][0]["letters"].as_array().unwrap();
    assert!(letters.iter().all(|l| l["is_correct_position"] == true));

    // The finished game is gone; guessing again is a 404
    let response = app
        .clone()
        .oneshot(bearer_post(
            "/api/v1/games/current/guesses",
            &token,
            serde_json::json!({"word": "плита"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
