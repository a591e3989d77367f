//! HTTP API for the word-guessing game server.
//!
//! This module provides the REST API for registration, login, and per-user
//! game play.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and authentication
//! - **JWT**: Bearer-token authentication
//!
//! # Modules
//!
//! - [`auth`]: User authentication (register, login)
//! - [`games`]: Current-game retrieval, game creation, and guess submission
//! - [`middleware`]: Authentication middleware for protected endpoints
//! - [`request_id`]: Request ID propagation for log correlation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Health check (public)
//! POST /api/v1/auth/register            - Register user (public)
//! POST /api/v1/auth/login               - Login (public)
//! GET  /api/v1/games/current            - Current game (auth required)
//! POST /api/v1/games/current            - Start a game (auth required)
//! POST /api/v1/games/current/guesses    - Submit a guess (auth required)
//! ```

pub mod auth;
pub mod games;
pub mod middleware;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use secret_word::{auth::AuthManager, game::GameManager};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap due to Arc wrappers).
///
/// # Fields
///
/// - `auth_manager`: Handles registration, login, and JWT tokens
/// - `game_manager`: Orchestrates game creation and guess submission
/// - `pool`: Database connection pool for direct queries (health check)
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub game_manager: Arc<GameManager>,
    pub pool: Arc<PgPool>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use sw_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
///
/// Versioning leaves room for future API evolution without breaking
/// existing clients.
fn create_v1_router(state: AppState) -> Router<AppState> {
    // Public routes (no authentication middleware)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected routes (require authentication middleware)
    let protected_routes = Router::new()
        .route(
            "/games/current",
            get(games::current_game).post(games::create_game),
        )
        .route("/games/current/guesses", post(games::guess))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Checks database connectivity and reports the dictionary size. Returns
/// `200 OK` when the database answers, `503 Service Unavailable` otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"dictionary":{"words":4265},...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let word_count: Option<i64> = sqlx::query_scalar("SELECT COUNT(*) FROM words")
        .fetch_one(&*state.pool)
        .await
        .ok();

    let db_healthy = word_count.is_some();
    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "dictionary": {
            "words": word_count.unwrap_or(0),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
