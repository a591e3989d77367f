//! Authentication API handlers.
//!
//! This module provides HTTP REST endpoints for user authentication:
//! - User registration with name, email, and password
//! - Login with email/password, returning a JWT access token
//!
//! All endpoints return JSON responses with either the domain value or an
//! error message.
//!
//! # Examples
//!
//! Register a new user:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Player One", "email": "player@example.com", "password": "Secure1!"}'
//! ```
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "player@example.com", "password": "Secure1!"}'
//! ```

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use secret_word::auth::{AuthError, LoginRequest, RegisterRequest, User};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map an authentication error onto its HTTP status and client-safe body.
fn error_response(err: &AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::InvalidName(_) | AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => {
            StatusCode::BAD_REQUEST
        }
        AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
        AuthError::HashingFailed | AuthError::Database(_) | AuthError::JwtError(_) => {
            tracing::error!(error = %err, "auth request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Register a new user account.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Player One",
///   "email": "player@example.com",
///   "password": "Secure1!"
/// }
/// ```
///
/// # Response
///
/// On success, returns `201 Created` with the user view (no password data).
///
/// # Errors
///
/// - `400 Bad Request`: Invalid name, email, or weak password
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: Server error during registration
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, Json<ErrorResponse>)> {
    let request = RegisterRequest {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };

    match state.auth_manager.register(request).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(user.into()))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Authenticate a user and return an access token.
///
/// # Request Body
///
/// ```json
/// {
///   "email": "player@example.com",
///   "password": "Secure1!"
/// }
/// ```
///
/// # Response
///
/// On success, returns `200 OK` with the signed token:
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIs..."
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password; the two cases are
///   deliberately indistinguishable
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = LoginRequest {
        email: payload.email,
        password: payload.password,
    };

    match state.auth_manager.login(request).await {
        Ok((_user, token)) => Ok(Json(LoginResponse { token })),
        Err(e) => Err(error_response(&e)),
    }
}
