//! Authentication module providing user registration, login, and token handling.
//!
//! This module implements:
//! - Argon2id password hashing with a server-side pepper
//! - JWT access tokens (HS256, 7-day expiry)
//! - Registration field validation (name, email, password strength)
//!
//! ## Example
//!
//! ```no_run
//! use secret_word::auth::{AuthManager, RegisterRequest};
//! use secret_word::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!         "jwt_secret".to_string(),
//!     );
//!
//!     let request = RegisterRequest {
//!         name: "Player One".to_string(),
//!         email: "player@example.com".to_string(),
//!         password: "Secure1!".to_string(),
//!     };
//!
//!     let user = auth.register(request).await?;
//!     println!("Registered user: {}", user.email);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{AccessTokenClaims, LoginRequest, RegisterRequest, User, UserId};
