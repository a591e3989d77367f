//! Authentication manager implementation.

use super::{
    errors::{AuthError, AuthResult},
    models::{AccessTokenClaims, LoginRequest, RegisterRequest, User, UserId},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    pool: Arc<PgPool>,
    pepper: String,
    jwt_secret: String,
    access_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    ///
    /// # Returns
    ///
    /// * `AuthManager` - New authentication manager instance
    pub fn new(pool: Arc<PgPool>, pepper: String, jwt_secret: String) -> Self {
        Self {
            pool,
            pepper,
            jwt_secret,
            access_token_duration: Duration::days(7),
        }
    }

    /// Register a new user
    ///
    /// # Arguments
    ///
    /// * `request` - Registration request with name, email, and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<User>` - Created user or error
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidName` - Name format invalid
    /// * `AuthError::InvalidEmail` - Email format invalid
    /// * `AuthError::WeakPassword` - Password too weak
    /// * `AuthError::EmailTaken` - Email already exists
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<User> {
        self.validate_name(&request.name)?;
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        // Check if email exists
        let existing_email = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(&request.email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        if existing_email.is_some() {
            return Err(AuthError::EmailTaken);
        }

        // Hash password with Argon2id + pepper
        let password_hash = self.hash_password(&request.password)?;

        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .fetch_one(self.pool.as_ref())
        .await
        // The unique index still wins when two registrations race past the
        // existence check above.
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailTaken,
            _ => AuthError::from(e),
        })?;

        Ok(User {
            id: row.get("id"),
            name: request.name,
            email: request.email,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Login a user
    ///
    /// # Arguments
    ///
    /// * `request` - Login request with email and password
    ///
    /// # Returns
    ///
    /// * `AuthResult<(User, String)>` - User and signed access token, or error
    ///
    /// # Errors
    ///
    /// * `AuthError::UserNotFound` - Unknown email or incorrect password
    ///   (indistinguishable on purpose)
    pub async fn login(&self, request: LoginRequest) -> AuthResult<(User, String)> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, email_verified_at, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&request.email)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AuthError::UserNotFound)?;

        let password_hash: String = row.get("password_hash");
        self.verify_password(&request.password, &password_hash)?;

        let user = Self::user_from_row(&row);
        let token = self.generate_access_token(user.id)?;

        Ok((user, token))
    }

    /// Verify an access token
    ///
    /// # Arguments
    ///
    /// * `token` - JWT access token
    ///
    /// # Returns
    ///
    /// * `AuthResult<AccessTokenClaims>` - Decoded claims or error
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, email_verified_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| Self::user_from_row(&r)))
    }

    fn user_from_row(row: &PgRow) -> User {
        User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            email_verified_at: row
                .get::<Option<chrono::NaiveDateTime>, _>("email_verified_at")
                .map(|dt| dt.and_utc()),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        }
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> AuthResult<()> {
        let peppered = format!("{}{}", password, self.pepper);
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::UserNotFound)?;
        let argon2 = Argon2::default();

        argon2
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::UserNotFound)
    }

    /// Generate JWT access token
    fn generate_access_token(&self, user_id: UserId) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id,
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate name format
    fn validate_name(&self, name: &str) -> AuthResult<()> {
        let len = name.chars().count();
        if !(3..=255).contains(&len) {
            return Err(AuthError::InvalidName(
                "Name must be 3-255 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate email format
    fn validate_email(&self, email: &str) -> AuthResult<()> {
        if email.chars().count() > 255 {
            return Err(AuthError::InvalidEmail(
                "Email must be at most 255 characters".to_string(),
            ));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(AuthError::InvalidEmail(
                "Email must contain a single @".to_string(),
            ));
        };

        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || email.contains(char::is_whitespace)
        {
            return Err(AuthError::InvalidEmail(
                "Email address is not well-formed".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate password strength
    fn validate_password(&self, password: &str) -> AuthResult<()> {
        let len = password.chars().count();
        if !(8..=16).contains(&len) {
            return Err(AuthError::WeakPassword(
                "Password must be 8-16 characters".to_string(),
            ));
        }

        let has_upper = password.chars().any(char::is_uppercase);
        let has_lower = password.chars().any(char::is_lowercase);
        let has_digit = password.chars().any(char::is_numeric);
        let has_special = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

        if !has_upper || !has_lower || !has_digit || !has_special {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one uppercase letter, one lowercase letter, \
                 one number and one special character"
                    .to_string(),
            ));
        }

        Ok(())
    }
}
