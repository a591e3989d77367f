//! Game error types.

use thiserror::Error;

/// Errors surfaced by game orchestration and persistence.
///
/// The entity layer never raises errors; every fallible operation lives in
/// the manager and repository, and returns one of these inspectable kinds so
/// the transport layer can branch on the variant rather than on message
/// strings.
#[derive(Debug, Error)]
pub enum GameError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No playing game exists for the user
    #[error("the current user is not playing any game now")]
    CurrentGameNotFound,

    /// A playing game already exists for the user
    #[error("the current user is already playing a game")]
    CurrentGameAlreadyExists,

    /// Submitted guess is not a recognized dictionary word
    #[error("the word is not a recognized 5-letter noun")]
    IncorrectWord,
}

impl GameError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database errors are sanitized to prevent information disclosure about
    /// the internal system structure.
    pub fn client_message(&self) -> String {
        match self {
            GameError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;
