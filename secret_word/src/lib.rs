//! # Secret Word
//!
//! A five-letter word-guessing game engine with database-backed persistence
//! and authentication.
//!
//! Players get six attempts to guess a secret noun drawn from a dictionary.
//! Every guess is answered with per-letter feedback: whether the letter
//! occurs anywhere in the secret word, and whether it sits at the correct
//! position. An exact match wins the game; running out of attempts loses it.
//!
//! ## Architecture
//!
//! The game lifecycle is a small state machine with three states:
//!
//! - **Playing**: the game accepts guesses
//! - **Won**: a guess matched the secret word exactly
//! - **Lost**: the guess limit was exhausted without a match
//!
//! Won and Lost are terminal. A finished game is never resurrected; the
//! player starts a new one instead.
//!
//! ## Core Modules
//!
//! - [`game`]: game entities, guess evaluation, and the orchestration manager
//! - [`auth`]: user registration, login, and JWT token handling
//! - [`db`]: PostgreSQL connection pooling and repository implementations
//!
//! ## Example
//!
//! ```
//! use secret_word::game::entities::{Game, Word};
//!
//! let secret = Word::with_text(1, "плита");
//! let mut game = Game::new(secret.clone(), 42);
//! let guess = game.add_guess(&secret);
//! assert!(guess.letters.iter().all(|l| l.is_correct_position));
//! assert_eq!(game.is_won, Some(true));
//! ```

/// User registration, login, and token handling.
pub mod auth;
pub use auth::{AuthError, AuthManager, AuthResult, User, UserId};

/// PostgreSQL pooling and repositories.
pub mod db;
pub use db::{Database, DatabaseConfig, GameRepository, PgGameRepository};

/// Game entities, guess evaluation, and orchestration.
pub mod game;
pub use game::{
    GameError, GameManager, GameResult,
    entities::{GUESS_LIMIT, Game, GameStatus, Guess, LetterFeedback, Word},
};
