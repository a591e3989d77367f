//! Game module providing the guess-evaluation engine and game orchestration.
//!
//! A game pairs one user with one secret word and tracks an append-only
//! sequence of guesses. The entity logic in [`entities`] is pure and total:
//! it evaluates per-letter feedback and drives the Playing/Won/Lost
//! lifecycle without ever touching storage. The [`GameManager`] wraps it
//! with dictionary validation, the one-playing-game-per-user policy, and
//! transactional persistence through the [`crate::db::GameRepository`]
//! trait.
//!
//! ## Example
//!
//! ```no_run
//! use secret_word::db::{Database, PgGameRepository};
//! use secret_word::game::GameManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let repository = Arc::new(PgGameRepository::new(Arc::new(db.pool().clone())));
//!     let games = GameManager::new(repository);
//!
//!     games.create_game(42).await?;
//!     let game = games.guess(42, "плита").await?;
//!     println!("guesses so far: {}", game.guesses.len());
//!     Ok(())
//! }
//! ```

pub mod entities;
pub mod errors;
pub mod manager;

pub use entities::{GUESS_LIMIT, Game, GameId, GameStatus, Guess, LetterFeedback, Word, WordId};
pub use errors::{GameError, GameResult};
pub use manager::GameManager;
