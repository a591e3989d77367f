//! Game orchestration manager.

use std::sync::Arc;

use log::info;

use super::{
    entities::Game,
    errors::{GameError, GameResult},
};
use crate::auth::UserId;
use crate::db::GameRepository;

/// Game manager
///
/// Sequences repository lookups around the pure entity logic and translates
/// ambiguous storage outcomes into the [`GameError`] taxonomy. Enforces the
/// single-active-game-per-user policy; the entity itself never checks it.
#[derive(Clone)]
pub struct GameManager {
    repository: Arc<dyn GameRepository>,
}

impl GameManager {
    /// Create a new game manager
    ///
    /// # Arguments
    ///
    /// * `repository` - Game and dictionary storage
    pub fn new(repository: Arc<dyn GameRepository>) -> Self {
        Self { repository }
    }

    /// Find the user's currently-playing game, with its guesses and secret word.
    ///
    /// # Errors
    ///
    /// * `GameError::CurrentGameNotFound` - No playing game exists for the user
    /// * `GameError::Database` - Underlying storage failure, passed through
    pub async fn find_current_game(&self, user_id: UserId) -> GameResult<Game> {
        self.repository
            .find_current_game(user_id)
            .await?
            .ok_or(GameError::CurrentGameNotFound)
    }

    /// Start a new game for the user with a randomly drawn secret word.
    ///
    /// # Errors
    ///
    /// * `GameError::CurrentGameAlreadyExists` - A playing game already exists;
    ///   fetch it instead of creating another
    /// * `GameError::Database` - Underlying storage failure, passed through
    pub async fn create_game(&self, user_id: UserId) -> GameResult<Game> {
        if self.repository.is_current_game_exists(user_id).await? {
            return Err(GameError::CurrentGameAlreadyExists);
        }

        let word = self.repository.find_random_word().await?;
        let game = self.repository.create_game(&word, user_id).await?;
        info!("user {user_id} started game {}", game.id);

        Ok(game)
    }

    /// Submit a guess against the user's current game.
    ///
    /// The dictionary lookup runs first: a word that is not a recognized
    /// 5-letter noun is rejected before any game state is touched. The
    /// guess itself is applied atomically by the repository so a concurrent
    /// guess cannot be evaluated against stale state.
    ///
    /// # Errors
    ///
    /// * `GameError::IncorrectWord` - The word is not in the dictionary
    /// * `GameError::CurrentGameNotFound` - No playing game exists for the user
    /// * `GameError::Database` - Underlying storage failure, passed through
    pub async fn guess(&self, user_id: UserId, word: &str) -> GameResult<Game> {
        let word = self
            .repository
            .find_word(word)
            .await?
            .ok_or(GameError::IncorrectWord)?;

        let game = self
            .repository
            .add_guess_for_current_game(user_id, &word)
            .await?;
        if !game.is_playing {
            info!("user {user_id} finished game {} as {}", game.id, game.status());
        }

        Ok(game)
    }
}
