//! Repository trait definitions for testability and dependency injection.
//!
//! This module provides trait-based abstractions over database operations,
//! enabling better testing through mock implementations and dependency
//! injection. The production implementation runs against PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::sync::Arc;

use crate::auth::UserId;
use crate::game::entities::{self, Game, Guess, Word};
use crate::game::errors::{GameError, GameResult};

/// Trait for game and dictionary storage operations
///
/// The orchestration layer depends only on this interface; both the
/// PostgreSQL implementation and the in-memory test double satisfy it.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Find the user's currently-playing game with its guesses and secret word
    async fn find_current_game(&self, user_id: UserId) -> GameResult<Option<Game>>;

    /// Check whether a playing game exists for the user
    async fn is_current_game_exists(&self, user_id: UserId) -> GameResult<bool>;

    /// Persist a new playing game referencing the given secret word
    async fn create_game(&self, word: &Word, user_id: UserId) -> GameResult<Game>;

    /// Draw a random word from the dictionary
    async fn find_random_word(&self) -> GameResult<Word>;

    /// Look up a dictionary word by its text, `None` when absent
    async fn find_word(&self, word: &str) -> GameResult<Option<Word>>;

    /// Atomically apply one guess to the user's current game
    ///
    /// Loads the playing game, applies the guess through the entity, inserts
    /// the guess row, and updates the game row when the guess decided the
    /// outcome. The whole sequence runs in one transaction; a guess row is
    /// never observable without its matching game-status update.
    ///
    /// # Errors
    ///
    /// * `GameError::CurrentGameNotFound` - No playing game exists for the
    ///   user, reported distinctly from other storage failures
    async fn add_guess_for_current_game(&self, user_id: UserId, word: &Word) -> GameResult<Game>;

    /// Bulk-insert dictionary words, ignoring duplicates
    ///
    /// Returns the number of words actually inserted.
    async fn save_words(&self, words: &[String]) -> GameResult<u64>;
}

const CURRENT_GAME_SQL: &str = r#"
    SELECT g.id, g.user_id, g.guess_limit, g.is_playing, g.is_won, g.created_at, g.updated_at,
           w.id AS word_id, w.word, w.created_at AS word_created_at
    FROM games g
    JOIN words w ON w.id = g.word_id
    WHERE g.user_id = $1 AND g.is_playing = TRUE
"#;

const GAME_GUESSES_SQL: &str = r#"
    SELECT gu.id, gu.game_id, gu.created_at,
           w.id AS word_id, w.word, w.created_at AS word_created_at
    FROM guesses gu
    JOIN words w ON w.id = gu.word_id
    WHERE gu.game_id = $1
    ORDER BY gu.id
"#;

/// Default PostgreSQL implementation of [`GameRepository`]
pub struct PgGameRepository {
    pool: Arc<PgPool>,
}

impl PgGameRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn word_from_row(row: &PgRow) -> Word {
        Word {
            id: row.get("word_id"),
            word: row.get("word"),
            created_at: row
                .get::<chrono::NaiveDateTime, _>("word_created_at")
                .and_utc(),
        }
    }

    fn game_from_row(row: &PgRow) -> Game {
        Game {
            id: row.get("id"),
            user_id: row.get("user_id"),
            guess_limit: row.get("guess_limit"),
            is_playing: row.get("is_playing"),
            is_won: row.get("is_won"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
            word: Self::word_from_row(row),
            guesses: Vec::new(),
        }
    }

    /// Rebuild a persisted guess. Letter feedback is not stored; it is
    /// re-derived from the same evaluation the entity ran when the guess was
    /// submitted, so loaded feedback can never diverge from it.
    fn guess_from_row(row: &PgRow, secret: &str) -> Guess {
        let word = Self::word_from_row(row);
        Guess {
            id: row.get("id"),
            game_id: row.get("game_id"),
            letters: entities::evaluate(secret, &word.word),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
            word,
        }
    }

    async fn fetch_current_game(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
    ) -> GameResult<Option<Game>> {
        let row = sqlx::query(CURRENT_GAME_SQL)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut game = Self::game_from_row(&row);
        let guess_rows = sqlx::query(GAME_GUESSES_SQL)
            .bind(game.id)
            .fetch_all(&mut **tx)
            .await?;

        let secret = game.word.word.clone();
        game.guesses = guess_rows
            .iter()
            .map(|r| Self::guess_from_row(r, &secret))
            .collect();

        Ok(Some(game))
    }

    async fn begin_repeatable_read(&self) -> GameResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    async fn find_current_game(&self, user_id: UserId) -> GameResult<Option<Game>> {
        // Snapshot the game and its guesses together.
        let mut tx = self.begin_repeatable_read().await?;
        let game = Self::fetch_current_game(&mut tx, user_id).await?;
        tx.commit().await?;

        Ok(game)
    }

    async fn is_current_game_exists(&self, user_id: UserId) -> GameResult<bool> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM games WHERE user_id = $1 AND is_playing = TRUE) AS is_exists",
        )
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.get("is_exists"))
    }

    async fn create_game(&self, word: &Word, user_id: UserId) -> GameResult<Game> {
        let mut game = Game::new(word.clone(), user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO games (user_id, word_id, guess_limit, is_playing, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(game.user_id)
        .bind(game.word.id)
        .bind(game.guess_limit)
        .bind(game.is_playing)
        .bind(game.created_at.naive_utc())
        .bind(game.updated_at.naive_utc())
        .fetch_one(self.pool.as_ref())
        .await?;

        game.id = row.get("id");
        Ok(game)
    }

    async fn find_random_word(&self) -> GameResult<Word> {
        let row = sqlx::query(
            "SELECT id AS word_id, word, created_at AS word_created_at \
             FROM words ORDER BY RANDOM() LIMIT 1",
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(Self::word_from_row(&row))
    }

    async fn find_word(&self, word: &str) -> GameResult<Option<Word>> {
        let row = sqlx::query(
            "SELECT id AS word_id, word, created_at AS word_created_at \
             FROM words WHERE word = $1",
        )
        .bind(word)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(|r| Self::word_from_row(&r)))
    }

    async fn add_guess_for_current_game(&self, user_id: UserId, word: &Word) -> GameResult<Game> {
        let mut tx = self.begin_repeatable_read().await?;

        // Dropping the transaction on the error paths below rolls it back,
        // so a guess row cannot outlive a failed status update.
        let Some(mut game) = Self::fetch_current_game(&mut tx, user_id).await? else {
            return Err(GameError::CurrentGameNotFound);
        };

        let guess = game.add_guess(word);

        let row = sqlx::query(
            "INSERT INTO guesses (game_id, word_id, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(guess.game_id)
        .bind(guess.word.id)
        .bind(guess.created_at.naive_utc())
        .fetch_one(&mut *tx)
        .await?;

        let guess_id: i64 = row.get("id");
        if let Some(last) = game.guesses.last_mut() {
            last.id = guess_id;
        }

        if !game.is_playing {
            sqlx::query("UPDATE games SET is_playing = $1, is_won = $2, updated_at = $3 WHERE id = $4")
                .bind(game.is_playing)
                .bind(game.is_won)
                .bind(game.updated_at.naive_utc())
                .bind(game.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(game)
    }

    async fn save_words(&self, words: &[String]) -> GameResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO words (word, created_at)
            SELECT DISTINCT w, $2 FROM UNNEST($1::text[]) AS w
            ON CONFLICT (word) DO NOTHING
            "#,
        )
        .bind(words)
        .bind(Utc::now().naive_utc())
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
