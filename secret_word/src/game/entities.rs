use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::UserId;

/// Number of attempts allowed per game.
pub const GUESS_LIMIT: i16 = 6;

/// Word ID type
pub type WordId = i32;

/// Game ID type
pub type GameId = i64;

/// A dictionary entry. Words are ingested as 5-letter lowercase strings;
/// the game engine does not re-validate their length.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Word {
    pub id: WordId,
    pub word: String,
    pub created_at: DateTime<Utc>,
}

impl Word {
    pub fn with_text(id: WordId, word: impl Into<String>) -> Self {
        Self {
            id,
            word: word.into(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word)
    }
}

/// Per-letter feedback for one position of a submitted word.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LetterFeedback {
    pub letter: char,
    pub is_in_word: bool,
    pub is_correct_position: bool,
}

/// Compare a submitted word against the secret word, letter by letter.
///
/// A letter is `is_in_word` when it occurs anywhere in the secret word and
/// `is_correct_position` when it matches the secret's letter at the same
/// index. The membership check carries no duplicate-letter budget: when the
/// secret holds a single occurrence of a letter, every occurrence of that
/// letter in the guess still reports `is_in_word`. Comparison is per `char`,
/// never per byte.
pub fn evaluate(secret: &str, submitted: &str) -> Vec<LetterFeedback> {
    let secret: Vec<char> = secret.chars().collect();

    submitted
        .chars()
        .enumerate()
        .map(|(i, letter)| LetterFeedback {
            letter,
            is_in_word: secret.contains(&letter),
            is_correct_position: secret.get(i).is_some_and(|&s| s == letter),
        })
        .collect()
}

/// One attempt at the secret word, immutable once created. Letter feedback
/// is derived from the submitted and secret words at construction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Guess {
    pub id: i64,
    pub game_id: GameId,
    pub word: Word,
    pub letters: Vec<LetterFeedback>,
    pub created_at: DateTime<Utc>,
}

impl Guess {
    pub fn new(game_id: GameId, word: Word, secret: &str) -> Self {
        let letters = evaluate(secret, &word.word);
        Self {
            id: 0,
            game_id,
            word,
            letters,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle state of a [`Game`]. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        write!(f, "{repr}")
    }
}

/// One play session: a secret word, an append-only guess sequence, and the
/// playing/won outcome flags. The aggregate owns its guesses; the secret
/// word is shared read-only with the dictionary.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Game {
    pub id: GameId,
    pub user_id: UserId,
    pub guess_limit: i16,
    pub is_playing: bool,
    /// `None` while playing, `Some` once the game is decided. Never left
    /// undetermined after `is_playing` turns false.
    pub is_won: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub word: Word,
    pub guesses: Vec<Guess>,
}

impl Game {
    /// Create a fresh game in the Playing state for the given user.
    pub fn new(word: Word, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            guess_limit: GUESS_LIMIT,
            is_playing: true,
            is_won: None,
            created_at: now,
            updated_at: now,
            word,
            guesses: Vec::new(),
        }
    }

    /// Apply one guess to the game.
    ///
    /// The word is assumed to be a real dictionary entry; validity checking
    /// belongs to the orchestration layer. The guess is appended with its
    /// letter feedback, then the lifecycle transition runs: an exact match
    /// wins, otherwise reaching the guess limit loses, otherwise the game
    /// keeps playing with no outcome set.
    ///
    /// Total over valid inputs. Callers must not invoke this on a finished
    /// game; the orchestration layer rejects guesses against non-playing
    /// games before ever reaching the entity.
    pub fn add_guess(&mut self, word: &Word) -> Guess {
        let guess = Guess::new(self.id, word.clone(), &self.word.word);
        self.guesses.push(guess.clone());

        if word.word == self.word.word {
            self.is_playing = false;
            self.is_won = Some(true);
        } else if self.guesses.len() >= usize::try_from(self.guess_limit).unwrap_or(0) {
            self.is_playing = false;
            self.is_won = Some(false);
        }
        self.updated_at = Utc::now();

        guess
    }

    pub fn status(&self) -> GameStatus {
        match self.is_won {
            None => GameStatus::Playing,
            Some(true) => GameStatus::Won,
            Some(false) => GameStatus::Lost,
        }
    }
}
