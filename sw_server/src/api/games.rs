//! Game API handlers.
//!
//! This module provides HTTP REST endpoints for game play:
//! - Fetching the user's current game with all guesses and letter feedback
//! - Starting a new game with a randomly drawn secret word
//! - Submitting guesses against the current game
//!
//! All endpoints require authentication via JWT bearer token.
//!
//! # Examples
//!
//! Start a game:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/games/current \
//!   -H "Authorization: Bearer TOKEN"
//! ```
//!
//! Submit a guess:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/games/current/guesses \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"word": "плита"}'
//! ```

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use secret_word::auth::UserId;
use secret_word::game::{Game, GameError};
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct GuessPayload {
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct LetterView {
    pub letter: char,
    pub is_in_word: bool,
    pub is_correct_position: bool,
}

#[derive(Debug, Serialize)]
pub struct GuessView {
    pub letters: Vec<LetterView>,
}

/// Client-facing view of a game: guesses in submission order, each with its
/// letters in submission order, and the outcome (`null` while playing).
/// A derived view, recomputed from the aggregate on every response.
#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub guesses: Vec<GuessView>,
    pub is_won: Option<bool>,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        let guesses = game
            .guesses
            .iter()
            .map(|guess| GuessView {
                letters: guess
                    .letters
                    .iter()
                    .map(|l| LetterView {
                        letter: l.letter,
                        is_in_word: l.is_in_word,
                        is_correct_position: l.is_correct_position,
                    })
                    .collect(),
            })
            .collect();

        Self {
            guesses,
            is_won: game.is_won,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a game error onto its HTTP status and client-safe body.
fn error_response(err: &GameError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        GameError::CurrentGameNotFound => StatusCode::NOT_FOUND,
        GameError::CurrentGameAlreadyExists => StatusCode::CONFLICT,
        GameError::IncorrectWord => StatusCode::BAD_REQUEST,
        GameError::Database(_) => {
            tracing::error!(error = %err, "game request failed");
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

/// Get the authenticated user's current game.
///
/// # Response
///
/// Returns `200 OK` with the game view:
/// ```json
/// {
///   "guesses": [
///     {
///       "letters": [
///         {"letter": "с", "is_in_word": true, "is_correct_position": true}
///       ]
///     }
///   ],
///   "is_won": null
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: The user is not playing any game; start one first
/// - `500 Internal Server Error`: Database or server error
pub async fn current_game(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<GameResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.game_manager.find_current_game(user_id).await {
        Ok(game) => Ok(Json(GameResponse::from(&game))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Start a new game for the authenticated user.
///
/// Draws a random secret word from the dictionary and creates a playing
/// game with an empty guess list.
///
/// # Errors
///
/// - `409 Conflict`: A playing game already exists; fetch it instead
/// - `500 Internal Server Error`: Database or server error
pub async fn create_game(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<GameResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.game_manager.create_game(user_id).await {
        Ok(game) => Ok(Json(GameResponse::from(&game))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Submit a guess against the authenticated user's current game.
///
/// The word must be a recognized 5-letter dictionary noun; the dictionary
/// check runs before any game state is touched.
///
/// # Request Body
///
/// ```json
/// {"word": "плита"}
/// ```
///
/// # Response
///
/// On success, returns `201 Created` with the updated game view, including
/// the new guess's letter feedback and the outcome once decided.
///
/// # Errors
///
/// - `400 Bad Request`: The word is not a recognized 5-letter noun
/// - `404 Not Found`: The user is not playing any game
/// - `500 Internal Server Error`: Database or server error
pub async fn guess(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    Json(payload): Json<GuessPayload>,
) -> Result<(StatusCode, Json<GameResponse>), (StatusCode, Json<ErrorResponse>)> {
    match state.game_manager.guess(user_id, &payload.word).await {
        Ok(game) => Ok((StatusCode::CREATED, Json(GameResponse::from(&game)))),
        Err(e) => Err(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secret_word::game::entities::Word;

    fn sample_game() -> Game {
        let mut game = Game::new(Word::with_text(1, "сковы"), 42);
        game.add_guess(&Word::with_text(2, "совка"));
        game
    }

    #[test]
    fn response_shape_matches_the_contract() {
        let game = sample_game();
        let json = serde_json::to_value(GameResponse::from(&game)).unwrap();

        assert!(json["is_won"].is_null());
        let letters = json["guesses"][0]["letters"].as_array().unwrap();
        assert_eq!(letters.len(), 5);
        assert_eq!(letters[0]["letter"], "с");
        assert_eq!(letters[0]["is_in_word"], true);
        assert_eq!(letters[0]["is_correct_position"], true);
        assert_eq!(letters[4]["letter"], "а");
        assert_eq!(letters[4]["is_in_word"], false);
    }

    #[test]
    fn letters_keep_submission_order() {
        let game = sample_game();
        let response = GameResponse::from(&game);

        let letters: String = response.guesses[0]
            .letters
            .iter()
            .map(|l| l.letter)
            .collect();
        assert_eq!(letters, "совка");
    }

    #[test]
    fn decided_game_serializes_its_outcome() {
        let mut game = Game::new(Word::with_text(1, "сковы"), 42);
        game.add_guess(&Word::with_text(1, "сковы"));

        let json = serde_json::to_value(GameResponse::from(&game)).unwrap();
        assert_eq!(json["is_won"], true);
    }
}
