use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use ts_rs::TS;

use crate::{GameId, PlayerId, PlayerView, RoundId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum GameStatus {
    Lobby,    // Accepting players, waiting for the host
    Active,   // Rounds are being played
    Finished, // All rounds played
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Lobby => write!(f, "lobby"),
            GameStatus::Active => write!(f, "active"),
            GameStatus::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum RoundStatus {
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum LetterHint {
    None,   // Letter not in the answer
    Exists, // Letter in the answer, other position
    Found,  // Letter in the correct position
}

/// Public view of a round. The answer and the raw guesses are left out;
/// clients only see the derived hints and scores.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    pub id: RoundId,
    pub game_id: GameId,
    pub state: RoundStatus,
    pub word_length: u32,
    pub score_board: HashMap<PlayerId, i32>,
    pub guess_hints: HashMap<PlayerId, Vec<Vec<LetterHint>>>,
    pub started_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameView {
    pub id: GameId,
    pub host: PlayerView,
    pub state: GameStatus,
    pub current_round: Option<RoundView>,
    /// Number of rounds started so far.
    pub rounds: u32,
    pub players: Vec<PlayerView>,
    pub created_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GuessValidity {
    Valid,
    Invalid,
}
