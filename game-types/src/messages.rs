use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, GameView, GuessValidity, PlayerId, PlayerView, RoundId, RoundView};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ClientMessage {
    ListenToGame {
        game_id: GameId,
        player_id: PlayerId,
        token: String,
    },
    StartGame {
        game_id: GameId,
        token: String,
    },
    MakeGuess {
        game_id: GameId,
        round_id: RoundId,
        player_id: PlayerId,
        token: String,
        guess: String,
    },
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum ServerMessage {
    PlayerJoined { player_id: PlayerId, game: GameView },
    PlayerLeft { player_id: PlayerId },
    RoundBegan { game: GameView },
    RoundEnded {
        game: GameView,
        round: RoundView,
        answer: String,
    },
    GameEnded { game: GameView },
    GuessMade { game: GameView },
    MakeGuessResponse {
        guess: String,
        validity: GuessValidity,
    },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateGameRequest {
    pub player_name: String,
}

/// Returned to the creating or joining player only; carries their token.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JoinGameResponse {
    pub game: GameView,
    pub player: PlayerView,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_tags_are_camel_case() {
        let json = r#"{"makeGuess":{"game_id":"ABCD","round_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","player_id":"67e55044-10b1-426f-9247-bb680e5fe0c9","token":"t","guess":"apple"}}"#;
        let message: ClientMessage = serde_json::from_str(json).unwrap();
        match message {
            ClientMessage::MakeGuess { game_id, guess, .. } => {
                assert_eq!(game_id, "ABCD");
                assert_eq!(guess, "apple");
            }
            other => panic!("Expected MakeGuess, got {:?}", other),
        }

        let heartbeat: ClientMessage = serde_json::from_str(r#""heartbeat""#).unwrap();
        assert!(matches!(heartbeat, ClientMessage::Heartbeat));
    }

    #[test]
    fn test_guess_response_wire_format() {
        let message = ServerMessage::MakeGuessResponse {
            guess: "apple".to_string(),
            validity: GuessValidity::Invalid,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"makeGuessResponse":{"guess":"apple","validity":"invalid"}}"#
        );
    }
}
