use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game_manager::GameManager;
use crate::orchestrator::RoundOrchestrator;
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use game_types::{ClientMessage, GameId, GuessValidity, PlayerId, RoundId, ServerMessage};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    game_manager: Arc<GameManager>,
    orchestrator: Arc<RoundOrchestrator>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        game_manager: Arc<GameManager>,
        orchestrator: Arc<RoundOrchestrator>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            game_manager,
            orchestrator,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::ListenToGame {
                game_id,
                player_id,
                token,
            } => self.handle_listen_to_game(game_id, player_id, token).await,
            ClientMessage::StartGame { game_id, token } => {
                self.handle_start_game(game_id, token).await
            }
            ClientMessage::MakeGuess {
                game_id,
                round_id,
                player_id,
                token,
                guess,
            } => {
                self.handle_make_guess(game_id, round_id, player_id, token, guess)
                    .await
            }
            ClientMessage::Heartbeat => self.handle_heartbeat().await,
        }
    }

    /// Leave the game this connection listened to. The player is dropped
    /// from the roster, and the game is destroyed once nobody listens.
    pub async fn handle_disconnect(&self) {
        let Some(connection) = self
            .connection_manager
            .remove_connection(self.connection_id)
            .await
        else {
            return;
        };

        info!(
            "Connection {} disconnected after {:?}",
            self.connection_id,
            connection.connected_at.elapsed()
        );

        if let Some(game_id) = connection.game_id {
            self.leave_game(&game_id, connection.player_id).await;
        }
    }

    /// Runs once the connection stopped listening to `game_id`.
    async fn leave_game(&self, game_id: &str, player_id: Option<PlayerId>) {
        if let Some(player_id) = player_id {
            if let Some(departure) = self.game_manager.remove_player(game_id, player_id).await {
                self.connection_manager
                    .send_to_game(game_id, ServerMessage::PlayerLeft { player_id })
                    .await;

                if let Some(round_id) = departure.completed_round {
                    self.orchestrator.end_round(game_id, round_id).await;
                }
            }
        }

        if self
            .connection_manager
            .get_connections_in_game(game_id)
            .await
            .is_empty()
        {
            info!("Last client left game {}, removing it", game_id);
            self.orchestrator.cancel_game(game_id);
            self.game_manager.remove_game(game_id).await;
        }
    }

    async fn handle_listen_to_game(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        token: String,
    ) -> Result<(), String> {
        info!("Connection {} is listening to game {}", self.connection_id, game_id);

        let Some(game) = self.game_manager.game_view(&game_id).await else {
            return self.send_error("Game not found").await;
        };

        // Anyone may watch; only a proven player is bound to the roster
        let is_player = self
            .game_manager
            .is_player_of_game(&token, &game_id, player_id)
            .await;

        let bound_player = is_player.then_some(player_id);
        let previous = self
            .connection_manager
            .listen_to_game(self.connection_id, game_id.clone(), bound_player)
            .await?;

        // Switching games or players departs the old binding first
        if let (Some(previous_game), previous_player) = previous {
            if previous_game != game_id || previous_player != bound_player {
                info!(
                    "Connection {} stopped listening to game {}",
                    self.connection_id, previous_game
                );
                self.leave_game(&previous_game, previous_player).await;
            }
        }

        if is_player {
            self.connection_manager
                .send_to_game(&game_id, ServerMessage::PlayerJoined { player_id, game })
                .await;
        } else {
            debug!(
                "Connection {} watches game {} without a valid player token",
                self.connection_id, game_id
            );
        }

        Ok(())
    }

    async fn handle_start_game(&self, game_id: GameId, token: String) -> Result<(), String> {
        info!("Connection {} attempted to start game {}", self.connection_id, game_id);

        if !self.game_manager.is_host(&token, &game_id).await {
            warn!(
                "Connection {} is not the host of game {}",
                self.connection_id, game_id
            );
            return self.send_error("Only the host can start the game").await;
        }

        match self.game_manager.start_game(&game_id).await {
            Ok(_) => {
                self.orchestrator.begin_game(&game_id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to start game {}: {}", game_id, e);
                self.send_error(&e.to_string()).await
            }
        }
    }

    async fn handle_make_guess(
        &self,
        game_id: GameId,
        round_id: RoundId,
        player_id: PlayerId,
        token: String,
        guess: String,
    ) -> Result<(), String> {
        if !self
            .game_manager
            .is_player_of_game(&token, &game_id, player_id)
            .await
        {
            warn!(
                "Connection {} sent a guess without a valid player token for game {}",
                self.connection_id, game_id
            );
            return self.send_error("Not a player of this game").await;
        }

        let outcome = self
            .game_manager
            .make_guess(&game_id, round_id, player_id, &guess)
            .await;

        self.send_message(ServerMessage::MakeGuessResponse {
            guess: outcome.guess,
            validity: outcome.validity,
        })
        .await?;

        if let (GuessValidity::Valid, Some(game)) = (outcome.validity, outcome.game) {
            self.connection_manager
                .send_to_game(&game_id, ServerMessage::GuessMade { game })
                .await;
        }

        if let Some(round_id) = outcome.completed_round {
            info!("Nobody is guessing anymore in game {}, ending the round", game_id);
            self.orchestrator.end_round(&game_id, round_id).await;
        }

        Ok(())
    }

    async fn handle_heartbeat(&self) -> Result<(), String> {
        debug!("Heartbeat from connection {}", self.connection_id);
        Ok(())
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    async fn send_error(&self, error: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: error.to_string(),
        })
        .await
    }
}
