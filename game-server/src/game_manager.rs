use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use game_core::{GameError, GameRegistry, Player, WordSource};
use game_types::{
    GameStatus, GameView, GuessValidity, JoinGameResponse, PlayerId, PlayerView, RoundId,
    RoundView,
};

/// A round that was just finished, with its answer revealed.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub game: GameView,
    pub round: RoundView,
    pub answer: String,
    pub game_finished: bool,
}

#[derive(Debug, Clone)]
pub struct GuessOutcome {
    /// The guess as stored, after normalization.
    pub guess: String,
    pub validity: GuessValidity,
    pub game: Option<GameView>,
    /// Set when nobody in the roster can guess anymore in the current round.
    pub completed_round: Option<RoundId>,
}

#[derive(Debug, Clone)]
pub struct DepartureOutcome {
    pub game: GameView,
    pub completed_round: Option<RoundId>,
}

/// Owns every live game and serializes all mutations to them.
pub struct GameManager {
    registry: RwLock<GameRegistry>,
    words: Arc<dyn WordSource>,
}

impl GameManager {
    pub fn new(words: Arc<dyn WordSource>) -> Self {
        Self {
            registry: RwLock::new(GameRegistry::new()),
            words,
        }
    }

    pub async fn create_game(&self, player_name: &str) -> JoinGameResponse {
        let host = Player::new(player_name.trim());
        let player = PlayerView::from(&host);
        let token = host.token().to_string();

        let mut registry = self.registry.write().await;
        let game = registry.create(host);

        JoinGameResponse {
            game: GameView::from(game),
            player,
            token,
        }
    }

    /// Add a player to a game that is still in the lobby.
    pub async fn join_game(
        &self,
        game_id: &str,
        player_name: &str,
    ) -> Result<JoinGameResponse, GameError> {
        let mut registry = self.registry.write().await;
        let game = registry
            .get_mut(game_id)
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;

        if game.status() != GameStatus::Lobby {
            warn!("Rejected join to game {} while it is {}", game_id, game.status());
            return Err(GameError::NotInLobby {
                game_id: game_id.to_string(),
                status: game.status(),
            });
        }

        let player = Player::new(player_name.trim());
        let view = PlayerView::from(&player);
        let token = player.token().to_string();

        info!("Player {} ({}) joined game {}", view.name, view.id, game_id);
        game.add_player(player);

        Ok(JoinGameResponse {
            game: GameView::from(&*game),
            player: view,
            token,
        })
    }

    pub async fn list_games(&self) -> Vec<GameView> {
        let registry = self.registry.read().await;
        registry.list().map(GameView::from).collect()
    }

    pub async fn game_view(&self, game_id: &str) -> Option<GameView> {
        let registry = self.registry.read().await;
        registry.get(game_id).map(GameView::from)
    }

    pub async fn is_host(&self, token: &str, game_id: &str) -> bool {
        let registry = self.registry.read().await;
        registry
            .get(game_id)
            .is_some_and(|game| game.is_host_token(token))
    }

    pub async fn is_player_of_game(&self, token: &str, game_id: &str, player_id: PlayerId) -> bool {
        let registry = self.registry.read().await;
        registry
            .get(game_id)
            .is_some_and(|game| game.is_player_token(player_id, token))
    }

    pub async fn start_game(&self, game_id: &str) -> Result<GameView, GameError> {
        let mut registry = self.registry.write().await;
        let game = registry
            .get_mut(game_id)
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))?;

        game.start()?;
        Ok(GameView::from(&*game))
    }

    /// Start the next round with a fresh answer.
    pub async fn start_round(&self, game_id: &str) -> Option<(GameView, RoundId)> {
        let mut registry = self.registry.write().await;
        let game = registry.get_mut(game_id)?;

        let round_id = game.start_round(self.words.random_word())?.id();
        Some((GameView::from(&*game), round_id))
    }

    /// End `round_id` if it is still the game's current round. A round that
    /// already ended, or a game that is gone, yields `None`.
    pub async fn end_round(&self, game_id: &str, round_id: RoundId) -> Option<RoundOutcome> {
        let mut registry = self.registry.write().await;
        let game = registry.get_mut(game_id)?;

        if game.current_round().map(|round| round.id()) != Some(round_id) {
            debug!("Round {} is no longer current in game {}", round_id, game_id);
            return None;
        }

        let (round, answer) = {
            let round = game.end_round()?;
            (RoundView::from(round), round.answer().to_string())
        };

        Some(RoundOutcome {
            game: GameView::from(&*game),
            round,
            answer,
            game_finished: game.status() == GameStatus::Finished,
        })
    }

    /// Record a guess. It is valid only when it is a dictionary word and the
    /// round accepted it.
    pub async fn make_guess(
        &self,
        game_id: &str,
        round_id: RoundId,
        player_id: PlayerId,
        guess: &str,
    ) -> GuessOutcome {
        let guess = guess.trim().to_lowercase();
        let mut registry = self.registry.write().await;

        let Some(game) = registry.get_mut(game_id) else {
            return GuessOutcome {
                guess,
                validity: GuessValidity::Invalid,
                game: None,
                completed_round: None,
            };
        };

        let accepted = self.words.is_valid_word(&guess)
            && game
                .round_mut(round_id)
                .is_some_and(|round| round.add_guess(player_id, guess.clone()));

        let validity = if accepted {
            GuessValidity::Valid
        } else {
            debug!("Rejected guess {:?} from {} in game {}", guess, player_id, game_id);
            GuessValidity::Invalid
        };

        let completed_round = match game.current_round() {
            Some(round) if !game.are_players_still_guessing() => Some(round.id()),
            _ => None,
        };

        GuessOutcome {
            guess,
            validity,
            game: Some(GameView::from(&*game)),
            completed_round,
        }
    }

    /// Drop a player from the roster. Reports the current round as complete
    /// when the departure leaves nobody guessing.
    pub async fn remove_player(&self, game_id: &str, player_id: PlayerId) -> Option<DepartureOutcome> {
        let mut registry = self.registry.write().await;
        let game = registry.get_mut(game_id)?;
        let player = game.remove_player(player_id)?;
        info!("Player {} ({}) left game {}", player.name(), player_id, game_id);

        let completed_round = match game.current_round() {
            Some(round) if !game.are_players_still_guessing() => Some(round.id()),
            _ => None,
        };

        Some(DepartureOutcome {
            game: GameView::from(&*game),
            completed_round,
        })
    }

    pub async fn remove_game(&self, game_id: &str) -> bool {
        let mut registry = self.registry.write().await;
        registry.remove(game_id).is_some()
    }

    pub async fn game_count(&self) -> usize {
        let registry = self.registry.read().await;
        registry.len()
    }
}
