use std::collections::HashMap;

use game_types::GameId;
use tracing::{debug, info};

use crate::{Game, Player, generate_room_code};

/// Every live game, keyed by room code.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: HashMap<GameId, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new game in the lobby under a fresh room code.
    pub fn create(&mut self, host: Player) -> &Game {
        let mut id = generate_room_code();
        while self.games.contains_key(&id) {
            debug!("Room code {} is taken, generating another", id);
            id = generate_room_code();
        }

        info!("Created game {} hosted by {}", id, host.name());
        self.games
            .entry(id.clone())
            .or_insert_with(|| Game::new(id, host))
    }

    pub fn get(&self, game_id: &str) -> Option<&Game> {
        self.games.get(game_id)
    }

    pub fn get_mut(&mut self, game_id: &str) -> Option<&mut Game> {
        self.games.get_mut(game_id)
    }

    pub fn remove(&mut self, game_id: &str) -> Option<Game> {
        let removed = self.games.remove(game_id);
        if removed.is_some() {
            info!("Removed game {}", game_id);
        }
        removed
    }

    pub fn list(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
