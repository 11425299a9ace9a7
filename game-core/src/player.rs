use game_types::{PlayerId, PlayerView};
use uuid::Uuid;

/// A participant of one game. The token is the player's only credential and
/// is handed out once, in the create/join response.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    token: String,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            token: Uuid::new_v4().to_string(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.token == token
    }
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        PlayerView {
            id: player.id,
            name: player.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_get_distinct_credentials() {
        let alice = Player::new("Alice");
        let bob = Player::new("Bob");

        assert_ne!(alice.id(), bob.id());
        assert_ne!(alice.token(), bob.token());
        assert!(alice.has_token(alice.token()));
        assert!(!alice.has_token(bob.token()));
    }

    #[test]
    fn test_view_omits_token() {
        let alice = Player::new("Alice");
        let view = PlayerView::from(&alice);

        assert_eq!(view.id, alice.id());
        assert_eq!(view.name, "Alice");
    }
}
