use game_types::{GameId, GameStatus, GameView, PlayerId, PlayerView, RoundId, RoundView};
use tracing::{info, warn};

use crate::{GameError, Player, Round};

pub const MAX_ROUNDS: usize = 3;

/// A match played in one room.
///
/// Lifecycle:
///
/// ```text
/// Lobby --start()--> Active --end_round() [rounds == MAX_ROUNDS]--> Finished
///                    Active --end_round() [rounds <  MAX_ROUNDS]--> Active
/// ```
///
/// Nothing leaves `Finished`. A current round exists only while the game is
/// `Active` and that round is still being played.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    host: Player,
    status: GameStatus,
    players: Vec<Player>,
    rounds: Vec<Round>,
    current_round: Option<RoundId>,
    created_at: String,
}

impl Game {
    pub fn new(id: impl Into<GameId>, host: Player) -> Self {
        Self {
            id: id.into(),
            players: vec![host.clone()],
            host,
            status: GameStatus::Lobby,
            rounds: Vec::new(),
            current_round: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host(&self) -> &Player {
        &self.host
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Roster in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    /// Add a player to the roster. Callers only do this while the game is in
    /// the lobby; the game itself does not check.
    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id() == player_id)?;
        Some(self.players.remove(index))
    }

    pub fn is_host_token(&self, token: &str) -> bool {
        self.host.has_token(token)
    }

    pub fn is_player_token(&self, player_id: PlayerId, token: &str) -> bool {
        self.player(player_id).is_some_and(|p| p.has_token(token))
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Lobby {
            return Err(GameError::NotInLobby {
                game_id: self.id.clone(),
                status: self.status,
            });
        }

        if self.players.is_empty() {
            return Err(GameError::NoPlayers(self.id.clone()));
        }

        self.status = GameStatus::Active;
        info!("Game {} started with {} players", self.id, self.players.len());
        Ok(())
    }

    /// Start a round over the current roster. Returns `None` if the game is
    /// not active, a round is still in progress, or all rounds were played.
    pub fn start_round(&mut self, word: impl Into<String>) -> Option<&Round> {
        if self.status != GameStatus::Active {
            warn!("Can't start a round in game {} while it is {}", self.id, self.status);
            return None;
        }

        if let Some(round_id) = self.current_round {
            warn!("Round {} is still in progress in game {}", round_id, self.id);
            return None;
        }

        if self.rounds.len() >= MAX_ROUNDS {
            warn!("Game {} already played {} rounds", self.id, MAX_ROUNDS);
            return None;
        }

        let round = Round::new(self.id.clone(), word, &self.players);
        info!(
            "Starting round {} ({}/{}) in game {}",
            round.id(),
            self.rounds.len() + 1,
            MAX_ROUNDS,
            self.id
        );

        self.current_round = Some(round.id());
        self.rounds.push(round);
        self.rounds.last()
    }

    /// Finish the current round and return it. Once `MAX_ROUNDS` rounds were
    /// played the game is finished. Without a round in progress this does
    /// nothing.
    pub fn end_round(&mut self) -> Option<&Round> {
        let round_id = self.current_round.take()?;
        let index = self.rounds.iter().position(|r| r.id() == round_id)?;
        self.rounds[index].finish();

        if self.rounds.len() >= MAX_ROUNDS {
            self.status = GameStatus::Finished;
            info!("Game {} finished after {} rounds", self.id, self.rounds.len());
        }

        Some(&self.rounds[index])
    }

    pub fn current_round(&self) -> Option<&Round> {
        let round_id = self.current_round?;
        self.round(round_id)
    }

    pub fn round(&self, round_id: RoundId) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id() == round_id)
    }

    pub fn round_mut(&mut self, round_id: RoundId) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.id() == round_id)
    }

    /// Rounds in the order they were started.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Whether anyone in the roster can still guess in the current round.
    pub fn are_players_still_guessing(&self) -> bool {
        let Some(round) = self.current_round() else {
            return false;
        };

        if round.is_finished() {
            return false;
        }

        self.players
            .iter()
            .any(|player| round.is_player_still_guessing(player.id()))
    }
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        GameView {
            id: game.id.clone(),
            host: PlayerView::from(&game.host),
            state: game.status,
            current_round: game.current_round().map(RoundView::from),
            rounds: game.rounds.len() as u32,
            players: game.players.iter().map(PlayerView::from).collect(),
            created_at: game.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_GUESSES;

    fn create_active_game(names: &[&str]) -> (Game, Vec<PlayerId>) {
        let mut players = names.iter().map(|name| Player::new(*name));
        let host = players.next().expect("at least one player");
        let mut game = Game::new("ABCD", host);
        for player in players {
            game.add_player(player);
        }
        game.start().unwrap();
        let ids = game.players().iter().map(Player::id).collect();
        (game, ids)
    }

    #[test]
    fn test_new_game_is_lobby_with_host() {
        let host = Player::new("Alice");
        let host_id = host.id();
        let game = Game::new("ABCD", host);

        assert_eq!(game.status(), GameStatus::Lobby);
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.host().id(), host_id);
        assert!(game.rounds().is_empty());
        assert!(game.current_round().is_none());
    }

    #[test]
    fn test_roster_keeps_join_order() {
        let mut game = Game::new("ABCD", Player::new("Alice"));
        game.add_player(Player::new("Bob"));
        game.add_player(Player::new("Carol"));

        let names: Vec<&str> = game.players().iter().map(Player::name).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_start_only_from_lobby() {
        let (mut game, _) = create_active_game(&["Alice"]);
        assert_eq!(game.status(), GameStatus::Active);

        let err = game.start().unwrap_err();
        assert!(matches!(err, GameError::NotInLobby { .. }));
        assert_eq!(game.status(), GameStatus::Active);
    }

    #[test]
    fn test_start_requires_players() {
        let host = Player::new("Alice");
        let host_id = host.id();
        let mut game = Game::new("ABCD", host);
        game.remove_player(host_id);

        assert_eq!(game.start(), Err(GameError::NoPlayers("ABCD".to_string())));
        assert_eq!(game.status(), GameStatus::Lobby);
    }

    #[test]
    fn test_start_round_requires_active_game() {
        let mut game = Game::new("ABCD", Player::new("Alice"));
        assert!(game.start_round("apple").is_none());
        assert!(game.rounds().is_empty());
    }

    #[test]
    fn test_start_round_snapshots_roster() {
        let (mut game, ids) = create_active_game(&["Alice", "Bob"]);
        let round_id = game.start_round("apple").unwrap().id();

        let late = Player::new("Carol");
        let late_id = late.id();
        game.add_player(late);

        let round = game.round(round_id).unwrap();
        assert!(round.has_player(ids[0]));
        assert!(round.has_player(ids[1]));
        assert!(!round.has_player(late_id));
        assert_eq!(game.current_round().map(Round::id), Some(round_id));
    }

    #[test]
    fn test_only_one_round_in_progress() {
        let (mut game, _) = create_active_game(&["Alice"]);
        let first = game.start_round("apple").unwrap().id();

        assert!(game.start_round("angle").is_none());
        assert_eq!(game.rounds().len(), 1);
        assert_eq!(game.current_round().unwrap().id(), first);
    }

    #[test]
    fn test_end_round_clears_current_round() {
        let (mut game, _) = create_active_game(&["Alice"]);
        let round_id = game.start_round("apple").unwrap().id();

        let ended = game.end_round().unwrap();
        assert_eq!(ended.id(), round_id);
        assert!(ended.is_finished());
        assert_eq!(ended.answer(), "apple");

        assert!(game.current_round().is_none());
        assert!(game.round(round_id).unwrap().is_finished());
        assert_eq!(game.status(), GameStatus::Active);
    }

    #[test]
    fn test_end_round_twice_is_safe() {
        let (mut game, _) = create_active_game(&["Alice"]);
        game.start_round("apple");

        assert!(game.end_round().is_some());
        assert!(game.end_round().is_none());
        assert_eq!(game.status(), GameStatus::Active);
        assert_eq!(game.rounds().len(), 1);
    }

    #[test]
    fn test_end_round_without_round_is_safe() {
        let mut game = Game::new("ABCD", Player::new("Alice"));
        assert!(game.end_round().is_none());
        assert_eq!(game.status(), GameStatus::Lobby);
    }

    #[test]
    fn test_game_finishes_after_max_rounds() {
        let (mut game, _) = create_active_game(&["Alice", "Bob"]);

        for round in 1..=MAX_ROUNDS {
            assert_eq!(game.status(), GameStatus::Active);
            assert!(game.start_round("apple").is_some(), "round {}", round);
            assert!(game.end_round().is_some());
        }

        assert_eq!(game.status(), GameStatus::Finished);
        assert!(game.start_round("apple").is_none());
        assert!(game.end_round().is_none());
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.rounds().len(), MAX_ROUNDS);
    }

    #[test]
    fn test_players_still_guessing_without_round() {
        let (game, _) = create_active_game(&["Alice"]);
        assert!(!game.are_players_still_guessing());
    }

    #[test]
    fn test_players_still_guessing_with_empty_roster() {
        let (mut game, ids) = create_active_game(&["Alice"]);
        game.start_round("apple");
        game.remove_player(ids[0]);

        assert!(game.players().is_empty());
        assert!(!game.are_players_still_guessing());
    }

    #[test]
    fn test_players_done_when_everyone_finished() {
        let (mut game, ids) = create_active_game(&["Alice", "Bob"]);
        let round_id = game.start_round("apple").unwrap().id();
        assert!(game.are_players_still_guessing());

        let round = game.round_mut(round_id).unwrap();
        for _ in 0..MAX_GUESSES {
            assert!(round.add_guess(ids[0], "alpha"));
        }
        assert!(game.are_players_still_guessing());

        game.round_mut(round_id).unwrap().add_guess(ids[1], "apple");
        assert!(!game.are_players_still_guessing());
    }

    #[test]
    fn test_departed_player_does_not_hold_round() {
        let (mut game, ids) = create_active_game(&["Alice", "Bob"]);
        let round_id = game.start_round("apple").unwrap().id();
        game.round_mut(round_id).unwrap().add_guess(ids[0], "apple");
        assert!(game.are_players_still_guessing());

        game.remove_player(ids[1]);
        assert!(!game.are_players_still_guessing());
    }

    #[test]
    fn test_tokens() {
        let (mut game, ids) = create_active_game(&["Alice", "Bob"]);
        let host_token = game.host().token().to_string();
        let bob_token = game.player(ids[1]).unwrap().token().to_string();

        assert!(game.is_host_token(&host_token));
        assert!(!game.is_host_token(&bob_token));
        assert!(game.is_player_token(ids[1], &bob_token));
        assert!(!game.is_player_token(ids[0], &bob_token));

        game.remove_player(ids[1]);
        assert!(!game.is_player_token(ids[1], &bob_token));
    }

    #[test]
    fn test_view_reports_round_count_and_hides_tokens() {
        let (mut game, _) = create_active_game(&["Alice", "Bob"]);
        game.start_round("apple");

        let view = GameView::from(&game);
        assert_eq!(view.id, "ABCD");
        assert_eq!(view.state, GameStatus::Active);
        assert_eq!(view.rounds, 1);
        assert_eq!(view.players.len(), 2);
        assert!(view.current_round.is_some());

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains(game.host().token()));
        assert!(!json.contains("apple"));

        game.end_round();
        assert!(GameView::from(&game).current_round.is_none());
    }
}
