use game_core::{Game, GameRegistry, Player, WordList};
use game_types::{GameId, PlayerId};

pub const TEST_WORDS: &str = "apple\nangle\nhouse\nmouse\ntrain\nplane\nwater\nstone\nbread\ncream";

/// Creates a test WordList with a known set of words
pub fn create_test_words() -> WordList {
    WordList::from_word_list(TEST_WORDS, 5).unwrap()
}

/// Creates a lobby game hosted by the first name, with the rest joined in order
pub fn create_lobby_game(registry: &mut GameRegistry, names: &[&str]) -> (GameId, Vec<PlayerId>) {
    let mut players = names.iter().map(|name| Player::new(*name));
    let host = players.next().expect("a host");
    let game_id = registry.create(host).id().to_string();

    let game = registry.get_mut(&game_id).unwrap();
    for player in players {
        game.add_player(player);
    }

    let ids = game.players().iter().map(Player::id).collect();
    (game_id, ids)
}

/// Creates a started game with no round in progress
pub fn create_active_game(registry: &mut GameRegistry, names: &[&str]) -> (GameId, Vec<PlayerId>) {
    let (game_id, ids) = create_lobby_game(registry, names);
    registry.get_mut(&game_id).unwrap().start().unwrap();
    (game_id, ids)
}

/// Submits guesses to the current round, asserting each one is accepted
pub fn submit_guesses(game: &mut Game, guesses: &[(PlayerId, &str)]) {
    let round_id = game.current_round().expect("a round in progress").id();
    let round = game.round_mut(round_id).unwrap();
    for (player_id, word) in guesses {
        assert!(round.add_guess(*player_id, *word), "guess {} rejected", word);
    }
}
