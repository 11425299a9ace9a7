use game_types::{GameId, GameStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("game {game_id} is {status}, not in the lobby")]
    NotInLobby { game_id: GameId, status: GameStatus },

    #[error("can't start game {0} without players")]
    NoPlayers(GameId),
}
