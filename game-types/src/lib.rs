pub mod errors;
pub mod game;
pub mod messages;
pub mod player;

/// Room code shared with players to join a game.
pub type GameId = String;
pub type PlayerId = uuid::Uuid;
pub type RoundId = uuid::Uuid;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use player::*;
