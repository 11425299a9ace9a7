pub mod error;
pub mod game_state;
pub mod player;
pub mod registry;
pub mod room_code;
pub mod round;
pub mod scoring;
pub mod word_validation;

// Re-export main components
pub use error::*;
pub use game_state::*;
pub use player::*;
pub use registry::*;
pub use room_code::*;
pub use round::*;
pub use scoring::*;
pub use word_validation::*;
