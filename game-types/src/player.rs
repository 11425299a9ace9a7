use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Public view of a player. Never carries the player's token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
}
