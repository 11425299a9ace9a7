use game_types::{GameId, PlayerId, ServerMessage};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A websocket client. It listens to at most one game, and is bound to a
/// player of that game once it proved the player's token.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub game_id: Option<GameId>,
    pub player_id: Option<PlayerId>,
    pub connected_at: Instant,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let connection = Self {
            id,
            game_id: None,
            player_id: None,
            connected_at: Instant::now(),
            sender,
        };

        (connection, receiver)
    }

    /// Rebind the connection, returning the game and player it listened as
    /// before.
    pub fn listen_to(
        &mut self,
        game_id: GameId,
        player_id: Option<PlayerId>,
    ) -> (Option<GameId>, Option<PlayerId>) {
        let previous_game = self.game_id.replace(game_id);
        let previous_player = std::mem::replace(&mut self.player_id, player_id);
        (previous_game, previous_player)
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }

    fn is_in_game(&self, game_id: &str) -> bool {
        self.game_id.as_deref() == Some(game_id)
    }
}

pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_connection(
        &self,
        id: ConnectionId,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (conn, receiver) = Connection::new(id);

        {
            let mut connections = self.connections.write().await;
            connections.insert(id, conn);
        }

        receiver
    }

    pub async fn remove_connection(&self, id: ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.write().await;
        connections.remove(&id)
    }

    /// Subscribe a connection to a game's broadcasts, optionally as one of
    /// its players. Returns the previous binding.
    pub async fn listen_to_game(
        &self,
        id: ConnectionId,
        game_id: GameId,
        player_id: Option<PlayerId>,
    ) -> Result<(Option<GameId>, Option<PlayerId>), String> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .get_mut(&id)
            .ok_or_else(|| "Connection not found".to_string())?;
        Ok(connection.listen_to(game_id, player_id))
    }

    pub async fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connections = self.connections.read().await;
        if let Some(connection) = connections.get(&id) {
            connection.send_message(message)
        } else {
            Err("Connection not found".to_string())
        }
    }

    pub async fn send_to_game(&self, game_id: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for connection in connections.values().filter(|conn| conn.is_in_game(game_id)) {
            let _ = connection.send_message(message.clone());
        }
    }

    pub async fn get_connections_in_game(&self, game_id: &str) -> Vec<ConnectionId> {
        let connections = self.connections.read().await;
        connections
            .values()
            .filter(|conn| conn.is_in_game(game_id))
            .map(|conn| conn.id)
            .collect()
    }
}

#[cfg(test)]
impl ConnectionManager {
    async fn get_connection(&self, id: ConnectionId) -> Option<Connection> {
        let connections = self.connections.read().await;
        connections.get(&id).cloned()
    }

    async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
