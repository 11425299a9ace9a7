use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RoundTimings;
use crate::game_manager::{GameManager, RoundOutcome};
use crate::websocket::ConnectionManager;
use game_types::{GameId, RoundId, ServerMessage};

struct RoundDeadline {
    round_id: RoundId,
    handle: JoinHandle<()>,
}

/// Drives started games through their rounds: start after a grace period,
/// end on timeout or once nobody can guess, pause, start the next one.
///
/// Every timer is a tokio task. A game has at most one deadline and at most
/// one pending round start; both are aborted when the game goes away.
pub struct RoundOrchestrator {
    game_manager: Arc<GameManager>,
    connection_manager: Arc<ConnectionManager>,
    timings: RoundTimings,
    deadlines: DashMap<GameId, RoundDeadline>,
    pending_starts: DashMap<GameId, JoinHandle<()>>,
}

impl RoundOrchestrator {
    pub fn new(
        game_manager: Arc<GameManager>,
        connection_manager: Arc<ConnectionManager>,
        timings: RoundTimings,
    ) -> Self {
        Self {
            game_manager,
            connection_manager,
            timings,
            deadlines: DashMap::new(),
            pending_starts: DashMap::new(),
        }
    }

    /// The host started the game: the first round follows after the grace
    /// period.
    pub fn begin_game(self: &Arc<Self>, game_id: &str) {
        info!(
            "Game {} starts its first round in {:?}",
            game_id, self.timings.host_grace
        );
        self.schedule_round_start(game_id, self.timings.host_grace);
    }

    /// Start the next round now and arm its deadline.
    pub async fn start_round(self: &Arc<Self>, game_id: &str) -> Option<RoundId> {
        let Some((game, round_id)) = self.game_manager.start_round(game_id).await else {
            debug!("No round to start in game {}", game_id);
            return None;
        };

        self.connection_manager
            .send_to_game(game_id, ServerMessage::RoundBegan { game })
            .await;
        self.arm_deadline(game_id, round_id);
        Some(round_id)
    }

    /// End a round before its deadline. Stale round ids do nothing.
    pub async fn end_round(self: &Arc<Self>, game_id: &str, round_id: RoundId) {
        if let Some((_, deadline)) = self
            .deadlines
            .remove_if(game_id, |_, deadline| deadline.round_id == round_id)
        {
            deadline.handle.abort();
        }

        self.finish_round(game_id, round_id).await;
    }

    /// Drop every timer of a game that no longer exists.
    pub fn cancel_game(&self, game_id: &str) {
        if let Some((_, deadline)) = self.deadlines.remove(game_id) {
            debug!("Cancelled deadline of round {} in game {}", deadline.round_id, game_id);
            deadline.handle.abort();
        }

        if let Some((_, handle)) = self.pending_starts.remove(game_id) {
            debug!("Cancelled pending round start in game {}", game_id);
            handle.abort();
        }
    }

    pub fn has_pending_deadline(&self, game_id: &str) -> bool {
        self.deadlines.contains_key(game_id)
    }

    pub fn has_pending_start(&self, game_id: &str) -> bool {
        self.pending_starts.contains_key(game_id)
    }

    fn schedule_round_start(self: &Arc<Self>, game_id: &str, delay: Duration) {
        let orchestrator = Arc::clone(self);
        let id = game_id.to_string();

        let (registered, on_registered) = oneshot::channel();

        let handle = tokio::spawn(async move {
            // The timer only runs once its handle is in the map
            if on_registered.await.is_err() {
                return;
            }
            tokio::time::sleep(delay).await;
            orchestrator.pending_starts.remove(&id);
            orchestrator.start_round(&id).await;
        });

        if let Some(previous) = self.pending_starts.insert(game_id.to_string(), handle) {
            previous.abort();
        }
        let _ = registered.send(());
    }

    fn arm_deadline(self: &Arc<Self>, game_id: &str, round_id: RoundId) {
        let orchestrator = Arc::clone(self);
        let id = game_id.to_string();
        let duration = self.timings.round_duration;

        let (registered, on_registered) = oneshot::channel();

        let handle = tokio::spawn(async move {
            if on_registered.await.is_err() {
                return;
            }
            tokio::time::sleep(duration).await;
            orchestrator.on_deadline(&id, round_id).await;
        });

        let deadline = RoundDeadline { round_id, handle };
        if let Some(previous) = self.deadlines.insert(game_id.to_string(), deadline) {
            previous.handle.abort();
        }
        let _ = registered.send(());
    }

    async fn on_deadline(self: &Arc<Self>, game_id: &str, round_id: RoundId) {
        // Unregister without aborting, this task is the one running
        if self
            .deadlines
            .remove_if(game_id, |_, deadline| deadline.round_id == round_id)
            .is_none()
        {
            debug!("Deadline of round {} in game {} is stale", round_id, game_id);
            return;
        }

        info!("Round {} in game {} ran out of time", round_id, game_id);
        self.finish_round(game_id, round_id).await;
    }

    async fn finish_round(self: &Arc<Self>, game_id: &str, round_id: RoundId) {
        let Some(outcome) = self.game_manager.end_round(game_id, round_id).await else {
            debug!("Round {} in game {} already ended", round_id, game_id);
            return;
        };

        let RoundOutcome {
            game,
            round,
            answer,
            game_finished,
        } = outcome;

        info!("Round {} in game {} ended", round_id, game_id);
        self.connection_manager
            .send_to_game(
                game_id,
                ServerMessage::RoundEnded {
                    game: game.clone(),
                    round,
                    answer,
                },
            )
            .await;

        if game_finished {
            info!("Game {} is over", game_id);
            self.connection_manager
                .send_to_game(game_id, ServerMessage::GameEnded { game })
                .await;
        } else {
            self.schedule_round_start(game_id, self.timings.inter_round_delay);
        }
    }
}
