use std::collections::HashMap;

use game_types::{GameId, LetterHint, PlayerId, RoundId, RoundStatus, RoundView};
use tracing::warn;
use uuid::Uuid;

use crate::{Player, ScoringEngine};

pub const MAX_GUESSES: usize = 6;

/// One round of a game: a hidden answer and the guesses of every player who
/// was in the roster when the round started.
#[derive(Debug, Clone)]
pub struct Round {
    id: RoundId,
    game_id: GameId,
    answer: String,
    state: RoundStatus,
    player_guesses: HashMap<PlayerId, Vec<String>>,
    started_at: String,
}

impl Round {
    pub fn new(game_id: impl Into<GameId>, answer: impl Into<String>, players: &[Player]) -> Self {
        let player_guesses = players
            .iter()
            .map(|player| (player.id(), Vec::new()))
            .collect();

        Self {
            id: Uuid::new_v4(),
            game_id: game_id.into(),
            answer: answer.into(),
            state: RoundStatus::Active,
            player_guesses,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn state(&self) -> RoundStatus {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoundStatus::Finished
    }

    pub fn has_player(&self, player_id: PlayerId) -> bool {
        self.player_guesses.contains_key(&player_id)
    }

    pub fn guesses(&self, player_id: PlayerId) -> Option<&[String]> {
        self.player_guesses.get(&player_id).map(Vec::as_slice)
    }

    /// Record a guess. Returns `false` without touching the round when it is
    /// finished, the player did not take part, the player already found the
    /// answer, or the player is out of attempts.
    pub fn add_guess(&mut self, player_id: PlayerId, guess: impl Into<String>) -> bool {
        if self.is_finished() {
            warn!("Round {} is already finished for game {}", self.id, self.game_id);
            return false;
        }

        let Some(guesses) = self.player_guesses.get_mut(&player_id) else {
            warn!("Player {} is not part of round {} in game {}", player_id, self.id, self.game_id);
            return false;
        };

        let already_solved = guesses.last().is_some_and(|last| *last == self.answer);
        if already_solved || guesses.len() >= MAX_GUESSES {
            return false;
        }

        guesses.push(guess.into());
        true
    }

    pub fn finish(&mut self) {
        self.state = RoundStatus::Finished;
    }

    pub fn score_board(&self) -> HashMap<PlayerId, i32> {
        self.player_guesses
            .iter()
            .map(|(player_id, guesses)| (*player_id, ScoringEngine::score_for(guesses, &self.answer)))
            .collect()
    }

    pub fn guess_hints(&self) -> HashMap<PlayerId, Vec<Vec<LetterHint>>> {
        self.player_guesses
            .keys()
            .map(|player_id| (*player_id, self.hints_for_player(*player_id)))
            .collect()
    }

    pub fn hints_for_player(&self, player_id: PlayerId) -> Vec<Vec<LetterHint>> {
        self.player_guesses
            .get(&player_id)
            .map(|guesses| {
                guesses
                    .iter()
                    .map(|guess| ScoringEngine::hints_for(guess, &self.answer))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A player keeps guessing until they run out of attempts or their last
    /// guess is fully correct. Players outside the round never guess.
    pub fn is_player_still_guessing(&self, player_id: PlayerId) -> bool {
        let Some(guesses) = self.player_guesses.get(&player_id) else {
            return false;
        };

        if guesses.len() >= MAX_GUESSES {
            return false;
        }

        match guesses.last() {
            None => true,
            Some(last) => !ScoringEngine::is_solved(&ScoringEngine::hints_for(last, &self.answer)),
        }
    }
}

impl From<&Round> for RoundView {
    fn from(round: &Round) -> Self {
        RoundView {
            id: round.id,
            game_id: round.game_id.clone(),
            state: round.state,
            word_length: round.answer.chars().count() as u32,
            score_board: round.score_board(),
            guess_hints: round.guess_hints(),
            started_at: round.started_at.clone(),
        }
    }
}
