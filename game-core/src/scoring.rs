use game_types::LetterHint;

/// Points for solving on the first attempt.
pub const MAX_SCORE: i32 = 100;
/// Points lost for every attempt after the first.
pub const ATTEMPT_PENALTY: i32 = 10;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Classify each position of `guess` against `answer`.
    ///
    /// The result always has the answer's length. A position is `Found` when
    /// the letters match, `Exists` when the guessed letter appears anywhere in
    /// the answer, `None` otherwise. Positions the guess does not reach are
    /// `None`; letters past the end of the answer are ignored.
    pub fn hints_for(guess: &str, answer: &str) -> Vec<LetterHint> {
        let guess_chars: Vec<char> = guess.chars().collect();
        let answer_chars: Vec<char> = answer.chars().collect();

        answer_chars
            .iter()
            .enumerate()
            .map(|(i, expected)| match guess_chars.get(i) {
                Some(ch) if ch == expected => LetterHint::Found,
                Some(ch) if answer_chars.contains(ch) => LetterHint::Exists,
                _ => LetterHint::None,
            })
            .collect()
    }

    /// Score for a player's guess history: only a history ending on the
    /// answer scores, and each extra attempt costs `ATTEMPT_PENALTY`.
    pub fn score_for(guesses: &[String], answer: &str) -> i32 {
        match guesses.last() {
            Some(last) if last == answer => {
                MAX_SCORE - ATTEMPT_PENALTY * (guesses.len() as i32 - 1)
            }
            _ => 0,
        }
    }

    pub fn is_solved(hints: &[LetterHint]) -> bool {
        hints.iter().all(|hint| *hint == LetterHint::Found)
    }
}
