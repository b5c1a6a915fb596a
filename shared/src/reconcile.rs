//! Score reconciliation: how a submission merges into the leaderboard and
//! how the leaderboard is ordered for display.
//!
//! Everything here is pure. Scores only ever go up for a given player, and
//! no input, however malformed, turns into an error.

use crate::{Leaderboard, ScoreRecord, Submission};
use serde_json::Value;

/// Result of coercing a raw score value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    /// The value was numeric (or a numeric string) and finite.
    Parsed(f64),
    /// Missing, non-numeric or non-finite; counts as `0.0`.
    Fallback,
}

impl Coerced {
    pub fn value(self) -> f64 {
        match self {
            Coerced::Parsed(score) => score,
            Coerced::Fallback => 0.0,
        }
    }
}

/// What [`reconcile`] did to the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// First submission for this player.
    Inserted { score: f64 },
    /// The submission beat the stored score.
    Improved { previous: f64, score: f64 },
    /// The stored score was at least as high; nothing changed.
    Unchanged { kept: f64, submitted: f64 },
}

impl Outcome {
    /// The player's stored score after reconciliation.
    pub fn stored_score(&self) -> f64 {
        match *self {
            Outcome::Inserted { score } | Outcome::Improved { score, .. } => score,
            Outcome::Unchanged { kept, .. } => kept,
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Unchanged { .. })
    }
}

pub fn coerce_score(raw: Option<&Value>) -> Coerced {
    let parsed = match raw {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        // Adding 0.0 folds -0.0 into 0.0 so it ties with other zeros
        Some(score) if score.is_finite() => Coerced::Parsed(score + 0.0),
        _ => Coerced::Fallback,
    }
}

/// Coerces any raw score into a finite float, `0.0` when that is impossible.
pub fn normalize_score(raw: Option<&Value>) -> f64 {
    coerce_score(raw).value()
}

/// Merges `submission` into `board` in place.
///
/// The first record with an exactly matching username keeps the higher of
/// the two scores; otherwise a new record is appended.
pub fn reconcile(board: &mut Leaderboard, submission: &Submission) -> Outcome {
    let submitted = normalize_score(submission.score.as_ref());
    let username = submission.resolved_username();

    match board.find_mut(username) {
        Some(record) if submitted > record.score => {
            let previous = record.score;
            record.score = submitted;
            Outcome::Improved {
                previous,
                score: submitted,
            }
        }
        Some(record) => Outcome::Unchanged {
            kept: record.score,
            submitted,
        },
        None => {
            board.push(ScoreRecord::new(username, submitted));
            Outcome::Inserted { score: submitted }
        }
    }
}

/// Returns the leaderboard with `submission` merged in.
pub fn apply(mut board: Leaderboard, submission: &Submission) -> Leaderboard {
    reconcile(&mut board, submission);
    board
}

/// Orders records by descending score. Ties keep insertion order.
pub fn rank(board: &Leaderboard) -> Vec<ScoreRecord> {
    let mut ranked = board.records().to_vec();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
