//! Plain-text rendering of the leaderboard

use shared::ScoreRecord;
use std::fmt::Write;

pub const EMPTY_MESSAGE: &str = "No scores yet! Be the first to play!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn symbol(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }

    fn for_tier(tier: usize) -> Option<Self> {
        match tier {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Assigns medals to an already ranked list.
///
/// Medals go to the three highest *distinct* scores, so tied players share a
/// medal and a tie for first still leaves silver for the next score down.
pub fn assign_medals(ranked: &[ScoreRecord]) -> Vec<Option<Medal>> {
    let mut top_scores: Vec<f64> = Vec::with_capacity(3);
    for record in ranked {
        if top_scores.len() == 3 {
            break;
        }
        if !top_scores.contains(&record.score) {
            top_scores.push(record.score);
        }
    }

    ranked
        .iter()
        .map(|record| {
            top_scores
                .iter()
                .position(|&score| score == record.score)
                .and_then(Medal::for_tier)
        })
        .collect()
}

/// Formats a score rounded to a whole number with thousands separators.
pub fn format_score(score: f64) -> String {
    let rounded = score.round();
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders a ranked leaderboard as a text table, showing at most `limit` rows.
pub fn render_leaderboard(ranked: &[ScoreRecord], limit: Option<usize>) -> String {
    if ranked.is_empty() {
        return format!("🏆 {}\n", EMPTY_MESSAGE);
    }

    let medals = assign_medals(ranked);
    let shown = limit.unwrap_or(ranked.len()).min(ranked.len());

    let name_width = ranked[..shown]
        .iter()
        .map(|r| r.username.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:2}  {:<name_width$}  {:>12}", "Rank", "", "Player", "Score");

    for (i, (record, medal)) in ranked.iter().zip(&medals).take(shown).enumerate() {
        let symbol = medal.map(Medal::symbol).unwrap_or("  ");
        let _ = writeln!(
            out,
            "{:>4}  {}  {:<name_width$}  {:>12}",
            i + 1,
            symbol,
            record.username,
            format_score(record.score)
        );
    }

    if shown < ranked.len() {
        let _ = writeln!(out, "... and {} more", ranked.len() - shown);
    }
    out
}
