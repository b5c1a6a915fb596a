//! # Score Client Library
//!
//! Client-side access to the score server: submitting a player's score
//! after a game and showing the ranked leaderboard in a terminal.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! `LeaderboardClient` wraps the two HTTP endpoints the server exposes:
//! - `POST /submit_score` with a JSON `{username, score}` body
//! - `GET /leaderboard` returning records sorted by descending score
//!
//! ### Rendering Module (`rendering`)
//! Turns a ranked list into a text table:
//! - Medals for the three highest distinct scores, shared by tied players
//! - Whole-number scores with thousands separators
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::LeaderboardClient;
//! use client::rendering::render_leaderboard;
//! use shared::Submission;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LeaderboardClient::new("http://127.0.0.1:8000")?;
//!
//!     client.submit_score(&Submission::new("Ann", 1200)).await?;
//!
//!     let ranked = client.fetch_leaderboard().await?;
//!     print!("{}", render_leaderboard(&ranked, Some(10)));
//!
//!     Ok(())
//! }
//! ```

pub mod network;
pub mod rendering;

use serde_json::{Number, Value};

/// Turns a command-line score into the JSON value sent to the server.
///
/// Finite numbers are sent as JSON numbers; anything else is passed through
/// as a string and left for the server to coerce.
pub fn score_argument(raw: &str) -> Value {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use serde_json::json;

    #[test]
    fn test_numeric_score_argument() {
        let value = score_argument("1200");
        assert_approx_eq!(value.as_f64().unwrap(), 1200.0);

        assert_eq!(score_argument(" 2.5 "), json!(2.5));
    }

    #[test]
    fn test_non_numeric_score_argument() {
        assert_eq!(score_argument("lots"), json!("lots"));
        assert_eq!(score_argument("NaN"), json!("NaN"));
    }
}
