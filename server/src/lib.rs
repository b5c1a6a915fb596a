//! # Score Server Library
//!
//! This library provides the backend for the game's leaderboard. Game clients
//! submit scores over HTTP, the server keeps each player's best score, and
//! viewers fetch the ranked board.
//!
//! ## Core Responsibilities
//!
//! ### Reconciliation
//! Every submission is merged with the player's existing record using the
//! rules in `shared::reconcile`: scores are coerced to floats (anything
//! unparseable counts as zero) and a player's stored score never decreases.
//!
//! ### Persistence
//! The full leaderboard is written back to storage after every accepted
//! submission. Storage that is missing or corrupt at startup is treated as an
//! empty board rather than an error, so the service stays up.
//!
//! ### Serving
//! The ranked leaderboard is computed on every read and never stored.
//!
//! ## Architecture Design
//!
//! ### One Lock Around the Board
//! The in-memory leaderboard sits behind a single read-write lock. A
//! submission holds the write lock for its whole apply-then-save cycle, so
//! concurrent submissions are serialized and none are lost. Leaderboard reads
//! share the read lock and run in parallel with each other.
//!
//! ### Pluggable Storage
//! Storage is reached through the `ScoreStore` trait. The default
//! implementation rewrites a JSON file on every save; an in-memory store is
//! available for tests and throwaway runs.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Listen address, data file location, index page and durability policy.
//!
//! ### Error Module (`error`)
//! `StoreError` for storage failures and `ServerError` for startup and
//! serving failures.
//!
//! ### Leaderboard Module (`leaderboard`)
//! `LeaderboardService`, the lock-guarded board shared by all handlers:
//! - Submission handling with outcome logging
//! - Ranked standings for reads
//! - Reload from storage
//!
//! ### Network Module (`network`)
//! The HTTP surface:
//! - `GET /leaderboard` returns the ranked board as JSON
//! - `POST /submit_score` accepts `{"username": ..., "score": ...}`
//! - `GET /` serves the viewer page, `GET /health` a status summary
//! - Everything else answers 404
//!
//! ### Store Module (`store`)
//! JSON file and in-memory implementations of `ScoreStore`.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::new()
//!         .with_port(8000)
//!         .with_data_file("leaderboard.json");
//!
//!     // Opens (or creates) the data file, loads the board and binds
//!     let server = Server::new(&config).await?;
//!
//!     // Serves requests until Ctrl+C
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Durability
//!
//! By default a failed save is logged and the submitter still receives a
//! success response; the in-memory board remains authoritative until the next
//! successful load. `Durability::Strict` reports the failure as a 500 instead.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod network;
pub mod store;

pub use config::ServerConfig;
pub use error::{ServerError, StoreError};
pub use leaderboard::{Durability, LeaderboardService, SubmitReport};
pub use network::{build_router, AppState, Server};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
