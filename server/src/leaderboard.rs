//! The authoritative leaderboard shared by all request handlers
//!
//! `LeaderboardService` owns the in-memory board and the store behind it.
//! Every write runs apply-then-save under the write lock, so concurrent
//! submissions cannot lose updates, and readers never see a board that is
//! halfway through an update.

use crate::error::StoreError;
use crate::store::ScoreStore;
use log::{error, info};
use shared::{rank, reconcile, Leaderboard, Outcome, ScoreRecord, Submission};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How a failed save is reported to the submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Durability {
    /// Log the failure and still report success
    #[default]
    BestEffort,
    /// Report the failure to the submitter
    Strict,
}

/// Result of a single submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub username: String,
    pub outcome: Outcome,
    /// Whether the updated board reached the store
    pub persisted: bool,
}

/// The authoritative leaderboard, written through to a [`ScoreStore`].
///
/// The store is read once when the service starts and again on
/// [`LeaderboardService::reload`]. Edits made to the backing file while the
/// server runs are not seen until then, and the next submission overwrites
/// them.
pub struct LeaderboardService {
    board: RwLock<Leaderboard>,
    store: Arc<dyn ScoreStore>,
    durability: Durability,
}

impl LeaderboardService {
    /// Creates the service, seeding it with whatever the store currently holds
    pub async fn new(store: Arc<dyn ScoreStore>, durability: Durability) -> Self {
        let board = store.load().await;
        info!(
            "Loaded {} players from {}",
            board.len(),
            store.describe()
        );

        Self {
            board: RwLock::new(board),
            store,
            durability,
        }
    }

    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// Reconciles a submission and persists the resulting board
    ///
    /// The in-memory board keeps the update even if the save fails. With
    /// [`Durability::Strict`] that failure is returned to the caller.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmitReport, StoreError> {
        let username = submission.resolved_username().to_string();
        let mut board = self.board.write().await;

        let outcome = reconcile(&mut board, submission);
        match outcome {
            Outcome::Inserted { score } => info!("New player {} with score {}", username, score),
            Outcome::Improved { previous, score } => {
                info!("Player {} improved {} -> {}", username, previous, score)
            }
            Outcome::Unchanged { kept, submitted } => info!(
                "Player {} submitted {}, keeping best {}",
                username, submitted, kept
            ),
        }

        let persisted = match self.store.save(&board).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Failed to save leaderboard to {}: {}",
                    self.store.describe(),
                    e
                );
                if self.durability == Durability::Strict {
                    return Err(e);
                }
                false
            }
        };

        Ok(SubmitReport {
            username,
            outcome,
            persisted,
        })
    }

    /// All records ranked by descending score
    pub async fn standings(&self) -> Vec<ScoreRecord> {
        let board = self.board.read().await;
        rank(&board)
    }

    pub async fn player_count(&self) -> usize {
        self.board.read().await.len()
    }

    /// Replaces the in-memory board with a fresh load from the store
    pub async fn reload(&self) -> usize {
        let mut board = self.board.write().await;
        *board = self.store.load().await;
        info!("Reloaded {} players from {}", board.len(), self.store.describe());
        board.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use assert_approx_eq::assert_approx_eq;
    use shared::apply;

    async fn service_with(store: Arc<MemoryStore>, durability: Durability) -> LeaderboardService {
        LeaderboardService::new(store, durability).await
    }

    #[tokio::test]
    async fn test_new_loads_from_store() {
        let seeded = apply(Leaderboard::new(), &Submission::new("Ann", 10));
        let store = Arc::new(MemoryStore::with_board(seeded));

        let service = service_with(store, Durability::BestEffort).await;

        assert_eq!(service.player_count().await, 1);
    }

    #[tokio::test]
    async fn test_submit_persists() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store), Durability::BestEffort).await;

        let report = service.submit(&Submission::new("Ann", "10")).await.unwrap();

        assert_eq!(report.username, "Ann");
        assert_eq!(report.outcome, Outcome::Inserted { score: 10.0 });
        assert!(report.persisted);
        assert_eq!(store.snapshot().await.records(), &[ScoreRecord::new("Ann", 10.0)]);
    }

    #[tokio::test]
    async fn test_standings_are_ranked() {
        let service = service_with(Arc::new(MemoryStore::new()), Durability::BestEffort).await;

        service.submit(&Submission::new("Ann", 10)).await.unwrap();
        service.submit(&Submission::new("Ben", 20)).await.unwrap();
        service.submit(&Submission::new("Ann", 5)).await.unwrap();

        assert_eq!(
            service.standings().await,
            vec![ScoreRecord::new("Ben", 20.0), ScoreRecord::new("Ann", 10.0)]
        );
    }

    #[tokio::test]
    async fn test_best_effort_swallows_save_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let service = service_with(Arc::clone(&store), Durability::BestEffort).await;

        let report = service.submit(&Submission::new("Ann", 7)).await.unwrap();

        assert!(!report.persisted);
        assert!(store.snapshot().await.is_empty());
        // The in-memory board stays authoritative
        assert_approx_eq!(service.standings().await[0].score, 7.0);
    }

    #[tokio::test]
    async fn test_strict_reports_save_failure() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let service = service_with(Arc::clone(&store), Durability::Strict).await;

        let result = service.submit(&Submission::new("Ann", 7)).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(service.player_count().await, 1);
    }

    #[tokio::test]
    async fn test_reload_picks_up_store_contents() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store), Durability::BestEffort).await;

        let board = apply(Leaderboard::new(), &Submission::new("Cy", 3));
        store.save(&board).await.unwrap();

        assert_eq!(service.player_count().await, 0);
        assert_eq!(service.reload().await, 1);
        assert_eq!(service.standings().await, vec![ScoreRecord::new("Cy", 3.0)]);
    }

    #[tokio::test]
    async fn test_outside_store_edits_wait_for_reload() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Arc::clone(&store), Durability::BestEffort).await;
        service.submit(&Submission::new("Ann", 10)).await.unwrap();

        let edited = apply(Leaderboard::new(), &Submission::new("Ben", 50));
        store.save(&edited).await.unwrap();

        // Served from memory, not from the edited store
        assert_eq!(service.standings().await, vec![ScoreRecord::new("Ann", 10.0)]);

        service.reload().await;
        assert_eq!(service.standings().await, vec![ScoreRecord::new("Ben", 50.0)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(service_with(Arc::clone(&store), Durability::BestEffort).await);

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let name = format!("player-{}", i % 20);
                    service.submit(&Submission::new(name, i)).await.unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let standings = service.standings().await;
        assert_eq!(standings.len(), 20);
        // Best for player-k is 180 + k
        for record in &standings {
            let k: f64 = record.username["player-".len()..].parse().unwrap();
            assert_approx_eq!(record.score, 180.0 + k);
        }
        assert_eq!(store.snapshot().await.len(), 20);
        assert_eq!(store.save_count(), 200);
    }
}
