//! Durable storage for the leaderboard
//!
//! The whole leaderboard is read and written as one unit. Loading never
//! fails: missing or corrupt data yields an empty board so a bad file cannot
//! take the server down. Saving reports errors and leaves the decision of
//! what to do with them to the caller.

use crate::error::StoreError;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;
use shared::{reconcile, Leaderboard, Submission};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::fs;
use tokio::sync::Mutex;

/// Load/save access to the persisted leaderboard
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Reads the full leaderboard, falling back to an empty one on any failure
    async fn load(&self) -> Leaderboard;

    /// Replaces the persisted leaderboard with `board`
    async fn save(&self, board: &Leaderboard) -> Result<(), StoreError>;

    /// Human-readable location, used in log messages
    fn describe(&self) -> String;
}

/// Stores the leaderboard as a pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating it as `[]` if it does not exist yet
    ///
    /// Missing parent directories are created as well.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        match fs::metadata(&path).await {
            Ok(_) => debug!("Using existing leaderboard file {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::write(&path, "[]")
                    .await
                    .map_err(|e| StoreError::io(&path, e))?;
                info!("Created empty leaderboard file {}", path.display());
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ScoreStore for JsonFileStore {
    async fn load(&self) -> Leaderboard {
        match fs::read_to_string(&self.path).await {
            Ok(text) => decode_leaderboard(&text),
            Err(e) => {
                warn!(
                    "Failed to read leaderboard from {}: {}, starting empty",
                    self.path.display(),
                    e
                );
                Leaderboard::new()
            }
        }
    }

    async fn save(&self, board: &Leaderboard) -> Result<(), StoreError> {
        let text = encode_leaderboard(board)?;
        let temp_path = self.temp_path();

        fs::write(&temp_path, text)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(
            "Saved {} records to {}",
            board.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the leaderboard in process memory only
///
/// Saves can be made to fail on demand, which is how the durability paths of
/// the server are exercised without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    board: Mutex<Leaderboard>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(board: Leaderboard) -> Self {
        Self {
            board: Mutex::new(board),
            ..Self::default()
        }
    }

    /// Makes every subsequent save fail until switched back
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Leaderboard {
        self.board.lock().await.clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn load(&self) -> Leaderboard {
        self.board.lock().await.clone()
    }

    async fn save(&self, board: &Leaderboard) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store rejecting writes".into()));
        }

        *self.board.lock().await = board.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Serializes the leaderboard in its on-disk form (2-space indented JSON array)
pub fn encode_leaderboard(board: &Leaderboard) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(board)?)
}

/// Parses persisted leaderboard text, tolerating foreign and legacy data
///
/// Scores go through the same normalization as submissions, entries without
/// a usable username are dropped, and duplicate usernames collapse to their
/// best score. Anything that is not a JSON array yields an empty board.
pub fn decode_leaderboard(text: &str) -> Leaderboard {
    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Persisted leaderboard is not a JSON array, starting empty");
            return Leaderboard::new();
        }
        Err(e) => {
            warn!("Persisted leaderboard is not valid JSON ({}), starting empty", e);
            return Leaderboard::new();
        }
    };

    let mut board = Leaderboard::new();
    let mut skipped = 0;

    for entry in &entries {
        match entry.get("username").and_then(Value::as_str) {
            Some(username) if !username.is_empty() => {
                let score = entry.get("score").cloned().unwrap_or(Value::Null);
                reconcile(&mut board, &Submission::new(username, score));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} persisted entries without a username", skipped);
    }
    let merged = entries.len() - skipped - board.len();
    if merged > 0 {
        warn!("Merged {} duplicate persisted entries", merged);
    }

    board
}
