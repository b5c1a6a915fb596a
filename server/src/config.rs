//! Server configuration

use crate::leaderboard::Durability;
use shared::{DEFAULT_HOST, DEFAULT_PORT};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "leaderboard.json";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Everything needed to start a [`Server`](crate::network::Server)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on, 0 picks a free one
    pub port: u16,

    /// Where the leaderboard is persisted
    pub data_file: PathBuf,

    /// HTML page served at `/`
    pub index_file: PathBuf,

    /// Whether a failed save is reported to the submitter
    pub durability: Durability,

    /// Keep the leaderboard in memory only, ignoring `data_file`
    pub in_memory: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
            durability: Durability::BestEffort,
            in_memory: false,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    pub fn with_index_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_file = path.into();
        self
    }

    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// `host:port`, with IPv6 hosts bracketed
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
