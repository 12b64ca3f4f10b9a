//! Configuration module for the feed backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON snapshots
    pub data_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Pre-shared key for admin endpoints; admin routes are closed when unset
    pub admin_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let data_dir = env::var("FEED_DATA_DIR")
            .or_else(|_| env::var("DATA_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let bind_addr = env::var("FEED_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| format!("Invalid FEED_BIND_ADDR format: {e}"))?;

        let log_level = env::var("FEED_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("FEED_LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let admin_key = env::var("FEED_ADMIN_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            data_dir,
            bind_addr,
            log_level,
            log_json,
            admin_key,
        })
    }

    pub fn paths(&self) -> Paths {
        Paths::new(&self.data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    let container = PathBuf::from("/data");
    if container.is_dir() {
        container
    } else {
        PathBuf::from("./data")
    }
}

/// Snapshot file locations, one file per collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub posts: PathBuf,
    pub tags: PathBuf,
    pub friends: PathBuf,
    pub profiles: PathBuf,
    pub likes: PathBuf,
    pub boards: PathBuf,
    pub conversations: PathBuf,
    pub messages: PathBuf,
}

impl Paths {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            posts: data_dir.join("posts.json"),
            tags: data_dir.join("tags.json"),
            friends: data_dir.join("friends.json"),
            profiles: data_dir.join("profiles.json"),
            likes: data_dir.join("likes.json"),
            boards: data_dir.join("boards.json"),
            conversations: data_dir.join("conversations.json"),
            messages: data_dir.join("messages.json"),
        }
    }

    /// Per-user library snapshot. Characters outside `[A-Za-z0-9@._-]` are
    /// replaced so a user key can never escape the data directory.
    pub fn library(&self, user: &str) -> PathBuf {
        let safe: String = user
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe = safe.trim_start_matches('.');
        self.data_dir.join(format!("library_{safe}.json"))
    }
}
