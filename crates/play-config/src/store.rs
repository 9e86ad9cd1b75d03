//! Store (libSQL) configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".playtrack/playtrack.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Local database file, or `:memory:`. Used when no remote is configured.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://playtrack-myorg.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Remote database auth token.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl StoreConfig {
    /// Check if both remote fields are set.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Whether the local store lives only in process memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
