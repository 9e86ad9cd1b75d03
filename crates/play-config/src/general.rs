//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default number of recommendations returned.
const fn default_recommendations() -> u32 {
    5
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default `max_count` for recommendation requests.
    #[serde(default = "default_recommendations")]
    pub default_recommendations: u32,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_recommendations: default_recommendations(),
            default_limit: default_limit(),
        }
    }
}
