//! Game catalog source configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Path to a TOML catalog file (`[[games]]` tables). Empty uses the built-in catalog.
    #[serde(default)]
    pub path: String,
}

impl CatalogConfig {
    pub fn is_configured(&self) -> bool {
        !self.path.is_empty()
    }
}
