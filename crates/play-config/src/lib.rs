//! # play-config
//!
//! Layered configuration loading for playtrack using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PLAYTRACK_*` prefix, `__` as separator)
//! 2. Project-level `.playtrack/config.toml`
//! 3. User-level `~/.config/playtrack/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PLAYTRACK_STORE__URL` -> `store.url`,
//! `PLAYTRACK_ENGINE__DEMO_MODE` -> `engine.demo_mode`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use play_config::PlayConfig;
//!
//! let config = PlayConfig::load_with_dotenv().expect("config");
//! if config.store.is_remote() {
//!     println!("remote store: {}", config.store.url);
//! }
//! ```

mod catalog;
mod engine;
mod error;
mod general;
mod store;

pub use catalog::CatalogConfig;
pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PlayConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after loading `.env` from the current directory.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".playtrack/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PLAYTRACK_").split("__"))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.demo_prefixes.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "engine.demo_prefixes".into(),
                reason: "an empty prefix would classify every learner as demo".into(),
            });
        }
        if self.general.default_recommendations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_recommendations".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !self.store.is_remote() && self.store.path.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "store".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("playtrack").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlayConfig::default();
        assert!(!config.store.is_remote());
        assert!(!config.engine.demo_mode);
        assert!(!config.catalog.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_demo_prefix_is_rejected() {
        let mut config = PlayConfig::default();
        config.engine.demo_prefixes.push(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine.demo_prefixes"));
    }

    #[test]
    fn zero_recommendations_is_rejected() {
        let mut config = PlayConfig::default();
        config.general.default_recommendations = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn missing_store_is_not_configured() {
        let mut config = PlayConfig::default();
        config.store.path.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
