//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layer extraction failed (bad TOML, wrong type in an env var).
    #[error("cannot load playtrack config: {0}")]
    Figment(#[from] figment::Error),

    /// A section was partially filled in.
    #[error("config section '{section}' is incomplete")]
    NotConfigured { section: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
