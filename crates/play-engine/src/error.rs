//! Engine error types.

use play_core::enums::SessionStatus;
use play_db::error::StoreError;
use thiserror::Error;

/// Errors surfaced by `PlayService` operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store call failed. Never retried by the engine.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Caller-supplied input was rejected.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("session {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: SessionStatus,
        to: SessionStatus,
    },

    /// The game catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    pub(crate) fn session_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "session",
            id: id.to_string(),
        }
    }
}
