//! Error type for the shared playtrack types.
//!
//! Store and engine failures have their own enums (`StoreError`,
//! `EngineError`) in the crates that raise them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Text that names no variant of a status, level or trend enum.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
