//! ID prefixes and generation.
//!
//! IDs are `{prefix}-{16 hex chars}`, e.g. `ses-3fa9c0d17b2e4a61`.

/// Prefix for play session IDs.
pub const PREFIX_SESSION: &str = "ses";

/// Prefix for synthesized (demo) session IDs.
pub const PREFIX_DEMO_SESSION: &str = "dem";

/// Generate a new prefixed ID from 64 random bits.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{:016x}", rand::random::<u64>())
}

/// Check whether an ID carries the given prefix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
