use play_core::entities::Payload;

/// Compute effective limit with precedence: local arg -> global flag -> fallback.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

/// Parse an optional `--payload`/`--settings` argument as a JSON object.
pub fn parse_payload(raw: Option<&str>, field: &str) -> anyhow::Result<Payload> {
    let Some(raw) = raw else {
        return Ok(Payload::new());
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => anyhow::bail!("invalid {field}: expected a JSON object, got {other}"),
        Err(error) => anyhow::bail!("invalid {field} '{raw}': {error}"),
    }
}
