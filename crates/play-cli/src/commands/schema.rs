use anyhow::bail;
use play_core::analytics::{AggregateAnalytics, PerformanceMetrics};
use play_core::catalog::GameInfo;
use play_core::entities::{Event, ProgressRecord, Recommendation, Session};
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

fn schema_by_name(name: &str) -> Option<Schema> {
    let schema = match name.replace('_', "-").as_str() {
        "session" => schema_for!(Session),
        "event" => schema_for!(Event),
        "progress" | "progress-record" => schema_for!(ProgressRecord),
        "recommendation" => schema_for!(Recommendation),
        "metrics" | "performance-metrics" => schema_for!(PerformanceMetrics),
        "analytics" | "aggregate-analytics" => schema_for!(AggregateAnalytics),
        "game" | "game-info" => schema_for!(GameInfo),
        _ => return None,
    };
    Some(schema)
}

/// Handle `playtrack schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(schema) = schema_by_name(&args.type_name) else {
        bail!(
            "unknown schema type '{}' (expected session, event, progress, recommendation, metrics, analytics or game)",
            args.type_name
        );
    };
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use super::schema_by_name;

    #[test]
    fn known_types_resolve() {
        for name in [
            "session",
            "event",
            "progress",
            "progress_record",
            "recommendation",
            "metrics",
            "analytics",
            "game",
        ] {
            assert!(schema_by_name(name).is_some(), "{name}");
        }
    }

    #[test]
    fn schema_describes_fields() {
        let schema = schema_by_name("session").unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json["properties"]["learner_id"].is_object());
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(schema_by_name("avatar").is_none());
    }
}
