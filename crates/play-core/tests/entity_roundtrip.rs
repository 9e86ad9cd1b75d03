//! Serde roundtrip and JsonSchema validation tests for entity and view types.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use play_core::analytics::*;
use play_core::catalog::GameInfo;
use play_core::entities::*;
use play_core::enums::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn settings() -> Payload {
    serde_json::json!({"difficulty": "easy", "sound": false})
        .as_object()
        .cloned()
        .unwrap()
}

roundtrip_and_validate!(
    open_session_roundtrip,
    Session,
    Session::start(
        "ses-00000000000000aa".into(),
        "kid-7",
        "fraction-frenzy",
        settings(),
        Some("org-school"),
        Utc::now(),
    )
);

roundtrip_and_validate!(
    completed_session_roundtrip,
    Session,
    Session {
        ended_at: Some(Utc::now()),
        total_duration_seconds: 240,
        questions_attempted: 10,
        questions_correct: 8,
        status: SessionStatus::Completed,
        score_summary: Some(ScoreSummary::new(80.0, 10, 8)),
        ..Session::start(
            "ses-00000000000000ab".into(),
            "kid-7",
            "fraction-frenzy",
            Payload::new(),
            None,
            Utc::now(),
        )
    }
);

roundtrip_and_validate!(
    event_roundtrip,
    Event,
    Event {
        session_id: "ses-00000000000000aa".into(),
        learner_id: "kid-7".into(),
        event_type: EventType::QuestionAnswer,
        payload: serde_json::json!({"correct": true, "question": 3})
            .as_object()
            .cloned()
            .unwrap(),
        timestamp: Utc::now(),
        sequence_number: 4,
    }
);

roundtrip_and_validate!(
    custom_event_roundtrip,
    Event,
    Event {
        session_id: "ses-00000000000000aa".into(),
        learner_id: "kid-7".into(),
        event_type: EventType::Custom("boss_defeated".into()),
        payload: Payload::new(),
        timestamp: Utc::now(),
        sequence_number: 5,
    }
);

roundtrip_and_validate!(
    progress_roundtrip,
    ProgressRecord,
    ProgressRecord {
        learning_objectives_met: BTreeSet::from(["add fractions".to_string()]),
        prerequisite_completion: BTreeMap::from([("number-line".to_string(), true)]),
        ..ProgressRecord::first("kid-7", "fraction-frenzy", 82.0, Utc::now())
    }
);

roundtrip_and_validate!(
    recommendation_roundtrip,
    Recommendation,
    Recommendation {
        game_id: "fraction-frenzy".into(),
        reason: "keep practicing".into(),
        priority: 9,
        estimated_difficulty: SkillLevel::Beginner,
        learning_objectives: vec!["add fractions".into()],
        prerequisites_met: true,
    }
);

roundtrip_and_validate!(
    metrics_roundtrip,
    PerformanceMetrics,
    PerformanceMetrics {
        learner_id: "kid-7".into(),
        total_games_played: 4,
        overall_completion_rate: 0.75,
        average_session_duration: 120.0,
        skill_level_distribution: SkillLevelDistribution {
            beginner: 1,
            intermediate: 1,
            advanced: 0,
        },
        subject_preferences: BTreeMap::from([("math".to_string(), 81.5)]),
        learning_velocity: 1,
        engagement_score: 64,
    }
);

roundtrip_and_validate!(
    aggregate_roundtrip,
    AggregateAnalytics,
    AggregateAnalytics {
        organization_id: None,
        total_sessions: 3,
        unique_players: 2,
        average_duration: 90.0,
        completion_rate: 0.5,
        popular_games: vec![GamePopularity {
            game_id: "fraction-frenzy".into(),
            session_count: 2,
            average_score: 70.0,
        }],
        learning_effectiveness: BTreeMap::from([("fraction-frenzy".to_string(), 0.7)]),
    }
);

roundtrip_and_validate!(
    game_info_roundtrip,
    GameInfo,
    GameInfo::new("fraction-frenzy", "math", SkillLevel::Beginner)
        .with_objectives(&["add fractions"])
        .with_prerequisites(&["number-line"])
);

#[test]
fn game_info_defaults_optional_fields() {
    let game: GameInfo =
        serde_json::from_str(r#"{"id":"spell-it","subject":"reading","skill_level":"beginner"}"#)
            .unwrap();
    assert!(game.name.is_empty());
    assert!(game.learning_objectives.is_empty());
    assert!(game.prerequisites.is_empty());
}
