//! Behavioural checks shared by every `Store` implementation.
//!
//! Each check takes `&dyn Store`; the `conformance!` macro instantiates the
//! whole suite once per backend.

use chrono::{DateTime, Duration, TimeZone, Utc};
use play_core::entities::{Event, Payload, ProgressRecord, ScoreSummary, Session};
use play_core::enums::{EventType, SessionStatus};
use play_db::error::StoreError;
use play_db::{LibsqlStore, MemoryStore, SessionFilter, SessionUpdateBuilder, Store};
use pretty_assertions::assert_eq;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn session(id: &str, learner: &str, org: Option<&str>, offset_minutes: i64) -> Session {
    let mut settings = Payload::new();
    settings.insert("difficulty".into(), "hard".into());
    Session::start(
        id.into(),
        learner,
        "math-blast",
        settings,
        org,
        t0() + Duration::minutes(offset_minutes),
    )
}

fn event(session_id: &str, seq: u32, event_type: EventType) -> Event {
    let mut payload = Payload::new();
    payload.insert("correct".into(), true.into());
    Event {
        session_id: session_id.into(),
        learner_id: "kid-1".into(),
        event_type,
        payload,
        timestamp: t0() + Duration::seconds(i64::from(seq)),
        sequence_number: seq,
    }
}

async fn session_roundtrip(store: &dyn Store) {
    let original = session("ses-a", "kid-1", Some("org-1"), 0);
    store.insert_session(&original).await.unwrap();

    let loaded = store.get_session("ses-a").await.unwrap().unwrap();
    assert_eq!(loaded, original);
    assert_eq!(loaded.difficulty_level, "hard");
    assert!(store.get_session("ses-missing").await.unwrap().is_none());
}

async fn duplicate_session_rejected(store: &dyn Store) {
    let original = session("ses-dup", "kid-1", None, 0);
    store.insert_session(&original).await.unwrap();
    let err = store.insert_session(&original).await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }), "got {err:?}");
}

async fn partial_update_applies_only_set_fields(store: &dyn Store) {
    store
        .insert_session(&session("ses-up", "kid-1", None, 0))
        .await
        .unwrap();

    let ended = t0() + Duration::minutes(5);
    let update = SessionUpdateBuilder::new()
        .status(SessionStatus::Completed)
        .ended_at(ended)
        .total_duration_seconds(300)
        .counters(10, 8)
        .score_summary(ScoreSummary::new(85.0, 10, 8))
        .build();
    store.update_session("ses-up", &update).await.unwrap();

    let loaded = store.get_session("ses-up").await.unwrap().unwrap();
    assert_eq!(loaded.status, SessionStatus::Completed);
    assert_eq!(loaded.ended_at, Some(ended));
    assert_eq!(loaded.total_duration_seconds, 300);
    assert_eq!(loaded.questions_attempted, 10);
    assert_eq!(loaded.questions_correct, 8);
    assert_eq!(loaded.difficulty_level, "hard");
    assert_eq!(loaded.final_score(), Some(85.0));
}

async fn update_unknown_session_fails(store: &dyn Store) {
    let update = SessionUpdateBuilder::new()
        .status(SessionStatus::Abandoned)
        .build();
    let err = store.update_session("ses-nope", &update).await.unwrap_err();
    assert!(matches!(err, StoreError::NoResult), "got {err:?}");

    let empty = SessionUpdateBuilder::new().build();
    let err = store.update_session("ses-nope", &empty).await.unwrap_err();
    assert!(matches!(err, StoreError::NoResult), "got {err:?}");
}

async fn list_sessions_filters_and_orders(store: &dyn Store) {
    store.insert_session(&session("ses-1", "kid-1", Some("org-1"), 0)).await.unwrap();
    store.insert_session(&session("ses-2", "kid-1", Some("org-2"), 10)).await.unwrap();
    store.insert_session(&session("ses-3", "kid-2", Some("org-1"), 20)).await.unwrap();
    store.insert_session(&session("ses-4", "kid-1", None, 30)).await.unwrap();

    let ids = |sessions: Vec<Session>| sessions.into_iter().map(|s| s.id).collect::<Vec<_>>();

    let all = store.list_sessions(&SessionFilter::default()).await.unwrap();
    assert_eq!(ids(all), vec!["ses-4", "ses-3", "ses-2", "ses-1"]);

    let learner = store
        .list_sessions(&SessionFilter::for_learner("kid-1"))
        .await
        .unwrap();
    assert_eq!(ids(learner), vec!["ses-4", "ses-2", "ses-1"]);

    let org = store
        .list_sessions(&SessionFilter::for_organization(Some("org-1")))
        .await
        .unwrap();
    assert_eq!(ids(org), vec!["ses-3", "ses-1"]);

    let limited = store
        .list_sessions(&SessionFilter::for_learner("kid-1").with_limit(2))
        .await
        .unwrap();
    assert_eq!(ids(limited), vec!["ses-4", "ses-2"]);

    store
        .update_session(
            "ses-2",
            &SessionUpdateBuilder::new().status(SessionStatus::Completed).build(),
        )
        .await
        .unwrap();
    let completed = store
        .list_sessions(&SessionFilter {
            status: Some(SessionStatus::Completed),
            ..SessionFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(completed), vec!["ses-2"]);
}

async fn events_ordered_and_unique(store: &dyn Store) {
    store.insert_session(&session("ses-ev", "kid-1", None, 0)).await.unwrap();
    assert_eq!(store.max_sequence("ses-ev").await.unwrap(), 0);

    store.insert_event(&event("ses-ev", 2, EventType::QuestionAnswer)).await.unwrap();
    store.insert_event(&event("ses-ev", 1, EventType::SessionStarted)).await.unwrap();
    store
        .insert_event(&event("ses-ev", 3, EventType::Custom("boss_defeated".into())))
        .await
        .unwrap();

    let events = store.list_events("ses-ev").await.unwrap();
    let seqs: Vec<u32> = events.iter().map(|e| e.sequence_number).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(events[2].event_type, EventType::Custom("boss_defeated".into()));
    assert!(Event::answered_correctly(&events[1].payload));
    assert_eq!(store.max_sequence("ses-ev").await.unwrap(), 3);

    let err = store
        .insert_event(&event("ses-ev", 2, EventType::HintUsed))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { .. }), "got {err:?}");

    assert!(store.list_events("ses-other").await.unwrap().is_empty());
}

async fn progress_upsert_and_list(store: &dyn Store) {
    assert!(store.get_progress("kid-1", "math-blast").await.unwrap().is_none());

    let mut math = ProgressRecord::first("kid-1", "math-blast", 70.0, t0());
    store.upsert_progress(&math).await.unwrap();
    let reading = ProgressRecord::first("kid-1", "word-quest", 60.0, t0() + Duration::hours(1));
    store.upsert_progress(&reading).await.unwrap();
    let other = ProgressRecord::first("kid-2", "math-blast", 50.0, t0());
    store.upsert_progress(&other).await.unwrap();

    math.record_completion(90.0, t0() + Duration::hours(2));
    math.learning_objectives_met.insert("addition".into());
    math.prerequisite_completion.insert("counting".into(), true);
    math.last_session_id = Some("ses-0000000000000002".into());
    store.upsert_progress(&math).await.unwrap();

    let loaded = store.get_progress("kid-1", "math-blast").await.unwrap().unwrap();
    assert_eq!(loaded, math);
    assert_eq!(loaded.total_sessions, 2);
    assert_eq!(loaded.last_session_id.as_deref(), Some("ses-0000000000000002"));

    let listed: Vec<String> = store
        .list_progress("kid-1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.game_id)
        .collect();
    assert_eq!(listed, vec!["math-blast", "word-quest"]);
}

macro_rules! conformance {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            #[tokio::test]
            async fn session_roundtrip() {
                let store = $make;
                super::session_roundtrip(&store).await;
            }

            #[tokio::test]
            async fn duplicate_session_rejected() {
                let store = $make;
                super::duplicate_session_rejected(&store).await;
            }

            #[tokio::test]
            async fn partial_update_applies_only_set_fields() {
                let store = $make;
                super::partial_update_applies_only_set_fields(&store).await;
            }

            #[tokio::test]
            async fn update_unknown_session_fails() {
                let store = $make;
                super::update_unknown_session_fails(&store).await;
            }

            #[tokio::test]
            async fn list_sessions_filters_and_orders() {
                let store = $make;
                super::list_sessions_filters_and_orders(&store).await;
            }

            #[tokio::test]
            async fn events_ordered_and_unique() {
                let store = $make;
                super::events_ordered_and_unique(&store).await;
            }

            #[tokio::test]
            async fn progress_upsert_and_list() {
                let store = $make;
                super::progress_upsert_and_list(&store).await;
            }
        }
    };
}

conformance!(memory, MemoryStore::new());
conformance!(libsql_memory, LibsqlStore::open_local(":memory:").await.unwrap());
