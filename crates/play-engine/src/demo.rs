//! Synthetic data for demo learners.
//!
//! Output is a pure function of the learner id, the catalog and `now`: the
//! RNG is seeded from a SHA-256 of the id, so repeated calls agree. A small
//! profile table keyed by id substring sets the skill level, base score,
//! trend and completion habit.

use chrono::{DateTime, Duration, Utc};
use play_core::catalog::GameInfo;
use play_core::entities::{Payload, ProgressRecord, ScoreSummary, Session};
use play_core::enums::{ImprovementTrend, SessionStatus, SkillLevel};
use play_core::ids::PREFIX_DEMO_SESSION;
use rand::prelude::*;
use rand::rngs::StdRng;
use sha2::{Digest, Sha256};

use crate::catalog::Catalog;
use crate::progression::{MASTERED_SCORE, OBJECTIVES_MET_SCORE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub skill_level: SkillLevel,
    pub base_score: f64,
    pub trend: ImprovementTrend,
    /// Probability that a synthesized session is completed.
    pub completion_rate: f64,
}

const DEFAULT_PROFILE: Profile = Profile {
    skill_level: SkillLevel::Intermediate,
    base_score: 70.0,
    trend: ImprovementTrend::Stable,
    completion_rate: 0.85,
};

/// First entry with a matching substring wins.
const PROFILES: &[(&[&str], Profile)] = &[
    (
        &["advanced"],
        Profile {
            skill_level: SkillLevel::Advanced,
            base_score: 88.0,
            trend: ImprovementTrend::Improving,
            completion_rate: 0.95,
        },
    ),
    (
        &["struggling"],
        Profile {
            skill_level: SkillLevel::Beginner,
            base_score: 45.0,
            trend: ImprovementTrend::Declining,
            completion_rate: 0.6,
        },
    ),
    (
        &["beginner", "new"],
        Profile {
            skill_level: SkillLevel::Beginner,
            base_score: 55.0,
            trend: ImprovementTrend::Improving,
            completion_rate: 0.8,
        },
    ),
];

/// The profile for a learner id (case-insensitive substring match).
#[must_use]
pub fn profile_for(learner_id: &str) -> Profile {
    let lowered = learner_id.to_ascii_lowercase();
    PROFILES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map_or(DEFAULT_PROFILE, |(_, profile)| *profile)
}

fn rng_for(learner_id: &str, stream: &str) -> StdRng {
    let digest = Sha256::new()
        .chain_update(learner_id.as_bytes())
        .chain_update(b":")
        .chain_update(stream.as_bytes())
        .finalize();
    StdRng::from_seed(digest.into())
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

const fn difficulty_label(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::Beginner => "easy",
        SkillLevel::Intermediate => "normal",
        SkillLevel::Advanced => "hard",
    }
}

/// Synthesized progress records, most recently played first.
#[must_use]
pub fn progress(learner_id: &str, catalog: &dyn Catalog, now: DateTime<Utc>) -> Vec<ProgressRecord> {
    let games = catalog.games();
    if games.is_empty() {
        return Vec::new();
    }
    let profile = profile_for(learner_id);
    let mut rng = rng_for(learner_id, "progress");

    let count = rng.gen_range(3..=5).min(games.len());
    let picked: Vec<&GameInfo> = games.choose_multiple(&mut rng, count).collect();

    let mut records: Vec<ProgressRecord> = picked
        .iter()
        .map(|game| {
            let mastery = round1((profile.base_score + rng.gen_range(-8.0..=8.0)).clamp(0.0, 100.0));
            let average = round1((mastery + rng.gen_range(-5.0..=5.0)).clamp(0.0, 100.0));
            let mut record = ProgressRecord::first(
                learner_id,
                &game.id,
                average,
                now - Duration::hours(rng.gen_range(1..=240)),
            );
            record.mastery_score = mastery;
            record.skill_level = profile.skill_level;
            record.total_sessions = rng.gen_range(2..=12);
            record.improvement_trend = profile.trend;
            if mastery >= OBJECTIVES_MET_SCORE {
                record
                    .learning_objectives_met
                    .extend(game.learning_objectives.iter().cloned());
            }
            record
        })
        .collect();

    let mastery: Vec<(String, f64)> = records
        .iter()
        .map(|r| (r.game_id.clone(), r.mastery_score))
        .collect();
    for record in &mut records {
        let Some(game) = catalog.game(&record.game_id) else {
            continue;
        };
        for prerequisite in &game.prerequisites {
            let mastered = mastery
                .iter()
                .any(|(id, m)| id == prerequisite && *m >= MASTERED_SCORE);
            record
                .prerequisite_completion
                .insert(prerequisite.clone(), mastered);
        }
    }

    records.sort_by(|a, b| {
        b.last_played_at
            .cmp(&a.last_played_at)
            .then_with(|| a.game_id.cmp(&b.game_id))
    });
    records
}

/// Synthesized sessions, newest first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sessions(learner_id: &str, catalog: &dyn Catalog, now: DateTime<Utc>) -> Vec<Session> {
    let games = catalog.games();
    if games.is_empty() {
        return Vec::new();
    }
    let profile = profile_for(learner_id);
    let mut rng = rng_for(learner_id, "sessions");
    let difficulty = difficulty_label(profile.skill_level);

    let count = rng.gen_range(6..=12);
    let mut hours_ago = 0i64;
    let mut sessions = Vec::with_capacity(count);

    for _ in 0..count {
        hours_ago += rng.gen_range(4..=36);
        let Some(game) = games.choose(&mut rng) else {
            break;
        };
        let started_at = now - Duration::hours(hours_ago);
        let id = format!("{PREFIX_DEMO_SESSION}-{:016x}", rng.r#gen::<u64>());

        let mut settings = Payload::new();
        settings.insert("difficulty".into(), difficulty.into());
        let mut session = Session::start(id, learner_id, &game.id, settings, None, started_at);

        if rng.gen_bool(profile.completion_rate) {
            let duration: i64 = rng.gen_range(180..=900);
            let attempted: u32 = rng.gen_range(5..=20);
            let score = round1((profile.base_score + rng.gen_range(-10.0..=10.0)).clamp(0.0, 100.0));
            let correct = ((f64::from(attempted) * score / 100.0).round() as u32).min(attempted);

            session.status = SessionStatus::Completed;
            session.total_duration_seconds = duration.unsigned_abs();
            session.ended_at = Some(started_at + Duration::seconds(duration));
            session.questions_attempted = attempted;
            session.questions_correct = correct;
            session.score_summary = Some(ScoreSummary::new(score, attempted, correct));
        } else {
            let duration: i64 = rng.gen_range(30..=240);
            let attempted: u32 = rng.gen_range(0..=4);
            session.status = SessionStatus::Abandoned;
            session.total_duration_seconds = duration.unsigned_abs();
            session.ended_at = Some(started_at + Duration::seconds(duration));
            session.questions_attempted = attempted;
            session.questions_correct = rng.gen_range(0..=attempted);
        }
        sessions.push(session);
    }
    sessions
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::catalog::StaticCatalog;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 20, 10, 0, 0).unwrap()
    }

    #[rstest]
    #[case("demo-advanced-kid", SkillLevel::Advanced, 88.0)]
    #[case("demo-STRUGGLING-1", SkillLevel::Beginner, 45.0)]
    #[case("sample-beginner", SkillLevel::Beginner, 55.0)]
    #[case("demo-new-player", SkillLevel::Beginner, 55.0)]
    #[case("demo-kid", SkillLevel::Intermediate, 70.0)]
    fn profile_table(#[case] id: &str, #[case] level: SkillLevel, #[case] base: f64) {
        let profile = profile_for(id);
        assert_eq!(profile.skill_level, level);
        assert!((profile.base_score - base).abs() < f64::EPSILON);
    }

    #[test]
    fn output_is_deterministic_per_learner() {
        let catalog = StaticCatalog::sample();
        assert_eq!(
            progress("demo-kid", &catalog, now()),
            progress("demo-kid", &catalog, now())
        );
        assert_eq!(
            sessions("demo-kid", &catalog, now()),
            sessions("demo-kid", &catalog, now())
        );
        assert_ne!(
            sessions("demo-kid", &catalog, now()),
            sessions("demo-other", &catalog, now())
        );
    }

    #[test]
    fn synthesized_records_respect_bounds() {
        let catalog = StaticCatalog::sample();
        for id in ["demo-advanced", "demo-struggling", "demo-a", "demo-b", "demo-c"] {
            let records = progress(id, &catalog, now());
            assert!((3..=5).contains(&records.len()));
            for record in &records {
                assert!((0.0..=100.0).contains(&record.mastery_score));
                assert!(record.total_sessions >= 1);
                assert!(record.last_played_at < now());
                assert!(catalog.game(&record.game_id).is_some());
            }
            let mut games: Vec<&str> = records.iter().map(|r| r.game_id.as_str()).collect();
            games.sort_unstable();
            games.dedup();
            assert_eq!(games.len(), records.len(), "games repeat for {id}");
        }
    }

    #[test]
    fn synthesized_sessions_are_consistent() {
        let catalog = StaticCatalog::sample();
        let sessions = sessions("demo-kid", &catalog, now());
        assert!((6..=12).contains(&sessions.len()));
        for pair in sessions.windows(2) {
            assert!(pair[0].started_at > pair[1].started_at);
        }
        for session in &sessions {
            assert!(session.id.starts_with("dem-"));
            assert!(session.questions_correct <= session.questions_attempted);
            assert_ne!(session.status, SessionStatus::InProgress);
            if session.is_completed() {
                let score = session.final_score().unwrap();
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let catalog = StaticCatalog::default();
        assert!(progress("demo-kid", &catalog, now()).is_empty());
        assert!(sessions("demo-kid", &catalog, now()).is_empty());
    }
}
