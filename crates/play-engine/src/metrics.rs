//! Metrics aggregator: per-learner performance and platform-wide analytics.
//!
//! Both views are computed from scratch on every call.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use play_core::analytics::{
    AggregateAnalytics, GamePopularity, PerformanceMetrics, SkillLevelDistribution,
};
use play_core::entities::{ProgressRecord, Session};
use play_db::SessionFilter;

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::progression::OBJECTIVES_MET_SCORE;
use crate::service::PlayService;

/// Window for `learning_velocity`.
const VELOCITY_WINDOW_DAYS: i64 = 7;

/// Sessions that count toward the recent-consistency engagement term.
const RECENT_SESSIONS: usize = 5;

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[allow(clippy::cast_precision_loss)]
fn mean_duration(sessions: &[&Session]) -> f64 {
    mean(sessions.iter().map(|s| s.total_duration_seconds as f64))
}

/// Composite 0..=100 engagement score.
///
/// Four terms of at most 25 each: session frequency, completion rate, mean
/// completed duration in minutes, and completions among the five most
/// recent sessions.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn engagement_score(sessions: &[Session]) -> u8 {
    let total = sessions.len();
    let completed: Vec<&Session> = sessions.iter().filter(|s| s.is_completed()).collect();

    let frequency = (total as f64 * 2.0).min(25.0);
    let completion = ratio(completed.len(), total) * 25.0;
    let duration = (mean_duration(&completed) / 60.0).min(25.0);

    let mut recent: Vec<&Session> = sessions.iter().collect();
    recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    let recent_completed = recent
        .iter()
        .take(RECENT_SESSIONS)
        .filter(|s| s.is_completed())
        .count();
    let consistency = if total == 0 {
        0.0
    } else {
        ratio(recent_completed, RECENT_SESSIONS) * 25.0
    };

    (frequency + completion + duration + consistency)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Per-learner performance view over that learner's sessions and records.
#[must_use]
pub fn performance_metrics(
    learner_id: &str,
    sessions: &[Session],
    records: &[ProgressRecord],
    catalog: &dyn Catalog,
    now: DateTime<Utc>,
) -> PerformanceMetrics {
    let completed: Vec<&Session> = sessions.iter().filter(|s| s.is_completed()).collect();

    let mut skill_level_distribution = SkillLevelDistribution::default();
    for record in records {
        skill_level_distribution.add(record.skill_level);
    }

    let mut scores_by_subject: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for session in &completed {
        let (Some(game), Some(score)) = (catalog.game(&session.game_id), session.final_score())
        else {
            continue;
        };
        scores_by_subject
            .entry(game.subject.clone())
            .or_default()
            .push(score);
    }
    let subject_preferences = scores_by_subject
        .into_iter()
        .map(|(subject, scores)| (subject, mean(scores)))
        .collect();

    let window_start = now - Duration::days(VELOCITY_WINDOW_DAYS);
    let learning_velocity = records
        .iter()
        .filter(|r| r.last_played_at >= window_start && r.mastery_score >= OBJECTIVES_MET_SCORE)
        .count() as u64;

    PerformanceMetrics {
        learner_id: learner_id.to_string(),
        total_games_played: sessions.len() as u64,
        overall_completion_rate: ratio(completed.len(), sessions.len()),
        average_session_duration: mean_duration(&completed),
        skill_level_distribution,
        subject_preferences,
        learning_velocity,
        engagement_score: engagement_score(sessions),
    }
}

/// Platform-wide view over a set of sessions.
#[must_use]
pub fn aggregate_analytics(
    organization_id: Option<&str>,
    sessions: &[Session],
) -> AggregateAnalytics {
    let completed: Vec<&Session> = sessions.iter().filter(|s| s.is_completed()).collect();
    let players: BTreeSet<&str> = sessions.iter().map(|s| s.learner_id.as_str()).collect();

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for session in sessions {
        *counts.entry(session.game_id.as_str()).or_default() += 1;
    }

    let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut accuracies: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for session in &completed {
        if let Some(score) = session.final_score() {
            scores.entry(session.game_id.as_str()).or_default().push(score);
        }
        accuracies
            .entry(session.game_id.as_str())
            .or_default()
            .push(session.accuracy().unwrap_or_else(|| {
                play_core::entities::accuracy(session.questions_attempted, session.questions_correct)
            }));
    }

    let mut popular_games: Vec<GamePopularity> = counts
        .into_iter()
        .map(|(game_id, session_count)| GamePopularity {
            game_id: game_id.to_string(),
            session_count,
            average_score: scores.remove(game_id).map_or(0.0, mean),
        })
        .collect();
    popular_games.sort_by(|a, b| {
        b.session_count
            .cmp(&a.session_count)
            .then_with(|| a.game_id.cmp(&b.game_id))
    });

    let learning_effectiveness = accuracies
        .into_iter()
        .map(|(game_id, values)| (game_id.to_string(), mean(values)))
        .collect();

    AggregateAnalytics {
        organization_id: organization_id.map(String::from),
        total_sessions: sessions.len() as u64,
        unique_players: players.len() as u64,
        average_duration: mean_duration(&completed),
        completion_rate: ratio(completed.len(), sessions.len()),
        popular_games,
        learning_effectiveness,
    }
}

impl PlayService {
    /// Performance view for one learner.
    ///
    /// Demo learners are measured over their synthesized sessions and records.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if a store read fails.
    pub async fn get_performance_metrics(
        &self,
        learner_id: &str,
    ) -> Result<PerformanceMetrics, EngineError> {
        let now = self.now();
        let (sessions, records) = if self.is_demo_learner(learner_id) {
            (
                crate::demo::sessions(learner_id, self.catalog(), now),
                crate::demo::progress(learner_id, self.catalog(), now),
            )
        } else {
            (
                self.store()
                    .list_sessions(&SessionFilter::for_learner(learner_id))
                    .await?,
                self.store().list_progress(learner_id).await?,
            )
        };
        Ok(performance_metrics(
            learner_id,
            &sessions,
            &records,
            self.catalog(),
            now,
        ))
    }

    /// Platform-wide view, optionally scoped to one organization.
    ///
    /// Always computed from stored sessions.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the store read fails.
    pub async fn get_aggregate_analytics(
        &self,
        organization_id: Option<&str>,
    ) -> Result<AggregateAnalytics, EngineError> {
        let sessions = self
            .store()
            .list_sessions(&SessionFilter::for_organization(organization_id))
            .await?;
        Ok(aggregate_analytics(organization_id, &sessions))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use play_core::catalog::GameInfo;
    use play_core::entities::{Payload, ScoreSummary};
    use play_core::enums::{SessionStatus, SkillLevel};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::StaticCatalog;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 15, 0, 0).unwrap()
    }

    fn session(id: &str, learner: &str, game: &str, minutes_ago: i64) -> Session {
        Session::start(
            id.into(),
            learner,
            game,
            Payload::new(),
            None,
            t0() - Duration::minutes(minutes_ago),
        )
    }

    fn completed(mut s: Session, duration: u64, score: f64, attempted: u32, correct: u32) -> Session {
        s.status = SessionStatus::Completed;
        s.total_duration_seconds = duration;
        s.questions_attempted = attempted;
        s.questions_correct = correct;
        s.score_summary = Some(ScoreSummary::new(score, attempted, correct));
        s
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            GameInfo::new("math-blast", "math", SkillLevel::Beginner),
            GameInfo::new("word-quest", "reading", SkillLevel::Beginner),
        ])
        .unwrap()
    }

    #[test]
    fn performance_over_four_sessions() {
        let sessions = vec![
            completed(session("s1", "kid", "math-blast", 40), 60, 80.0, 10, 8),
            completed(session("s2", "kid", "math-blast", 30), 120, 60.0, 10, 6),
            completed(session("s3", "kid", "word-quest", 20), 180, 90.0, 10, 9),
            session("s4", "kid", "word-quest", 10),
        ];

        let metrics = performance_metrics("kid", &sessions, &[], &catalog(), t0());
        assert_eq!(metrics.total_games_played, 4);
        assert!((metrics.overall_completion_rate - 0.75).abs() < 1e-9);
        assert!((metrics.average_session_duration - 120.0).abs() < 1e-9);
        assert!((metrics.subject_preferences["math"] - 70.0).abs() < 1e-9);
        assert!((metrics.subject_preferences["reading"] - 90.0).abs() < 1e-9);

        // 8 + 18.75 + 2 + 15 = 43.75
        assert_eq!(metrics.engagement_score, 44);
    }

    #[test]
    fn empty_history_scores_zero() {
        let metrics = performance_metrics("kid", &[], &[], &catalog(), t0());
        assert_eq!(metrics.total_games_played, 0);
        assert_eq!(metrics.overall_completion_rate, 0.0);
        assert_eq!(metrics.average_session_duration, 0.0);
        assert_eq!(metrics.engagement_score, 0);
        assert!(metrics.subject_preferences.is_empty());
    }

    #[test]
    fn engagement_is_capped_at_100() {
        let sessions: Vec<Session> = (0..40)
            .map(|i| completed(session(&format!("s{i}"), "kid", "math-blast", i), 3600, 90.0, 5, 5))
            .collect();
        assert_eq!(engagement_score(&sessions), 100);
    }

    #[test]
    fn velocity_counts_recent_mastered_records() {
        let fresh = {
            let mut r = ProgressRecord::first("kid", "math-blast", 85.0, t0() - Duration::days(2));
            r.skill_level = SkillLevel::Intermediate;
            r
        };
        let stale = ProgressRecord::first("kid", "word-quest", 95.0, t0() - Duration::days(8));
        let weak = ProgressRecord::first("kid", "other", 50.0, t0());
        let metrics =
            performance_metrics("kid", &[], &[fresh, stale, weak], &catalog(), t0());
        assert_eq!(metrics.learning_velocity, 1);
        assert_eq!(metrics.skill_level_distribution.beginner, 2);
        assert_eq!(metrics.skill_level_distribution.intermediate, 1);
    }

    #[test]
    fn subject_preferences_skip_unknown_games() {
        let sessions = vec![completed(session("s1", "kid", "retired", 5), 60, 50.0, 2, 1)];
        let metrics = performance_metrics("kid", &sessions, &[], &catalog(), t0());
        assert!(metrics.subject_preferences.is_empty());
    }

    #[test]
    fn aggregate_rolls_up_games_and_players() {
        let sessions = vec![
            completed(session("s1", "kid-a", "math-blast", 50), 100, 80.0, 10, 8),
            completed(session("s2", "kid-b", "math-blast", 40), 200, 60.0, 10, 4),
            session("s3", "kid-a", "math-blast", 30),
            completed(session("s4", "kid-c", "word-quest", 20), 300, 90.0, 4, 4),
            session("s5", "kid-c", "art-attack", 10),
            session("s6", "kid-b", "art-attack", 5),
        ];

        let analytics = aggregate_analytics(Some("org-1"), &sessions);
        assert_eq!(analytics.organization_id.as_deref(), Some("org-1"));
        assert_eq!(analytics.total_sessions, 6);
        assert_eq!(analytics.unique_players, 3);
        assert!((analytics.average_duration - 200.0).abs() < 1e-9);
        assert!((analytics.completion_rate - 0.5).abs() < 1e-9);

        let order: Vec<(&str, u64)> = analytics
            .popular_games
            .iter()
            .map(|g| (g.game_id.as_str(), g.session_count))
            .collect();
        assert_eq!(
            order,
            vec![("math-blast", 3), ("art-attack", 2), ("word-quest", 1)]
        );
        assert!((analytics.popular_games[0].average_score - 70.0).abs() < 1e-9);
        assert_eq!(analytics.popular_games[1].average_score, 0.0);

        assert!((analytics.learning_effectiveness["math-blast"] - 0.6).abs() < 1e-9);
        assert!((analytics.learning_effectiveness["word-quest"] - 1.0).abs() < 1e-9);
        assert!(!analytics.learning_effectiveness.contains_key("art-attack"));
    }
}
