use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ImprovementTrend, SkillLevel};

/// Cumulative learning state for one (learner, game) pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProgressRecord {
    pub learner_id: String,
    pub game_id: String,
    pub skill_level: SkillLevel,
    /// Always within [0, 100].
    pub mastery_score: f64,
    pub learning_objectives_met: BTreeSet<String>,
    pub prerequisite_completion: BTreeMap<String, bool>,
    pub last_played_at: DateTime<Utc>,
    /// Number of completed sessions for the pair, at least 1.
    pub total_sessions: u32,
    /// Running mean of every final score recorded for the pair.
    pub average_performance: f64,
    pub improvement_trend: ImprovementTrend,
    /// The most recent session folded into the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_id: Option<String>,
}

impl ProgressRecord {
    /// The record created by the first completed session of a pair.
    #[must_use]
    pub fn first(learner_id: &str, game_id: &str, final_score: f64, now: DateTime<Utc>) -> Self {
        Self {
            learner_id: learner_id.to_string(),
            game_id: game_id.to_string(),
            skill_level: SkillLevel::Beginner,
            mastery_score: final_score.clamp(0.0, 100.0),
            learning_objectives_met: BTreeSet::new(),
            prerequisite_completion: BTreeMap::new(),
            last_played_at: now,
            total_sessions: 1,
            average_performance: final_score,
            improvement_trend: ImprovementTrend::Stable,
            last_session_id: None,
        }
    }

    /// Fold one more completed session into the record.
    ///
    /// Mastery is a 70/30 blend of prior mastery and the latest score, the
    /// running average is updated incrementally, and the skill level only
    /// ever climbs.
    pub fn record_completion(&mut self, final_score: f64, now: DateTime<Utc>) {
        let previous_average = self.average_performance;
        self.total_sessions += 1;
        let n = f64::from(self.total_sessions);
        self.average_performance = previous_average.mul_add(n - 1.0, final_score) / n;
        self.improvement_trend =
            ImprovementTrend::classify(previous_average, self.average_performance);
        self.mastery_score = self
            .mastery_score
            .mul_add(0.7, final_score * 0.3)
            .clamp(0.0, 100.0);
        self.skill_level = self.skill_level.advance(self.mastery_score);
        self.last_played_at = now;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_completion_seeds_record() {
        let now = Utc::now();
        let record = ProgressRecord::first("kid-1", "math-blast", 75.0, now);
        assert_eq!(record.skill_level, SkillLevel::Beginner);
        assert!((record.mastery_score - 75.0).abs() < f64::EPSILON);
        assert_eq!(record.total_sessions, 1);
        assert!((record.average_performance - 75.0).abs() < f64::EPSILON);
        assert_eq!(record.improvement_trend, ImprovementTrend::Stable);
    }

    #[test]
    fn second_completion_blends_mastery_and_promotes() {
        let now = Utc::now();
        let mut record = ProgressRecord::first("kid-1", "math-blast", 75.0, now);
        record.record_completion(95.0, now);
        assert!((record.mastery_score - 81.0).abs() < 1e-9);
        assert_eq!(record.skill_level, SkillLevel::Intermediate);
        assert_eq!(record.total_sessions, 2);
        assert!((record.average_performance - 85.0).abs() < 1e-9);
        assert_eq!(record.improvement_trend, ImprovementTrend::Improving);
    }

    #[test]
    fn poor_session_lowers_mastery_but_not_level() {
        let now = Utc::now();
        let mut record = ProgressRecord::first("kid-1", "math-blast", 95.0, now);
        record.record_completion(100.0, now);
        assert_eq!(record.skill_level, SkillLevel::Intermediate);
        record.record_completion(0.0, now);
        assert!(record.mastery_score < 80.0);
        assert_eq!(record.skill_level, SkillLevel::Intermediate);
        assert_eq!(record.improvement_trend, ImprovementTrend::Declining);
    }

    #[test]
    fn mastery_never_exceeds_bounds() {
        let now = Utc::now();
        let mut record = ProgressRecord::first("kid-1", "math-blast", 100.0, now);
        for _ in 0..20 {
            record.record_completion(100.0, now);
        }
        assert!(record.mastery_score <= 100.0);
        assert_eq!(record.skill_level, SkillLevel::Advanced);
        assert_eq!(record.total_sessions, 21);
    }
}
