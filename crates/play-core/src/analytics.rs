//! Computed analytics views returned by the metrics aggregator.
//!
//! These are derived on every request from sessions and progress records and
//! are never persisted.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SkillLevel;

/// Number of progress records per skill level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SkillLevelDistribution {
    pub beginner: u64,
    pub intermediate: u64,
    pub advanced: u64,
}

impl SkillLevelDistribution {
    pub const fn add(&mut self, level: SkillLevel) {
        match level {
            SkillLevel::Beginner => self.beginner += 1,
            SkillLevel::Intermediate => self.intermediate += 1,
            SkillLevel::Advanced => self.advanced += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.beginner + self.intermediate + self.advanced
    }
}

/// Per-learner performance view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PerformanceMetrics {
    pub learner_id: String,
    /// Number of sessions of any status.
    pub total_games_played: u64,
    /// Completed sessions over all sessions, 0 when there are none.
    pub overall_completion_rate: f64,
    /// Mean duration in seconds of completed sessions only.
    pub average_session_duration: f64,
    pub skill_level_distribution: SkillLevelDistribution,
    /// Subject tag to mean final score among completed sessions.
    pub subject_preferences: BTreeMap<String, f64>,
    /// Records played within the last 7 days with mastery of at least 80.
    pub learning_velocity: u64,
    /// Composite 0..=100 score.
    pub engagement_score: u8,
}

/// Popularity row of the platform-wide view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GamePopularity {
    pub game_id: String,
    pub session_count: u64,
    /// Mean final score among completed sessions, 0 when none completed.
    pub average_score: f64,
}

/// Platform-wide view, optionally scoped to one organization.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AggregateAnalytics {
    pub organization_id: Option<String>,
    pub total_sessions: u64,
    pub unique_players: u64,
    /// Mean duration in seconds of completed sessions.
    pub average_duration: f64,
    pub completion_rate: f64,
    /// Sorted by session count descending, then game id.
    pub popular_games: Vec<GamePopularity>,
    /// Game id to mean accuracy among its completed sessions.
    pub learning_effectiveness: BTreeMap<String, f64>,
}
