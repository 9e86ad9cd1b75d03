use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Payload;
use crate::enums::SessionStatus;

/// Default difficulty label for new sessions.
pub const DEFAULT_DIFFICULTY: &str = "normal";

/// One play attempt of one game by one learner.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Session {
    pub id: String,
    pub learner_id: String,
    pub organization_id: Option<String>,
    pub game_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_duration_seconds: u64,
    pub questions_attempted: u32,
    pub questions_correct: u32,
    pub status: SessionStatus,
    pub difficulty_level: String,
    pub settings_used: Payload,
    pub score_summary: Option<ScoreSummary>,
}

impl Session {
    /// A fresh `in_progress` session with zeroed counters.
    ///
    /// The difficulty label is taken from `settings["difficulty"]` when it is
    /// a string, otherwise [`DEFAULT_DIFFICULTY`].
    #[must_use]
    pub fn start(
        id: String,
        learner_id: &str,
        game_id: &str,
        settings: Payload,
        organization_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let difficulty_level = settings
            .get("difficulty")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string();
        Self {
            id,
            learner_id: learner_id.to_string(),
            organization_id: organization_id.map(String::from),
            game_id: game_id.to_string(),
            started_at: now,
            ended_at: None,
            total_duration_seconds: 0,
            questions_attempted: 0,
            questions_correct: 0,
            status: SessionStatus::InProgress,
            difficulty_level,
            settings_used: settings,
            score_summary: None,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Final score recorded at completion, if any.
    #[must_use]
    pub fn final_score(&self) -> Option<f64> {
        self.score_summary.as_ref().map(|s| s.final_score)
    }

    /// Accuracy recorded at completion, if any.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        self.score_summary.as_ref().map(|s| s.accuracy)
    }
}

/// Score breakdown written when a session completes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreSummary {
    pub final_score: f64,
    /// `questions_correct / questions_attempted`, clamped to [0, 1]; 0 when nothing was attempted.
    pub accuracy: f64,
    pub questions_correct: u32,
    pub questions_attempted: u32,
    pub completion_rate: f64,
}

impl ScoreSummary {
    #[must_use]
    pub fn new(final_score: f64, questions_attempted: u32, questions_correct: u32) -> Self {
        Self {
            final_score,
            accuracy: accuracy(questions_attempted, questions_correct),
            questions_correct,
            questions_attempted,
            completion_rate: 1.0,
        }
    }
}

/// Fraction of attempted questions answered correctly.
#[must_use]
pub fn accuracy(questions_attempted: u32, questions_correct: u32) -> f64 {
    if questions_attempted == 0 {
        return 0.0;
    }
    (f64::from(questions_correct) / f64::from(questions_attempted)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_reads_difficulty_from_settings() {
        let mut settings = Payload::new();
        settings.insert("difficulty".into(), "hard".into());
        let session = Session::start("ses-1".into(), "kid-1", "math-blast", settings, None, Utc::now());
        assert_eq!(session.difficulty_level, "hard");
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.questions_attempted, 0);
    }

    #[test]
    fn start_defaults_difficulty() {
        let session =
            Session::start("ses-1".into(), "kid-1", "math-blast", Payload::new(), Some("org-1"), Utc::now());
        assert_eq!(session.difficulty_level, DEFAULT_DIFFICULTY);
        assert_eq!(session.organization_id.as_deref(), Some("org-1"));
    }

    #[test]
    fn accuracy_handles_zero_attempts() {
        assert!(accuracy(0, 0).abs() < f64::EPSILON);
        assert!((accuracy(4, 3) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_is_clamped_for_inconsistent_counters() {
        assert!((accuracy(2, 5) - 1.0).abs() < f64::EPSILON);
    }
}
