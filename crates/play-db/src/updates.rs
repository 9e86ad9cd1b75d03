//! Partial session update and its builder.

use chrono::{DateTime, Utc};
use play_core::entities::{ScoreSummary, Session};
use play_core::enums::SessionStatus;
use serde::Serialize;

/// Fields to change on a stored session. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_attempted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_correct: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_summary: Option<ScoreSummary>,
}

impl SessionUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the set fields to an in-memory session.
    pub fn apply(&self, session: &mut Session) {
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(ended_at) = self.ended_at {
            session.ended_at = Some(ended_at);
        }
        if let Some(duration) = self.total_duration_seconds {
            session.total_duration_seconds = duration;
        }
        if let Some(attempted) = self.questions_attempted {
            session.questions_attempted = attempted;
        }
        if let Some(correct) = self.questions_correct {
            session.questions_correct = correct;
        }
        if let Some(ref difficulty) = self.difficulty_level {
            session.difficulty_level.clone_from(difficulty);
        }
        if let Some(ref summary) = self.score_summary {
            session.score_summary = Some(summary.clone());
        }
    }
}

pub struct SessionUpdateBuilder(SessionUpdate);

impl SessionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SessionUpdate::default())
    }

    #[must_use]
    pub const fn status(mut self, status: SessionStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn ended_at(mut self, ended_at: DateTime<Utc>) -> Self {
        self.0.ended_at = Some(ended_at);
        self
    }

    #[must_use]
    pub const fn total_duration_seconds(mut self, seconds: u64) -> Self {
        self.0.total_duration_seconds = Some(seconds);
        self
    }

    #[must_use]
    pub const fn counters(mut self, attempted: u32, correct: u32) -> Self {
        self.0.questions_attempted = Some(attempted);
        self.0.questions_correct = Some(correct);
        self
    }

    #[must_use]
    pub fn difficulty_level(mut self, difficulty: impl Into<String>) -> Self {
        self.0.difficulty_level = Some(difficulty.into());
        self
    }

    #[must_use]
    pub fn score_summary(mut self, summary: ScoreSummary) -> Self {
        self.0.score_summary = Some(summary);
        self
    }

    #[must_use]
    pub fn build(self) -> SessionUpdate {
        self.0
    }
}

impl Default for SessionUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use play_core::entities::Payload;

    use super::*;

    #[test]
    fn empty_update_changes_nothing() {
        let mut session =
            Session::start("ses-1".into(), "kid-1", "math-blast", Payload::new(), None, Utc::now());
        let before = session.clone();
        let update = SessionUpdateBuilder::new().build();
        assert!(update.is_empty());
        update.apply(&mut session);
        assert_eq!(session, before);
    }

    #[test]
    fn apply_sets_only_given_fields() {
        let mut session =
            Session::start("ses-1".into(), "kid-1", "math-blast", Payload::new(), None, Utc::now());
        let update = SessionUpdateBuilder::new()
            .status(SessionStatus::Completed)
            .counters(10, 7)
            .build();
        update.apply(&mut session);
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.questions_attempted, 10);
        assert_eq!(session.questions_correct, 7);
        assert!(session.ended_at.is_none());
        assert_eq!(session.difficulty_level, "normal");
    }

    #[test]
    fn serializes_only_set_fields() {
        let update = SessionUpdateBuilder::new().difficulty_level("hard").build();
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({"difficulty_level": "hard"}));
    }
}
