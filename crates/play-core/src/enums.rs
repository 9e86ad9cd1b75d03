//! Status enums, event types, skill levels and trends for playtrack.
//!
//! Enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `SessionStatus` carries `allowed_next_states()` for its lifecycle and
//! `SkillLevel` carries the upward-only ladder.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of a play session.
///
/// ```text
/// in_progress → completed
///             → abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::InProgress => &[Self::Completed, Self::Abandoned],
            Self::Completed | Self::Abandoned => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(CoreError::unknown("session status", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// SkillLevel
// ---------------------------------------------------------------------------

/// Coarse proficiency tier. Ordered: `Beginner < Intermediate < Advanced`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// The level reached from `self` with the given mastery score.
    ///
    /// Climbs at most one rung per call (beginner needs 80 to reach
    /// intermediate, intermediate needs 90 to reach advanced) and never
    /// returns a level below `self`.
    #[must_use]
    pub fn advance(self, mastery_score: f64) -> Self {
        match self {
            Self::Beginner if mastery_score >= 80.0 => Self::Intermediate,
            Self::Intermediate if mastery_score >= 90.0 => Self::Advanced,
            level => level,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(CoreError::unknown("skill level", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// ImprovementTrend
// ---------------------------------------------------------------------------

/// Direction of a learner's running average for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementTrend {
    Improving,
    Stable,
    Declining,
}

impl ImprovementTrend {
    /// Classify the move from `previous` to `current` running average.
    ///
    /// More than 10% above is improving, more than 10% below is declining.
    #[must_use]
    pub fn classify(previous: f64, current: f64) -> Self {
        if current > previous * 1.1 {
            Self::Improving
        } else if current < previous * 0.9 {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl fmt::Display for ImprovementTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImprovementTrend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improving" => Ok(Self::Improving),
            "stable" => Ok(Self::Stable),
            "declining" => Ok(Self::Declining),
            other => Err(CoreError::unknown("trend", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Kind of an in-session event.
///
/// Workflow-specific kinds that are not part of the fixed vocabulary are kept
/// verbatim in `Custom`. Serialized as a plain string in every case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    SessionStarted,
    SessionCompleted,
    QuestionStarted,
    QuestionAnswer,
    HintUsed,
    Paused,
    Resumed,
    DifficultyChange,
    SessionAbandoned,
    Custom(String),
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SessionStarted => "session_started",
            Self::SessionCompleted => "session_completed",
            Self::QuestionStarted => "question_started",
            Self::QuestionAnswer => "question_answer",
            Self::HintUsed => "hint_used",
            Self::Paused => "paused",
            Self::Resumed => "resumed",
            Self::DifficultyChange => "difficulty_change",
            Self::SessionAbandoned => "session_abandoned",
            Self::Custom(name) => name,
        }
    }

    /// Lifecycle events are appended by the engine itself, never by callers.
    #[must_use]
    pub const fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::SessionStarted | Self::SessionCompleted | Self::SessionAbandoned
        )
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "session_started" => Self::SessionStarted,
            "session_completed" => Self::SessionCompleted,
            "question_started" => Self::QuestionStarted,
            "question_answer" => Self::QuestionAnswer,
            "hint_used" => Self::HintUsed,
            "paused" => Self::Paused,
            "resumed" => Self::Resumed,
            "difficulty_change" => Self::DifficultyChange,
            "session_abandoned" => Self::SessionAbandoned,
            _ => Self::Custom(value),
        }
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonSchema for EventType {
    fn schema_name() -> Cow<'static, str> {
        "EventType".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}
