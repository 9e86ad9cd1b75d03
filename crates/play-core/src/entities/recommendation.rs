use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SkillLevel;

/// A ranked suggestion of what to play next. Transient, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Recommendation {
    pub game_id: String,
    pub reason: String,
    /// 1 to 10, higher is more recommended.
    pub priority: u8,
    pub estimated_difficulty: SkillLevel,
    pub learning_objectives: Vec<String>,
    pub prerequisites_met: bool,
}
