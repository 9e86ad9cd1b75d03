//! Game descriptors consumed from the external game catalog.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SkillLevel;

/// Catalog metadata for one playable game.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GameInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Subject tag used to group related games (e.g. `math`, `reading`).
    pub subject: String,
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    /// IDs of games that should be mastered first.
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl GameInfo {
    #[must_use]
    pub fn new(id: &str, subject: &str, skill_level: SkillLevel) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            subject: subject.to_string(),
            skill_level,
            learning_objectives: Vec::new(),
            prerequisites: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    #[must_use]
    pub fn with_objectives(mut self, objectives: &[&str]) -> Self {
        self.learning_objectives = objectives.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_prerequisites(mut self, prerequisites: &[&str]) -> Self {
        self.prerequisites = prerequisites.iter().map(ToString::to_string).collect();
        self
    }
}
