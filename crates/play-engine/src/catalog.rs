//! The game catalog collaborator.
//!
//! The engine only needs an ordered view of catalog entries. Catalog order is
//! the stable tie-break used by the recommendation ranker.

use std::collections::HashMap;
use std::path::Path;

use play_core::catalog::GameInfo;
use play_core::enums::SkillLevel;
use serde::Deserialize;

use crate::error::EngineError;

/// Read access to game metadata: subject tag, skill level, objectives, prerequisites.
pub trait Catalog: Send + Sync {
    /// Every game, in catalog order.
    fn games(&self) -> &[GameInfo];

    fn game(&self, id: &str) -> Option<&GameInfo>;

    /// Index of a game in catalog order.
    fn position(&self, id: &str) -> Option<usize>;
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    games: Vec<GameInfo>,
}

/// An immutable in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    games: Vec<GameInfo>,
    index: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Build a catalog from entries in order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Catalog` if two entries share an id.
    pub fn new(games: Vec<GameInfo>) -> Result<Self, EngineError> {
        let mut index = HashMap::with_capacity(games.len());
        for (pos, game) in games.iter().enumerate() {
            if index.insert(game.id.clone(), pos).is_some() {
                return Err(EngineError::Catalog(format!(
                    "duplicate game id '{}'",
                    game.id
                )));
            }
        }
        Ok(Self { games, index })
    }

    /// Parse a `[[games]]` TOML document.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Catalog` on malformed TOML or duplicate ids.
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| EngineError::Catalog(e.to_string()))?;
        Self::new(file.games)
    }

    /// Load a `[[games]]` TOML file from disk.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Catalog` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Built-in catalog used when no catalog file is configured.
    #[must_use]
    pub fn sample() -> Self {
        let games = vec![
            GameInfo::new("counting-critters", "math", SkillLevel::Beginner)
                .with_name("Counting Critters")
                .with_objectives(&["counting", "number-recognition"]),
            GameInfo::new("math-blast", "math", SkillLevel::Beginner)
                .with_name("Math Blast")
                .with_objectives(&["addition", "subtraction"])
                .with_prerequisites(&["counting-critters"]),
            GameInfo::new("fraction-pizza", "math", SkillLevel::Intermediate)
                .with_name("Fraction Pizza")
                .with_objectives(&["fractions"])
                .with_prerequisites(&["math-blast"]),
            GameInfo::new("times-table-race", "math", SkillLevel::Advanced)
                .with_name("Times Table Race")
                .with_objectives(&["multiplication"])
                .with_prerequisites(&["math-blast"]),
            GameInfo::new("letter-lagoon", "reading", SkillLevel::Beginner)
                .with_name("Letter Lagoon")
                .with_objectives(&["phonics", "letter-recognition"]),
            GameInfo::new("word-quest", "reading", SkillLevel::Intermediate)
                .with_name("Word Quest")
                .with_objectives(&["vocabulary", "spelling"])
                .with_prerequisites(&["letter-lagoon"]),
            GameInfo::new("story-builder", "reading", SkillLevel::Advanced)
                .with_name("Story Builder")
                .with_objectives(&["comprehension", "sequencing"])
                .with_prerequisites(&["word-quest"]),
            GameInfo::new("planet-explorer", "science", SkillLevel::Beginner)
                .with_name("Planet Explorer")
                .with_objectives(&["solar-system"]),
            GameInfo::new("habitat-hunt", "science", SkillLevel::Intermediate)
                .with_name("Habitat Hunt")
                .with_objectives(&["ecosystems", "classification"])
                .with_prerequisites(&["planet-explorer"]),
        ];
        Self::new(games).unwrap_or_default()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn games(&self) -> &[GameInfo] {
        &self.games
    }

    fn game(&self, id: &str) -> Option<&GameInfo> {
        self.index.get(id).map(|&pos| &self.games[pos])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}
