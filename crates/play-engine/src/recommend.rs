//! Recommendation ranker.
//!
//! Three tiers over the catalog for a learner with history:
//!
//! | tier     | candidates                                         | priority |
//! |----------|----------------------------------------------------|----------|
//! | practice | played, mastery < 70, weakest first                | 9        |
//! | expand   | unplayed, shares a subject with a mastered game    | 7        |
//! | explore  | any other unplayed game, while slots remain        | 6        |
//!
//! A learner with no history gets beginner games at priority 8. Ties sort by
//! tier, then the tier's own key, then catalog position, then game id.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use play_core::catalog::GameInfo;
use play_core::entities::{ProgressRecord, Recommendation};
use play_core::enums::SkillLevel;

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::progression::MASTERED_SCORE;
use crate::service::PlayService;

pub const REASON_START: &str = "Good starting point";
pub const REASON_PRACTICE: &str = "Keep practicing";
pub const REASON_EXPAND: &str = "Expand your skills";
pub const REASON_EXPLORE: &str = "New game to explore";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Practice,
    Expand,
    Explore,
}

impl Tier {
    const fn priority(self) -> u8 {
        match self {
            Self::Practice => 9,
            Self::Expand => 7,
            Self::Explore => 6,
        }
    }

    const fn reason(self) -> &'static str {
        match self {
            Self::Practice => REASON_PRACTICE,
            Self::Expand => REASON_EXPAND,
            Self::Explore => REASON_EXPLORE,
        }
    }
}

struct Candidate {
    tier: Tier,
    /// Mastery for the practice tier, 0 otherwise.
    key: f64,
    position: usize,
    recommendation: Recommendation,
}

impl Candidate {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .recommendation
            .priority
            .cmp(&self.recommendation.priority)
            .then(self.tier.cmp(&other.tier))
            .then(self.key.total_cmp(&other.key))
            .then(self.position.cmp(&other.position))
            .then_with(|| {
                self.recommendation
                    .game_id
                    .cmp(&other.recommendation.game_id)
            })
    }
}

/// Mastery per played game.
struct History<'a> {
    mastery: HashMap<&'a str, f64>,
}

impl<'a> History<'a> {
    fn new(records: &'a [ProgressRecord]) -> Self {
        Self {
            mastery: records
                .iter()
                .map(|r| (r.game_id.as_str(), r.mastery_score))
                .collect(),
        }
    }

    fn played(&self, game_id: &str) -> bool {
        self.mastery.contains_key(game_id)
    }

    fn prerequisites_met(&self, game: &GameInfo) -> bool {
        game.prerequisites.iter().all(|p| {
            self.mastery
                .get(p.as_str())
                .is_some_and(|&m| m >= MASTERED_SCORE)
        })
    }
}

fn recommend(
    game: &GameInfo,
    reason: &str,
    priority: u8,
    difficulty: SkillLevel,
    prerequisites_met: bool,
) -> Recommendation {
    Recommendation {
        game_id: game.id.clone(),
        reason: reason.to_string(),
        priority,
        estimated_difficulty: difficulty,
        learning_objectives: game.learning_objectives.clone(),
        prerequisites_met,
    }
}

/// Rank catalog games for a learner with the given progress records.
///
/// With `gate_prerequisites`, unplayed games whose prerequisites are not all
/// mastered are left out.
#[must_use]
pub fn rank(
    records: &[ProgressRecord],
    catalog: &dyn Catalog,
    max_count: usize,
    gate_prerequisites: bool,
) -> Vec<Recommendation> {
    if max_count == 0 {
        return Vec::new();
    }
    let history = History::new(records);

    if records.is_empty() {
        return catalog
            .games()
            .iter()
            .filter(|g| g.skill_level == SkillLevel::Beginner)
            .filter(|g| !gate_prerequisites || history.prerequisites_met(g))
            .take(max_count)
            .map(|g| {
                recommend(
                    g,
                    REASON_START,
                    8,
                    g.skill_level,
                    history.prerequisites_met(g),
                )
            })
            .collect();
    }

    let mut candidates = Vec::new();

    for record in records.iter().filter(|r| r.mastery_score < MASTERED_SCORE) {
        let tier = Tier::Practice;
        let recommendation = match catalog.game(&record.game_id) {
            Some(game) => recommend(
                game,
                tier.reason(),
                tier.priority(),
                record.skill_level,
                history.prerequisites_met(game),
            ),
            None => Recommendation {
                game_id: record.game_id.clone(),
                reason: tier.reason().to_string(),
                priority: tier.priority(),
                estimated_difficulty: record.skill_level,
                learning_objectives: Vec::new(),
                prerequisites_met: true,
            },
        };
        candidates.push(Candidate {
            tier,
            key: record.mastery_score,
            position: catalog.position(&record.game_id).unwrap_or(usize::MAX),
            recommendation,
        });
    }

    let strong_subjects: HashSet<&str> = records
        .iter()
        .filter(|r| r.mastery_score >= MASTERED_SCORE)
        .filter_map(|r| catalog.game(&r.game_id))
        .map(|g| g.subject.as_str())
        .collect();

    let unplayed: Vec<(usize, &GameInfo)> = catalog
        .games()
        .iter()
        .enumerate()
        .filter(|(_, g)| !history.played(&g.id))
        .filter(|(_, g)| !gate_prerequisites || history.prerequisites_met(g))
        .collect();

    let (expand, explore): (Vec<_>, Vec<_>) = unplayed
        .into_iter()
        .partition(|(_, g)| strong_subjects.contains(g.subject.as_str()));

    for (position, game) in expand {
        let tier = Tier::Expand;
        candidates.push(Candidate {
            tier,
            key: 0.0,
            position,
            recommendation: recommend(
                game,
                tier.reason(),
                tier.priority(),
                game.skill_level,
                history.prerequisites_met(game),
            ),
        });
    }

    for (position, game) in explore {
        if candidates.len() >= max_count {
            break;
        }
        let tier = Tier::Explore;
        candidates.push(Candidate {
            tier,
            key: 0.0,
            position,
            recommendation: recommend(
                game,
                tier.reason(),
                tier.priority(),
                game.skill_level,
                history.prerequisites_met(game),
            ),
        });
    }

    candidates.sort_by(Candidate::cmp_rank);
    candidates.truncate(max_count);
    candidates.into_iter().map(|c| c.recommendation).collect()
}

impl PlayService {
    /// Up to `max_count` games to play next, best first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the progress read fails.
    pub async fn get_recommendations(
        &self,
        learner_id: &str,
        max_count: usize,
    ) -> Result<Vec<Recommendation>, EngineError> {
        let records = self.get_progress(learner_id).await?;
        Ok(rank(&records, self.catalog(), max_count, false))
    }

    /// Like [`Self::get_recommendations`], but unplayed games are only
    /// offered once all of their prerequisites are mastered.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the progress read fails.
    pub async fn get_recommendations_with_prerequisites(
        &self,
        learner_id: &str,
        max_count: usize,
    ) -> Result<Vec<Recommendation>, EngineError> {
        let records = self.get_progress(learner_id).await?;
        Ok(rank(&records, self.catalog(), max_count, true))
    }
}
