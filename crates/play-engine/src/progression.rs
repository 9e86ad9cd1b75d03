//! Progression updater: folds a completed session into its progress record.

use chrono::{DateTime, Utc};
use play_core::entities::{ProgressRecord, Session};

use crate::error::EngineError;
use crate::service::PlayService;

/// Mastery at which a game counts as mastered for prerequisites and for
/// recommendation tiering.
pub const MASTERED_SCORE: f64 = 70.0;

/// Mastery at which a game's learning objectives are recorded as met.
pub const OBJECTIVES_MET_SCORE: f64 = 80.0;

impl PlayService {
    /// Create or update the `(learner, game)` record for a completed session.
    ///
    /// The record keeps the id of the session, which marks it as counted.
    ///
    /// Read-modify-write against the store without a transaction: two
    /// concurrent completions for the same pair are last-writer-wins.
    pub(crate) async fn update_progression(
        &self,
        session: &Session,
        final_score: f64,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord, EngineError> {
        let existing = self
            .store()
            .get_progress(&session.learner_id, &session.game_id)
            .await?;

        let mut record = match existing {
            Some(mut record) => {
                record.record_completion(final_score, now);
                record
            }
            None => ProgressRecord::first(&session.learner_id, &session.game_id, final_score, now),
        };

        record.last_session_id = Some(session.id.clone());

        if let Some(game) = self.catalog().game(&session.game_id) {
            for prerequisite in &game.prerequisites {
                let mastered = self
                    .store()
                    .get_progress(&session.learner_id, prerequisite)
                    .await?
                    .is_some_and(|p| p.mastery_score >= MASTERED_SCORE);
                record
                    .prerequisite_completion
                    .insert(prerequisite.clone(), mastered);
            }
            if record.mastery_score >= OBJECTIVES_MET_SCORE {
                record
                    .learning_objectives_met
                    .extend(game.learning_objectives.iter().cloned());
            }
        }

        self.store().upsert_progress(&record).await?;
        Ok(record)
    }

    /// A learner's progress records, most recently played first.
    ///
    /// Demo learners get synthesized records even when the store holds real
    /// ones under the same id.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the store read fails.
    pub async fn get_progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>, EngineError> {
        if self.is_demo_learner(learner_id) {
            return Ok(crate::demo::progress(learner_id, self.catalog(), self.now()));
        }
        Ok(self.store().list_progress(learner_id).await?)
    }

    /// The record for one `(learner, game)` pair.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the learner has never completed the game.
    /// - `Persistence` if the store read fails.
    pub async fn get_game_progress(
        &self,
        learner_id: &str,
        game_id: &str,
    ) -> Result<ProgressRecord, EngineError> {
        if self.is_demo_learner(learner_id) {
            return crate::demo::progress(learner_id, self.catalog(), self.now())
                .into_iter()
                .find(|r| r.game_id == game_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "progress record",
                    id: format!("{learner_id}/{game_id}"),
                });
        }
        self.store()
            .get_progress(learner_id, game_id)
            .await?
            .ok_or_else(|| EngineError::NotFound {
                entity: "progress record",
                id: format!("{learner_id}/{game_id}"),
            })
    }
}
