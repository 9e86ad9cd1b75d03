//! Progress record repository keyed by `(learner_id, game_id)`.

use play_core::entities::ProgressRecord;

use crate::LibsqlStore;
use crate::error::StoreError;
use crate::helpers::{
    format_datetime, get_opt_string, get_u32, parse_datetime, parse_enum, parse_json, to_json,
};

const SELECT_COLS: &str = "learner_id, game_id, skill_level, mastery_score, \
     learning_objectives_met, prerequisite_completion, last_played_at, total_sessions, \
     average_performance, improvement_trend, last_session_id";

fn row_to_progress(row: &libsql::Row) -> Result<ProgressRecord, StoreError> {
    Ok(ProgressRecord {
        learner_id: row.get::<String>(0)?,
        game_id: row.get::<String>(1)?,
        skill_level: parse_enum(&row.get::<String>(2)?)?,
        mastery_score: row.get::<f64>(3)?,
        learning_objectives_met: parse_json(&row.get::<String>(4)?)?,
        prerequisite_completion: parse_json(&row.get::<String>(5)?)?,
        last_played_at: parse_datetime(&row.get::<String>(6)?)?,
        total_sessions: get_u32(row, 7)?,
        average_performance: row.get::<f64>(8)?,
        improvement_trend: parse_enum(&row.get::<String>(9)?)?,
        last_session_id: get_opt_string(row, 10)?,
    })
}

impl LibsqlStore {
    pub(crate) async fn get_progress_row(
        &self,
        learner_id: &str,
        game_id: &str,
    ) -> Result<Option<ProgressRecord>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM progress_records
                     WHERE learner_id = ?1 AND game_id = ?2"
                ),
                [learner_id, game_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_progress(&row)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn upsert_progress_row(
        &self,
        record: &ProgressRecord,
    ) -> Result<(), StoreError> {
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO progress_records ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                     ON CONFLICT(learner_id, game_id) DO UPDATE SET
                        skill_level = excluded.skill_level,
                        mastery_score = excluded.mastery_score,
                        learning_objectives_met = excluded.learning_objectives_met,
                        prerequisite_completion = excluded.prerequisite_completion,
                        last_played_at = excluded.last_played_at,
                        total_sessions = excluded.total_sessions,
                        average_performance = excluded.average_performance,
                        improvement_trend = excluded.improvement_trend,
                        last_session_id = excluded.last_session_id"
                ),
                libsql::params![
                    record.learner_id.as_str(),
                    record.game_id.as_str(),
                    record.skill_level.as_str(),
                    record.mastery_score,
                    to_json(&record.learning_objectives_met)?,
                    to_json(&record.prerequisite_completion)?,
                    format_datetime(&record.last_played_at),
                    i64::from(record.total_sessions),
                    record.average_performance,
                    record.improvement_trend.as_str(),
                    record.last_session_id.as_deref()
                ],
            )
            .await?;
        Ok(())
    }

    pub(crate) async fn list_progress_rows(
        &self,
        learner_id: &str,
    ) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM progress_records
                     WHERE learner_id = ?1 ORDER BY last_played_at DESC, game_id ASC"
                ),
                [learner_id],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_progress(&row)?);
        }
        Ok(records)
    }
}
