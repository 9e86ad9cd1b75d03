//! Session repository: insert, partial update, get, filtered list.

use play_core::entities::Session;

use crate::LibsqlStore;
use crate::error::{StoreError, is_unique_violation};
use crate::helpers::{
    format_datetime, get_opt_string, get_u32, get_u64, parse_datetime, parse_enum, parse_json,
    parse_optional_datetime, parse_optional_json, to_i64, to_json,
};
use crate::store::SessionFilter;
use crate::updates::SessionUpdate;

const SELECT_COLS: &str = "id, learner_id, organization_id, game_id, started_at, ended_at, \
     total_duration_seconds, questions_attempted, questions_correct, status, \
     difficulty_level, settings_used, score_summary";

fn row_to_session(row: &libsql::Row) -> Result<Session, StoreError> {
    Ok(Session {
        id: row.get::<String>(0)?,
        learner_id: row.get::<String>(1)?,
        organization_id: get_opt_string(row, 2)?,
        game_id: row.get::<String>(3)?,
        started_at: parse_datetime(&row.get::<String>(4)?)?,
        ended_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        total_duration_seconds: get_u64(row, 6)?,
        questions_attempted: get_u32(row, 7)?,
        questions_correct: get_u32(row, 8)?,
        status: parse_enum(&row.get::<String>(9)?)?,
        difficulty_level: row.get::<String>(10)?,
        settings_used: parse_json(&row.get::<String>(11)?)?,
        score_summary: parse_optional_json(get_opt_string(row, 12)?.as_deref())?,
    })
}

impl LibsqlStore {
    pub(crate) async fn insert_session_row(&self, session: &Session) -> Result<(), StoreError> {
        let score_summary = session.score_summary.as_ref().map(to_json).transpose()?;
        let result = self
            .conn()
            .execute(
                &format!(
                    "INSERT INTO sessions ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                libsql::params![
                    session.id.as_str(),
                    session.learner_id.as_str(),
                    session.organization_id.as_deref(),
                    session.game_id.as_str(),
                    format_datetime(&session.started_at),
                    session.ended_at.as_ref().map(format_datetime),
                    to_i64(session.total_duration_seconds)?,
                    i64::from(session.questions_attempted),
                    i64::from(session.questions_correct),
                    session.status.as_str(),
                    session.difficulty_level.as_str(),
                    to_json(&session.settings_used)?,
                    score_summary
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate {
                collection: "sessions".into(),
                key: session.id.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) async fn update_session_row(
        &self,
        id: &str,
        update: &SessionUpdate,
    ) -> Result<(), StoreError> {
        if update.is_empty() {
            return match self.get_session_row(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NoResult),
            };
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }
        if let Some(ref ended_at) = update.ended_at {
            sets.push(format!("ended_at = ?{idx}"));
            params.push(format_datetime(ended_at).into());
            idx += 1;
        }
        if let Some(duration) = update.total_duration_seconds {
            sets.push(format!("total_duration_seconds = ?{idx}"));
            params.push(to_i64(duration)?.into());
            idx += 1;
        }
        if let Some(attempted) = update.questions_attempted {
            sets.push(format!("questions_attempted = ?{idx}"));
            params.push(i64::from(attempted).into());
            idx += 1;
        }
        if let Some(correct) = update.questions_correct {
            sets.push(format!("questions_correct = ?{idx}"));
            params.push(i64::from(correct).into());
            idx += 1;
        }
        if let Some(ref difficulty) = update.difficulty_level {
            sets.push(format!("difficulty_level = ?{idx}"));
            params.push(difficulty.clone().into());
            idx += 1;
        }
        if let Some(ref summary) = update.score_summary {
            sets.push(format!("score_summary = ?{idx}"));
            params.push(to_json(summary)?.into());
            idx += 1;
        }

        let sql = format!("UPDATE sessions SET {} WHERE id = ?{idx}", sets.join(", "));
        params.push(id.into());

        let affected = self
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if affected == 0 {
            return Err(StoreError::NoResult);
        }
        Ok(())
    }

    pub(crate) async fn get_session_row(&self, id: &str) -> Result<Option<Session>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM sessions WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn list_session_rows(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<Session>, StoreError> {
        let mut clauses = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref learner_id) = filter.learner_id {
            clauses.push(format!("learner_id = ?{idx}"));
            params.push(learner_id.clone().into());
            idx += 1;
        }
        if let Some(ref organization_id) = filter.organization_id {
            clauses.push(format!("organization_id = ?{idx}"));
            params.push(organization_id.clone().into());
            idx += 1;
        }
        if let Some(status) = filter.status {
            clauses.push(format!("status = ?{idx}"));
            params.push(status.as_str().into());
            idx += 1;
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let limit_clause = match filter.limit {
            Some(limit) => {
                params.push(i64::from(limit).into());
                format!("LIMIT ?{idx}")
            }
            None => String::new(),
        };

        let sql = format!(
            "SELECT {SELECT_COLS} FROM sessions {where_clause}
             ORDER BY started_at DESC, id ASC {limit_clause}"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }
}
