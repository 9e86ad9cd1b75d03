//! Session event repository: append-only, ordered by sequence number.

use play_core::entities::Event;
use play_core::enums::EventType;

use crate::LibsqlStore;
use crate::error::{StoreError, is_unique_violation};
use crate::helpers::{format_datetime, get_u32, parse_datetime, parse_json, to_json};

const SELECT_COLS: &str =
    "session_id, learner_id, event_type, payload, timestamp, sequence_number";

fn row_to_event(row: &libsql::Row) -> Result<Event, StoreError> {
    Ok(Event {
        session_id: row.get::<String>(0)?,
        learner_id: row.get::<String>(1)?,
        event_type: EventType::from(row.get::<String>(2)?),
        payload: parse_json(&row.get::<String>(3)?)?,
        timestamp: parse_datetime(&row.get::<String>(4)?)?,
        sequence_number: get_u32(row, 5)?,
    })
}

impl LibsqlStore {
    pub(crate) async fn insert_event_row(&self, event: &Event) -> Result<(), StoreError> {
        let result = self
            .conn()
            .execute(
                &format!("INSERT INTO session_events ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                libsql::params![
                    event.session_id.as_str(),
                    event.learner_id.as_str(),
                    event.event_type.as_str(),
                    to_json(&event.payload)?,
                    format_datetime(&event.timestamp),
                    i64::from(event.sequence_number)
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate {
                collection: "session_events".into(),
                key: format!("{}#{}", event.session_id, event.sequence_number),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) async fn list_event_rows(&self, session_id: &str) -> Result<Vec<Event>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM session_events
                     WHERE session_id = ?1 ORDER BY sequence_number ASC"
                ),
                [session_id],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }

    pub(crate) async fn max_sequence_row(&self, session_id: &str) -> Result<u32, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COALESCE(MAX(sequence_number), 0) FROM session_events WHERE session_id = ?1",
                [session_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        get_u32(&row, 0)
    }
}
