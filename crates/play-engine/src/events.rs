//! Event recorder: sequence assignment and folding into the open session.

use play_core::entities::{Event, Payload};
use play_core::enums::{EventType, SessionStatus};
use tracing::debug;

use crate::error::EngineError;
use crate::service::{PlayService, SessionSlot};

impl PlayService {
    /// Append a caller-observed event to a session.
    ///
    /// The event gets the next gap-free sequence number for the session.
    /// While the session is open, `question_answer` events bump its counters
    /// and `difficulty_change` events replace its difficulty. An open session
    /// missing from the cache (after a restart) is loaded from the store
    /// first. Events on a completed or abandoned session are recorded as is.
    ///
    /// # Errors
    ///
    /// - `Validation` for lifecycle event types, which only the engine appends.
    /// - `NotFound` if the session is unknown to both cache and store.
    /// - `Persistence` if the store rejects the write; no sequence is consumed.
    pub async fn track_event(
        &self,
        session_id: &str,
        learner_id: &str,
        event_type: EventType,
        payload: Payload,
    ) -> Result<Event, EngineError> {
        if event_type.is_lifecycle() {
            return Err(EngineError::Validation(format!(
                "'{event_type}' events are recorded by the session lifecycle"
            )));
        }

        let mut guard = self.lock_slot(session_id).await;

        // Closed sessions keep accepting events but hold no slot afterwards.
        let mut closed = false;
        if guard.session.is_none() {
            let stored = match self.store().get_session(session_id).await {
                Ok(stored) => stored,
                Err(e) => {
                    drop(guard);
                    self.evict(session_id).await;
                    return Err(e.into());
                }
            };
            match stored {
                None => {
                    drop(guard);
                    self.evict(session_id).await;
                    return Err(EngineError::session_not_found(session_id));
                }
                Some(stored) if stored.status == SessionStatus::InProgress => {
                    debug!(session = %session_id, "open session restored from store");
                    guard.session = Some(stored);
                }
                Some(_) => closed = true,
            }
        }

        let appended = self
            .append_locked(&mut guard, session_id, learner_id, event_type, payload)
            .await;
        if closed {
            drop(guard);
            self.evict(session_id).await;
            let event = appended?;
            debug!(
                session = %session_id,
                seq = event.sequence_number,
                event_type = %event.event_type,
                "event recorded on closed session"
            );
            return Ok(event);
        }
        let event = appended?;

        if let Some(session) = guard.session.as_mut() {
            match event.event_type {
                EventType::QuestionAnswer => {
                    session.questions_attempted += 1;
                    if Event::answered_correctly(&event.payload) {
                        session.questions_correct += 1;
                    }
                }
                EventType::DifficultyChange => {
                    if let Some(label) = Event::difficulty_label(&event.payload) {
                        session.difficulty_level = label.to_string();
                    }
                }
                _ => {}
            }
        }

        debug!(
            session = %session_id,
            seq = event.sequence_number,
            event_type = %event.event_type,
            "event recorded"
        );
        Ok(event)
    }

    /// Events of a session ordered by sequence number.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the store read fails.
    pub async fn list_events(&self, session_id: &str) -> Result<Vec<Event>, EngineError> {
        Ok(self.store().list_events(session_id).await?)
    }

    /// Assign the next sequence number and insert the event.
    ///
    /// The caller holds the session's slot lock. The counter only moves after
    /// the insert succeeds.
    pub(crate) async fn append_locked(
        &self,
        slot: &mut SessionSlot,
        session_id: &str,
        learner_id: &str,
        event_type: EventType,
        payload: Payload,
    ) -> Result<Event, EngineError> {
        let next = match slot.last_sequence {
            Some(last) => last + 1,
            None => self.store().max_sequence(session_id).await? + 1,
        };

        let event = Event {
            session_id: session_id.to_string(),
            learner_id: learner_id.to_string(),
            event_type,
            payload,
            timestamp: self.now(),
            sequence_number: next,
        };
        self.store().insert_event(&event).await?;
        slot.last_sequence = Some(next);
        Ok(event)
    }
}
