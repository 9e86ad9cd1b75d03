//! Session lifecycle: start, complete, abandon, and session reads.

use chrono::{DateTime, Utc};
use play_core::entities::{Payload, ScoreSummary, Session};
use play_core::enums::{EventType, SessionStatus};
use play_core::ids::{PREFIX_SESSION, generate_id};
use play_db::{SessionFilter, SessionUpdateBuilder};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::demo;
use crate::error::EngineError;
use crate::service::{PlayService, SessionSlot};

/// Whole seconds between two instants, 0 if `end` precedes `start`.
fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_seconds()).unwrap_or(0)
}

fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Payload::new(),
    }
}

impl PlayService {
    /// Open a new session and record its `session_started` event (sequence 1).
    ///
    /// The difficulty label is taken from `settings["difficulty"]` when present.
    ///
    /// # Errors
    ///
    /// - `Validation` if `learner_id` or `game_id` is empty.
    /// - `Persistence` if the store write fails. Callers may retry.
    pub async fn start_session(
        &self,
        learner_id: &str,
        game_id: &str,
        settings: Payload,
        organization_id: Option<&str>,
    ) -> Result<Session, EngineError> {
        if learner_id.trim().is_empty() || game_id.trim().is_empty() {
            return Err(EngineError::Validation(
                "learner id and game id are required".into(),
            ));
        }

        let session = Session::start(
            generate_id(PREFIX_SESSION),
            learner_id,
            game_id,
            settings,
            organization_id,
            self.now(),
        );
        self.store().insert_session(&session).await?;

        let mut guard = self.lock_slot(&session.id).await;
        guard.last_sequence = Some(0);
        let started = self
            .append_locked(
                &mut guard,
                &session.id,
                learner_id,
                EventType::SessionStarted,
                payload(json!({
                    "game_id": game_id,
                    "difficulty": session.difficulty_level,
                })),
            )
            .await;
        if let Err(e) = started {
            drop(guard);
            self.evict(&session.id).await;
            return Err(e);
        }
        guard.session = Some(session.clone());

        info!(
            session = %session.id,
            learner = %learner_id,
            game = %game_id,
            "session started"
        );
        Ok(session)
    }

    /// Complete an open session and update the learner's progress for the game.
    ///
    /// Duration is measured from the session's stored `started_at`, so a
    /// session opened by another process (or before a restart) completes the
    /// same way as a cached one. The cache entry is evicted whatever the outcome.
    ///
    /// The status row is written first, then the `session_completed` event,
    /// then the progress record, which remembers the session it last folded
    /// in. If a store failure interrupts the later steps, calling this again
    /// finishes them from the stored row (its score and counters win over the
    /// retried arguments) without counting the session twice.
    ///
    /// # Errors
    ///
    /// - `Validation` for inconsistent counters or an out-of-range score
    ///   (only when `strict_validation` is on).
    /// - `NotFound` if the session is unknown to both cache and store.
    /// - `InvalidTransition` if the session is abandoned, or already fully
    ///   completed.
    /// - `Persistence` if any store call fails.
    pub async fn complete_session(
        &self,
        session_id: &str,
        final_score: f64,
        questions_attempted: u32,
        questions_correct: u32,
    ) -> Result<Session, EngineError> {
        let final_score = self.check_completion_input(
            session_id,
            final_score,
            questions_attempted,
            questions_correct,
        )?;

        let result = {
            let mut guard = self.lock_slot(session_id).await;
            self.complete_locked(
                &mut guard,
                session_id,
                final_score,
                questions_attempted,
                questions_correct,
            )
            .await
        };
        self.evict(session_id).await;
        result
    }

    async fn complete_locked(
        &self,
        slot: &mut SessionSlot,
        session_id: &str,
        final_score: f64,
        questions_attempted: u32,
        questions_correct: u32,
    ) -> Result<Session, EngineError> {
        let session = self.open_session(slot, session_id).await?;
        if session.status == SessionStatus::Completed {
            return self.resume_completion(slot, session).await;
        }
        ensure_transition(&session, SessionStatus::Completed)?;

        let now = self.now();
        let duration = elapsed_seconds(session.started_at, now);
        let summary = ScoreSummary::new(final_score, questions_attempted, questions_correct);
        let update = SessionUpdateBuilder::new()
            .status(SessionStatus::Completed)
            .ended_at(now)
            .total_duration_seconds(duration)
            .counters(questions_attempted, questions_correct)
            .difficulty_level(session.difficulty_level.clone())
            .score_summary(summary)
            .build();
        self.store().update_session(session_id, &update).await?;

        let mut completed = session;
        update.apply(&mut completed);

        self.append_completed_event(slot, &completed).await?;
        info!(
            session = %session_id,
            learner = %completed.learner_id,
            score = final_score,
            duration,
            "session completed"
        );
        self.progress_completed(&completed, final_score).await?;
        Ok(completed)
    }

    /// Finish a completion whose status row is stored but whose later steps
    /// did not all succeed.
    async fn resume_completion(
        &self,
        slot: &mut SessionSlot,
        session: Session,
    ) -> Result<Session, EngineError> {
        let has_event = self
            .store()
            .list_events(&session.id)
            .await?
            .iter()
            .any(|e| e.event_type == EventType::SessionCompleted);
        let counted = self
            .store()
            .get_progress(&session.learner_id, &session.game_id)
            .await?
            .is_some_and(|r| r.last_session_id.as_deref() == Some(session.id.as_str()));
        if has_event && counted {
            return Err(EngineError::InvalidTransition {
                id: session.id,
                from: SessionStatus::Completed,
                to: SessionStatus::Completed,
            });
        }

        warn!(
            session = %session.id,
            has_event,
            counted,
            "resuming interrupted completion"
        );
        if !has_event {
            self.append_completed_event(slot, &session).await?;
        }
        if !counted {
            let final_score = session.final_score().unwrap_or(0.0);
            self.progress_completed(&session, final_score).await?;
        }
        Ok(session)
    }

    async fn append_completed_event(
        &self,
        slot: &mut SessionSlot,
        session: &Session,
    ) -> Result<(), EngineError> {
        let (final_score, accuracy) = session
            .score_summary
            .as_ref()
            .map_or((0.0, 0.0), |s| (s.final_score, s.accuracy));
        self.append_locked(
            slot,
            &session.id,
            &session.learner_id,
            EventType::SessionCompleted,
            payload(json!({
                "final_score": final_score,
                "accuracy": accuracy,
                "questions_attempted": session.questions_attempted,
                "questions_correct": session.questions_correct,
                "duration_seconds": session.total_duration_seconds,
            })),
        )
        .await?;
        Ok(())
    }

    async fn progress_completed(
        &self,
        session: &Session,
        final_score: f64,
    ) -> Result<(), EngineError> {
        let played_at = session.ended_at.unwrap_or_else(|| self.now());
        let record = self
            .update_progression(session, final_score, played_at)
            .await?;
        debug!(
            learner = %record.learner_id,
            game = %record.game_id,
            mastery = record.mastery_score,
            level = %record.skill_level,
            "progress updated"
        );
        Ok(())
    }

    /// Mark an open session abandoned. No progression update is made.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session is unknown to both cache and store.
    /// - `InvalidTransition` if the session is not in progress.
    /// - `Persistence` if any store call fails.
    pub async fn abandon_session(
        &self,
        session_id: &str,
        reason: Option<&str>,
    ) -> Result<Session, EngineError> {
        let result = {
            let mut guard = self.lock_slot(session_id).await;
            self.abandon_locked(&mut guard, session_id, reason).await
        };
        self.evict(session_id).await;
        result
    }

    async fn abandon_locked(
        &self,
        slot: &mut SessionSlot,
        session_id: &str,
        reason: Option<&str>,
    ) -> Result<Session, EngineError> {
        let session = self.open_session(slot, session_id).await?;
        ensure_transition(&session, SessionStatus::Abandoned)?;

        let now = self.now();
        let duration = elapsed_seconds(session.started_at, now);
        let update = SessionUpdateBuilder::new()
            .status(SessionStatus::Abandoned)
            .ended_at(now)
            .total_duration_seconds(duration)
            .counters(session.questions_attempted, session.questions_correct)
            .difficulty_level(session.difficulty_level.clone())
            .build();
        self.store().update_session(session_id, &update).await?;

        let mut abandoned = session;
        update.apply(&mut abandoned);

        self.append_locked(
            slot,
            session_id,
            &abandoned.learner_id,
            EventType::SessionAbandoned,
            payload(json!({ "reason": reason, "duration_seconds": duration })),
        )
        .await?;

        info!(session = %session_id, learner = %abandoned.learner_id, "session abandoned");
        Ok(abandoned)
    }

    /// A session by id: the cached open copy first, then the store.
    ///
    /// # Errors
    ///
    /// - `NotFound` if neither knows the id.
    /// - `Persistence` if the store read fails.
    pub async fn get_session(&self, session_id: &str) -> Result<Session, EngineError> {
        if let Some(session) = self.cached_session(session_id).await {
            return Ok(session);
        }
        self.store()
            .get_session(session_id)
            .await?
            .ok_or_else(|| EngineError::session_not_found(session_id))
    }

    /// A learner's sessions, newest first.
    ///
    /// Demo learners get synthesized sessions instead of store rows.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Persistence` if the store read fails.
    pub async fn list_sessions(
        &self,
        learner_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Session>, EngineError> {
        if self.is_demo_learner(learner_id) {
            let mut sessions = demo::sessions(learner_id, self.catalog(), self.now());
            if let Some(limit) = limit {
                sessions.truncate(limit as usize);
            }
            return Ok(sessions);
        }

        let mut filter = SessionFilter::for_learner(learner_id);
        if let Some(limit) = limit {
            filter = filter.with_limit(limit);
        }
        Ok(self.store().list_sessions(&filter).await?)
    }

    /// Load the session for a completion or abandonment.
    ///
    /// Takes the cached copy (which carries folded counters) or falls back to
    /// the store.
    async fn open_session(
        &self,
        slot: &mut SessionSlot,
        session_id: &str,
    ) -> Result<Session, EngineError> {
        if let Some(session) = slot.session.take() {
            return Ok(session);
        }
        let stored = self
            .store()
            .get_session(session_id)
            .await?
            .ok_or_else(|| EngineError::session_not_found(session_id))?;
        debug!(session = %session_id, "session not cached, loaded from store");
        Ok(stored)
    }

    /// Apply boundary checks to completion input.
    ///
    /// Strict mode rejects bad input. Lenient mode records it as given, with
    /// a non-finite score recorded as 0.
    fn check_completion_input(
        &self,
        session_id: &str,
        final_score: f64,
        questions_attempted: u32,
        questions_correct: u32,
    ) -> Result<f64, EngineError> {
        let mut problems = Vec::new();
        if questions_correct > questions_attempted {
            problems.push(format!(
                "questions_correct ({questions_correct}) exceeds questions_attempted ({questions_attempted})"
            ));
        }
        if !final_score.is_finite() || !(0.0..=100.0).contains(&final_score) {
            problems.push(format!("final_score ({final_score}) is outside [0, 100]"));
        }

        if problems.is_empty() {
            return Ok(final_score);
        }
        let message = problems.join("; ");
        if self.config().strict_validation {
            return Err(EngineError::Validation(message));
        }
        warn!(session = %session_id, "{message}; recording as given");
        Ok(if final_score.is_finite() { final_score } else { 0.0 })
    }
}

fn ensure_transition(session: &Session, to: SessionStatus) -> Result<(), EngineError> {
    if session.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(EngineError::InvalidTransition {
            id: session.id.clone(),
            from: session.status,
            to,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn elapsed_never_negative() {
        let t = Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        assert_eq!(elapsed_seconds(t, t + Duration::seconds(95)), 95);
        assert_eq!(elapsed_seconds(t, t - Duration::seconds(5)), 0);
    }

    #[test]
    fn transition_guard() {
        let mut session = Session::start(
            "ses-1".into(),
            "kid-1",
            "math-blast",
            Payload::new(),
            None,
            Utc::now(),
        );
        assert!(ensure_transition(&session, SessionStatus::Completed).is_ok());
        session.status = SessionStatus::Completed;
        let err = ensure_transition(&session, SessionStatus::Abandoned).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                from: SessionStatus::Completed,
                to: SessionStatus::Abandoned,
                ..
            }
        ));
    }
}
