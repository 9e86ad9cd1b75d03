use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EventType;

/// Opaque key-value bag used for event payloads and session settings.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// One timestamped occurrence within a session. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Event {
    pub session_id: String,
    pub learner_id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: Payload,
    pub timestamp: DateTime<Utc>,
    /// Starts at 1 and increases by exactly 1 per appended event of the session.
    pub sequence_number: u32,
}

impl Event {
    /// Whether a `question_answer` payload marks the answer as correct.
    ///
    /// Accepts `correct`, `is_correct` or `isCorrect` boolean keys.
    #[must_use]
    pub fn answered_correctly(payload: &Payload) -> bool {
        ["correct", "is_correct", "isCorrect"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(serde_json::Value::as_bool))
            .unwrap_or(false)
    }

    /// Difficulty label carried by a `difficulty_change` payload.
    #[must_use]
    pub fn difficulty_label(payload: &Payload) -> Option<&str> {
        ["difficulty", "new_difficulty", "level"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(serde_json::Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn answered_correctly_reads_known_keys() {
        assert!(Event::answered_correctly(&payload(json!({"correct": true}))));
        assert!(Event::answered_correctly(&payload(json!({"isCorrect": true}))));
        assert!(!Event::answered_correctly(&payload(json!({"correct": false}))));
        assert!(!Event::answered_correctly(&payload(json!({"correct": "yes"}))));
        assert!(!Event::answered_correctly(&Payload::new()));
    }

    #[test]
    fn difficulty_label_reads_known_keys() {
        assert_eq!(
            Event::difficulty_label(&payload(json!({"difficulty": "hard"}))),
            Some("hard")
        );
        assert_eq!(Event::difficulty_label(&payload(json!({"level": 3}))), None);
    }

    #[test]
    fn event_type_serializes_as_type() {
        let event = Event {
            session_id: "ses-1".into(),
            learner_id: "kid-1".into(),
            event_type: EventType::HintUsed,
            payload: Payload::new(),
            timestamp: Utc::now(),
            sequence_number: 2,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "hint_used");
    }
}
