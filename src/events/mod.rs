//! Status events emitted by the hotword loop
//!
//! One event per transition or failure, each carrying the state the loop
//! is in after it and a human-readable message.

use serde::{Deserialize, Serialize};

use crate::recognition::Confidence;
use crate::state::LoopState;

/// A single status notification; never mutated after emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub state: LoopState,
    pub message: String,
}

impl StatusEvent {
    pub fn new(state: LoopState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    pub fn listening_for_hotword() -> Self {
        Self::new(LoopState::ListeningHotword, "Listening for Hotword ...")
    }

    pub fn recognition_timed_out() -> Self {
        Self::new(
            LoopState::ListeningHotword,
            "Recognition Timed Out, restarting Hotword recognition ...",
        )
    }

    pub fn hotword_below_threshold(confidence: Confidence, threshold: Confidence) -> Self {
        Self::new(
            LoopState::ListeningHotword,
            format!(
                "Hotword confidence {} below {}, restarting Hotword recognition ...",
                confidence, threshold
            ),
        )
    }

    pub fn recognition_failed(reason: impl std::fmt::Display) -> Self {
        Self::new(
            LoopState::ListeningHotword,
            format!("Recognition failed ({}), restarting Hotword recognition ...", reason),
        )
    }

    pub fn hotword_detected() -> Self {
        Self::new(
            LoopState::ListeningSecondary,
            "Hotword DETECTED, Awaiting secondary input ...",
        )
    }

    pub fn secondary_detected(text: &str) -> Self {
        Self::new(
            LoopState::ListeningHotword,
            format!("Secondary input detected. Input is \"{}\"", text),
        )
    }

    pub fn secondary_failed() -> Self {
        Self::new(LoopState::ListeningHotword, "Failed getting secondary input!")
    }

    pub fn stopped() -> Self {
        Self::new(LoopState::Stopped, "Idle")
    }
}

impl std::fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.state, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_message_quotes_input() {
        let event = StatusEvent::secondary_detected("hello");
        assert_eq!(event.message, r#"Secondary input detected. Input is "hello""#);
        assert_eq!(event.state, LoopState::ListeningHotword);
    }

    #[test]
    fn test_event_display() {
        let event = StatusEvent::hotword_detected();
        assert_eq!(
            event.to_string(),
            "[ListeningSecondary] Hotword DETECTED, Awaiting secondary input ..."
        );
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&StatusEvent::stopped()).unwrap();
        assert_eq!(json, r#"{"state":"stopped","message":"Idle"}"#);
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"state":"listening_hotword","message":"Listening for Hotword ..."}"#;
        let event: StatusEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, StatusEvent::listening_for_hotword());
    }
}
