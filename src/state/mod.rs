//! State machine module for the passive listening loop
//!
//! Provides the hotword loop and its four states:
//! - Idle: constructed, not yet listening
//! - ListeningHotword: waiting for the trigger phrase
//! - ListeningSecondary: capturing the utterance after the hotword
//! - Stopped: cancelled by the controller

mod machine;

pub use machine::{HotwordLoop, LoopSettings, LoopState, LoopSummary};
