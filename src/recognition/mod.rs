//! Speech recognition module
//!
//! Wraps an external recognition service behind a vocabulary-bound
//! [`Recognizer`]. The engine itself is opaque; [`ConsoleService`] is the
//! line-based engine the daemon ships with.

mod console;
mod outcome;
mod recognizer;
mod service;
mod vocabulary;

#[cfg(test)]
pub mod scripted;

pub use console::ConsoleService;
pub use outcome::{Confidence, RecognitionOutcome};
pub use recognizer::{Recognizer, RecognizerError};
pub use service::RecognitionService;
pub use vocabulary::Vocabulary;

#[cfg(test)]
pub use service::ServiceError;
