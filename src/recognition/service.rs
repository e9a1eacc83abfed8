//! Boundary with the external speech-to-text engine

use std::time::Duration;

use async_trait::async_trait;

use super::outcome::RecognitionOutcome;
use super::vocabulary::Vocabulary;

/// Failures reported by a recognition service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),

    #[error("vocabulary {0:?} has not been preloaded")]
    NotLoaded(String),

    #[error("audio input closed")]
    Closed,
}

/// An opaque speech recognition engine
///
/// Implementations must be cancel-safe: dropping a pending `recognize`
/// future abandons that listen without side effects.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Load the grammar for `vocabulary` so later listens start quickly
    async fn preload(&self, vocabulary: &Vocabulary) -> Result<(), ServiceError>;

    /// Listen for one utterance matching `vocabulary`
    ///
    /// Returns an outcome with absent text when nothing was heard within `timeout`.
    async fn recognize(
        &self,
        vocabulary: &Vocabulary,
        timeout: Duration,
    ) -> Result<RecognitionOutcome, ServiceError>;
}
