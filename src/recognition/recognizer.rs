//! A recognition service bound to one vocabulary
//!
//! Every listen races the service against the run's cancellation token,
//! so a stop request abandons an in-flight call instead of waiting it out.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::outcome::RecognitionOutcome;
use super::service::{RecognitionService, ServiceError};
use super::vocabulary::Vocabulary;

/// Extra time granted to the service past its own timeout
const SERVICE_GRACE: Duration = Duration::from_millis(250);

/// Errors returned by [`Recognizer`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognizerError {
    #[error("recognizer for {0:?} is not prepared")]
    NotReady(String),

    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(#[from] ServiceError),

    #[error("recognition cancelled")]
    Cancelled,
}

/// One recognition service instance bound to a fixed vocabulary
pub struct Recognizer {
    service: Arc<dyn RecognitionService>,
    vocabulary: Vocabulary,
    timeout: Duration,
    cancel: CancellationToken,
    ready: bool,
}

impl Recognizer {
    /// Create an unprepared recognizer
    pub fn new(
        service: Arc<dyn RecognitionService>,
        vocabulary: Vocabulary,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            service,
            vocabulary,
            timeout,
            cancel,
            ready: false,
        }
    }

    /// Preload the vocabulary; must complete before the first `recognize`
    pub async fn prepare(&mut self) -> Result<(), RecognizerError> {
        if self.ready {
            return Ok(());
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(RecognizerError::Cancelled),
            result = self.service.preload(&self.vocabulary) => result?,
        }

        self.ready = true;
        info!(
            vocabulary = self.vocabulary.name(),
            phrases = self.vocabulary.phrases().len(),
            "recognizer prepared"
        );
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Listen once, suspending until the service answers, times out, or
    /// the run is cancelled
    pub async fn recognize(&self) -> Result<RecognitionOutcome, RecognizerError> {
        if !self.ready {
            return Err(RecognizerError::NotReady(self.vocabulary.name().to_string()));
        }

        let listen = self.service.recognize(&self.vocabulary, self.timeout);

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(vocabulary = self.vocabulary.name(), "recognition abandoned");
                Err(RecognizerError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout + SERVICE_GRACE, listen) => match result {
                Ok(outcome) => Ok(outcome?),
                Err(_) => {
                    debug!(
                        vocabulary = self.vocabulary.name(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "service overran its timeout"
                    );
                    Ok(RecognitionOutcome::timed_out())
                }
            },
        }
    }
}
