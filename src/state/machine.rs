//! Hotword loop state machine
//!
//! Drives repeated hotword detection, a single secondary capture after each
//! confident detection, and a return to hotword listening. Runs until the
//! cancellation token fires.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::StatusEvent;
use crate::recognition::{Confidence, RecognitionOutcome, Recognizer, RecognizerError};
use crate::status::StatusSender;

/// The states a hotword loop can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Constructed but not yet listening
    Idle,
    /// Waiting for the hotword
    ListeningHotword,
    /// Hotword heard, capturing the follow-up utterance
    ListeningSecondary,
    /// Cancelled; issues no further recognition calls
    Stopped,
}

impl Default for LoopState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopState::Idle => write!(f, "Idle"),
            LoopState::ListeningHotword => write!(f, "ListeningHotword"),
            LoopState::ListeningSecondary => write!(f, "ListeningSecondary"),
            LoopState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Tunables fixed for the lifetime of one loop
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Minimum hotword confidence, inclusive
    pub threshold: Confidence,
    /// Pause after a failed hotword listen before retrying
    pub failure_backoff: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            threshold: Confidence::Medium,
            failure_backoff: Duration::from_millis(500),
        }
    }
}

/// Counters reported when a loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub hotword_listens: u64,
    pub detections: u64,
    pub secondary_captures: u64,
    pub failures: u64,
}

/// The hotword loop; owns both recognizers and its own state
pub struct HotwordLoop {
    state: LoopState,
    state_entered_at: Instant,
    hotword: Recognizer,
    secondary: Recognizer,
    settings: LoopSettings,
    status: StatusSender,
    state_tx: watch::Sender<LoopState>,
    cancel: CancellationToken,
    summary: LoopSummary,
}

impl HotwordLoop {
    /// Create a loop from two prepared recognizers
    pub fn new(
        hotword: Recognizer,
        secondary: Recognizer,
        settings: LoopSettings,
        status: StatusSender,
        cancel: CancellationToken,
    ) -> Result<Self, RecognizerError> {
        for recognizer in [&hotword, &secondary] {
            if !recognizer.is_ready() {
                return Err(RecognizerError::NotReady(
                    recognizer.vocabulary().name().to_string(),
                ));
            }
        }

        let (state_tx, _) = watch::channel(LoopState::Idle);

        Ok(Self {
            state: LoopState::Idle,
            state_entered_at: Instant::now(),
            hotword,
            secondary,
            settings,
            status,
            state_tx,
            cancel,
            summary: LoopSummary::default(),
        })
    }

    /// Observe state changes without being able to make them
    pub fn subscribe(&self) -> watch::Receiver<LoopState> {
        self.state_tx.subscribe()
    }

    /// Run until cancelled, then report what happened
    pub async fn run(mut self) -> LoopSummary {
        info!(
            hotword = ?self.hotword.vocabulary().phrases(),
            threshold = %self.settings.threshold,
            "hotword loop started"
        );

        while !self.cancel.is_cancelled() {
            if self.listen_once().await.is_break() {
                break;
            }
        }

        self.transition_to(StatusEvent::stopped());
        let summary = self.summary;
        info!(?summary, "hotword loop stopped");
        summary
    }

    /// One hotword listen, plus a secondary capture if it was confident
    async fn listen_once(&mut self) -> ControlFlow<()> {
        self.transition_to(StatusEvent::listening_for_hotword());
        self.summary.hotword_listens += 1;

        let outcome = match self.hotword.recognize().await {
            Ok(outcome) => outcome,
            Err(RecognizerError::Cancelled) => return ControlFlow::Break(()),
            Err(e) => {
                warn!(error = %e, "hotword recognition failed");
                self.summary.failures += 1;
                self.transition_to(StatusEvent::recognition_failed(&e));
                return self.back_off().await;
            }
        };

        if outcome.is_timeout() {
            debug!("hotword listen timed out");
            self.transition_to(StatusEvent::recognition_timed_out());
            return ControlFlow::Continue(());
        }

        if !outcome.meets(self.settings.threshold) {
            debug!(
                text = ?outcome.text,
                confidence = %outcome.confidence,
                "hotword below threshold"
            );
            self.transition_to(StatusEvent::hotword_below_threshold(
                outcome.confidence,
                self.settings.threshold,
            ));
            return ControlFlow::Continue(());
        }

        info!(
            text = ?outcome.text,
            confidence = %outcome.confidence,
            "hotword detected"
        );
        self.summary.detections += 1;
        self.transition_to(StatusEvent::hotword_detected());

        let report = match self.secondary.recognize().await {
            Ok(RecognitionOutcome {
                text: Some(text),
                confidence,
            }) if confidence != Confidence::Rejected => {
                info!(%text, %confidence, "secondary input captured");
                self.summary.secondary_captures += 1;
                StatusEvent::secondary_detected(&text)
            }
            Ok(outcome) => {
                debug!(text = ?outcome.text, "secondary input rejected");
                StatusEvent::secondary_failed()
            }
            Err(RecognizerError::Cancelled) => return ControlFlow::Break(()),
            Err(e) => {
                warn!(error = %e, "secondary recognition failed");
                self.summary.failures += 1;
                StatusEvent::secondary_failed()
            }
        };

        self.transition_to(report);
        ControlFlow::Continue(())
    }

    async fn back_off(&self) -> ControlFlow<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => ControlFlow::Break(()),
            _ = tokio::time::sleep(self.settings.failure_backoff) => ControlFlow::Continue(()),
        }
    }

    /// Move to the event's state and emit the event
    fn transition_to(&mut self, event: StatusEvent) {
        let old_state = self.state;
        let new_state = event.state;

        if new_state != old_state {
            info!(
                from = %old_state,
                to = %new_state,
                duration_ms = self.state_entered_at.elapsed().as_millis() as u64,
                "state transition"
            );
            self.state = new_state;
            self.state_entered_at = Instant::now();
            self.state_tx.send_replace(new_state);
        }

        self.status.emit(event);
    }
}
