//! Start/stop control of the hotword loop
//!
//! Each start builds fresh recognizers and a fresh cancellation token, so
//! nothing from a cancelled run is reused.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::events::StatusEvent;
use crate::recognition::{RecognitionService, Recognizer, RecognizerError, Vocabulary};
use crate::state::{HotwordLoop, LoopSettings, LoopState, LoopSummary};
use crate::status::StatusSender;

/// Errors returned by [`ListenerController::start`]
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("passive listening is already running")]
    AlreadyRunning,

    #[error("failed to prepare recognizers: {0}")]
    Prepare(#[from] RecognizerError),
}

/// A loop that has been spawned and not yet cancelled
struct ActiveLoop {
    cancel: CancellationToken,
    handle: JoinHandle<LoopSummary>,
    state: watch::Receiver<LoopState>,
}

/// Starts and cancels the background hotword loop
pub struct ListenerController {
    service: Arc<dyn RecognitionService>,
    hotword: Vocabulary,
    secondary: Vocabulary,
    hotword_timeout: Duration,
    secondary_timeout: Duration,
    settings: LoopSettings,
    stop_timeout: Duration,
    status: StatusSender,
    active: Option<ActiveLoop>,
    /// Reported while no loop is active
    resting: LoopState,
}

impl ListenerController {
    /// Create a controller; fails when the configured vocabularies are empty
    pub fn new(
        service: Arc<dyn RecognitionService>,
        config: &Config,
        status: StatusSender,
    ) -> Result<Self> {
        Ok(Self {
            service,
            hotword: config.hotword_vocabulary()?,
            secondary: config.secondary_vocabulary()?,
            hotword_timeout: config.hotword_timeout,
            secondary_timeout: config.secondary_timeout,
            settings: config.loop_settings(),
            stop_timeout: config.stop_timeout,
            status,
            active: None,
            resting: LoopState::Idle,
        })
    }

    /// Prepare fresh recognizers and spawn the loop
    ///
    /// Returns [`ControlError::AlreadyRunning`] without side effects when a
    /// loop is already active.
    pub async fn start(&mut self) -> Result<(), ControlError> {
        if let Some(active) = &self.active {
            if !active.handle.is_finished() {
                return Err(ControlError::AlreadyRunning);
            }
        }
        self.active = None;

        let cancel = CancellationToken::new();
        let mut hotword = Recognizer::new(
            Arc::clone(&self.service),
            self.hotword.clone(),
            self.hotword_timeout,
            cancel.child_token(),
        );
        let mut secondary = Recognizer::new(
            Arc::clone(&self.service),
            self.secondary.clone(),
            self.secondary_timeout,
            cancel.child_token(),
        );

        hotword.prepare().await?;
        secondary.prepare().await?;

        let hotword_loop = HotwordLoop::new(
            hotword,
            secondary,
            self.settings,
            self.status.clone(),
            cancel.clone(),
        )?;
        let state = hotword_loop.subscribe();
        let handle = tokio::spawn(hotword_loop.run());

        info!("passive listening started");
        self.active = Some(ActiveLoop {
            cancel,
            handle,
            state,
        });
        Ok(())
    }

    /// Stop the loop, aborting an in-flight recognition
    ///
    /// Safe to call repeatedly; does nothing when no loop is active.
    pub async fn cancel(&mut self) {
        let Some(mut active) = self.active.take() else {
            debug!("cancel ignored, passive listening not running");
            return;
        };

        active.cancel.cancel();
        match tokio::time::timeout(self.stop_timeout, &mut active.handle).await {
            Ok(Ok(summary)) => {
                info!(?summary, "passive listening stopped");
            }
            Ok(Err(e)) => {
                warn!(?e, "hotword loop task failed");
                self.status.emit(StatusEvent::stopped());
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.stop_timeout.as_millis() as u64,
                    "hotword loop ignored cancellation, aborting"
                );
                active.handle.abort();
                self.status.emit(StatusEvent::stopped());
            }
        }

        self.resting = LoopState::Stopped;
    }

    /// Start when stopped, stop when running
    pub async fn toggle(&mut self) -> Result<LoopState, ControlError> {
        if self.is_running() {
            self.cancel().await;
        } else {
            self.start().await?;
        }
        Ok(self.state())
    }

    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Latest state published by the loop
    pub fn state(&self) -> LoopState {
        match &self.active {
            Some(active) => *active.state.borrow(),
            None => self.resting,
        }
    }
}
