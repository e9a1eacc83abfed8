//! Unix signals acting as the listener's external controls
//!
//! SIGUSR1 plays the part of the start/stop button; SIGINT and SIGTERM
//! shut the daemon down.

use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::debug;

/// A control request received from outside the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Start listening if stopped, stop if listening
    Toggle,
    /// Stop listening and exit
    Shutdown,
}

/// Registered signal streams
pub struct ControlSignals {
    toggle: Signal,
    terminate: Signal,
    interrupt: Signal,
}

impl ControlSignals {
    /// Register handlers for SIGUSR1, SIGTERM and SIGINT
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            toggle: signal(SignalKind::user_defined1())?,
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for the next control request
    pub async fn recv(&mut self) -> ControlSignal {
        tokio::select! {
            _ = self.toggle.recv() => {
                debug!("received SIGUSR1");
                ControlSignal::Toggle
            }
            _ = self.terminate.recv() => {
                debug!("received SIGTERM");
                ControlSignal::Shutdown
            }
            _ = self.interrupt.recv() => {
                debug!("received SIGINT");
                ControlSignal::Shutdown
            }
        }
    }
}
