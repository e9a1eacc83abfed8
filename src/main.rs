//! passive-listener: background hotword listener
//!
//! Listens continuously for a fixed hotword. After a confident detection it
//! captures one follow-up utterance, reports it, and goes back to listening
//! for the hotword.
//!
//! - Utterances are read from stdin, one per line
//! - Status lines are printed to stdout, logs go to stderr
//! - SIGUSR1 toggles listening, SIGINT/SIGTERM shut down

mod config;
mod events;
mod lifecycle;
mod recognition;
mod state;
mod status;

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::lifecycle::{ControlError, ControlSignal, ControlSignals, ListenerController};
use crate::recognition::{ConsoleService, RecognitionService};
use crate::status::ConsoleSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "passive-listener starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(
        hotword = %config.hotword,
        words = ?config.secondary_words,
        threshold = %config.threshold,
        "configuration loaded"
    );

    let mut signals = ControlSignals::register()?;

    // Loop -> presentation task
    let (status_tx, status_rx) = status::channel();
    let presenter = tokio::spawn(status::present(
        ConsoleSink::stdout(config.status_format),
        status_rx,
    ));

    let service: Arc<dyn RecognitionService> = Arc::new(ConsoleService::stdin()?);
    let mut controller = ListenerController::new(service, &config, status_tx)?;

    controller.start().await?;
    info!("daemon initialized, entering main loop");

    loop {
        match signals.recv().await {
            ControlSignal::Toggle => match controller.toggle().await {
                Ok(state) => info!(%state, "listening toggled"),
                Err(ControlError::AlreadyRunning) => warn!("listening already running"),
                Err(e) => error!(error = %e, "failed to toggle listening"),
            },
            ControlSignal::Shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Cleanup
    info!("shutting down...");
    controller.cancel().await;
    drop(controller);

    if let Err(e) = presenter.await {
        warn!(?e, "status presenter failed");
    }

    info!("passive-listener stopped");

    Ok(())
}
