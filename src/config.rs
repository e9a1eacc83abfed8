//! Configuration loading and management

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::recognition::{Confidence, Vocabulary};
use crate::state::LoopSettings;
use crate::status::StatusFormat;

const ENV_PREFIX: &str = "PASSIVE_LISTENER_";

/// Listener configuration, fixed for the life of the process
#[derive(Debug, Clone)]
pub struct Config {
    /// Trigger phrase that opens a secondary listen
    pub hotword: String,

    /// Phrases accepted as secondary input
    pub secondary_words: Vec<String>,

    /// Minimum hotword confidence, inclusive
    pub threshold: Confidence,

    pub hotword_timeout: Duration,
    pub secondary_timeout: Duration,

    /// Pause after a failed hotword listen
    pub failure_backoff: Duration,

    /// How long `cancel` waits for the loop before aborting it
    pub stop_timeout: Duration,

    pub status_format: StatusFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotword: "start".to_string(),
            secondary_words: vec!["hello".into(), "welcome".into(), "world".into()],
            threshold: Confidence::Medium,
            hotword_timeout: Duration::from_secs(10),
            secondary_timeout: Duration::from_secs(5),
            failure_backoff: Duration::from_millis(500),
            stop_timeout: Duration::from_secs(2),
            status_format: StatusFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut config = Self::default();

        if let Some(hotword) = var("HOTWORD") {
            config.hotword = hotword.trim().to_string();
        }
        if let Some(words) = var("WORDS") {
            config.secondary_words = words
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(threshold) = var("THRESHOLD") {
            config.threshold = threshold
                .parse()
                .with_context(|| format!("invalid {ENV_PREFIX}THRESHOLD"))?;
        }
        if let Some(format) = var("STATUS_FORMAT") {
            config.status_format = format
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {ENV_PREFIX}STATUS_FORMAT"))?;
        }

        for (name, slot) in [
            ("HOTWORD_TIMEOUT_MS", &mut config.hotword_timeout),
            ("SECONDARY_TIMEOUT_MS", &mut config.secondary_timeout),
            ("FAILURE_BACKOFF_MS", &mut config.failure_backoff),
            ("STOP_TIMEOUT_MS", &mut config.stop_timeout),
        ] {
            if let Some(value) = var(name) {
                let millis: u64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid {ENV_PREFIX}{name}: {value:?}"))?;
                *slot = Duration::from_millis(millis);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.hotword.trim().is_empty() {
            bail!("hotword must not be empty");
        }
        if self.secondary_words.iter().all(|w| w.trim().is_empty()) {
            bail!("secondary vocabulary must contain at least one word");
        }
        if self.hotword_timeout.is_zero() || self.secondary_timeout.is_zero() {
            bail!("recognition timeouts must be greater than zero");
        }
        Ok(())
    }

    pub fn hotword_vocabulary(&self) -> Result<Vocabulary> {
        Ok(Vocabulary::new("hotword", [&self.hotword])?)
    }

    pub fn secondary_vocabulary(&self) -> Result<Vocabulary> {
        Ok(Vocabulary::new("secondary", &self.secondary_words)?)
    }

    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            threshold: self.threshold,
            failure_backoff: self.failure_backoff,
        }
    }
}
