//! Console-driven recognition service
//!
//! Treats every line typed on stdin as a spoken utterance and grades it
//! against the active vocabulary. Stands in for a real speech engine when
//! running the daemon from a terminal.

use std::collections::HashSet;
use std::io::BufRead;
use std::sync::Mutex as StdMutex;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::outcome::{Confidence, RecognitionOutcome};
use super::service::{RecognitionService, ServiceError};
use super::vocabulary::Vocabulary;

/// Recognition service fed by lines of text
pub struct ConsoleService {
    lines: Mutex<mpsc::Receiver<String>>,
    loaded: StdMutex<HashSet<String>>,
}

impl ConsoleService {
    /// Start reading utterances from stdin
    ///
    /// Reads on a dedicated thread so a pending read never holds up
    /// runtime shutdown.
    pub fn stdin() -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel(16);

        thread::Builder::new()
            .name("utterance-reader".to_string())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.blocking_send(line).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!(?e, "failed to read utterance");
                            return;
                        }
                    }
                }
                info!("utterance input closed");
            })?;

        Ok(Self::with_receiver(rx))
    }

    fn with_receiver(rx: mpsc::Receiver<String>) -> Self {
        Self {
            lines: Mutex::new(rx),
            loaded: StdMutex::new(HashSet::new()),
        }
    }

    fn is_loaded(&self, vocabulary: &Vocabulary) -> bool {
        self.loaded
            .lock()
            .map(|loaded| loaded.contains(vocabulary.name()))
            .unwrap_or(false)
    }
}

#[async_trait]
impl RecognitionService for ConsoleService {
    async fn preload(&self, vocabulary: &Vocabulary) -> Result<(), ServiceError> {
        let mut loaded = self
            .loaded
            .lock()
            .map_err(|_| ServiceError::Unavailable("grammar table poisoned".into()))?;
        loaded.insert(vocabulary.name().to_string());
        debug!(vocabulary = vocabulary.name(), "grammar loaded");
        Ok(())
    }

    async fn recognize(
        &self,
        vocabulary: &Vocabulary,
        timeout: Duration,
    ) -> Result<RecognitionOutcome, ServiceError> {
        if !self.is_loaded(vocabulary) {
            return Err(ServiceError::NotLoaded(vocabulary.name().to_string()));
        }

        let mut lines = self.lines.lock().await;
        match tokio::time::timeout(timeout, lines.recv()).await {
            Ok(Some(line)) => Ok(grade(vocabulary, &line)),
            Ok(None) => Err(ServiceError::Closed),
            Err(_) => Ok(RecognitionOutcome::timed_out()),
        }
    }
}

/// Grade an utterance against every phrase and keep the best match
///
/// Exact match is High, the phrase appearing as a word run is Medium, a
/// single shared word is Low. A blank utterance counts as silence.
pub fn grade(vocabulary: &Vocabulary, utterance: &str) -> RecognitionOutcome {
    let heard = normalize(utterance);
    if heard.is_empty() {
        return RecognitionOutcome::timed_out();
    }
    let heard_words: Vec<&str> = heard.split(' ').collect();

    let mut best: Option<(Confidence, &str)> = None;
    for phrase in vocabulary.phrases() {
        let wanted = normalize(phrase);
        let wanted_words: Vec<&str> = wanted.split(' ').collect();

        let confidence = if heard == wanted {
            Confidence::High
        } else if heard_words
            .windows(wanted_words.len())
            .any(|window| window == wanted_words.as_slice())
        {
            Confidence::Medium
        } else if wanted_words.iter().any(|w| heard_words.contains(w)) {
            Confidence::Low
        } else {
            continue;
        };

        if best.map_or(true, |(c, _)| confidence > c) {
            best = Some((confidence, phrase.as_str()));
        }
    }

    match best {
        Some((confidence, phrase)) => RecognitionOutcome::heard(phrase, confidence),
        None => RecognitionOutcome::heard(heard, Confidence::Rejected),
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
