//! In-memory recognition service driven by per-vocabulary scripts

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use super::outcome::RecognitionOutcome;
use super::service::{RecognitionService, ServiceError};
use super::vocabulary::Vocabulary;

type Reply = Result<RecognitionOutcome, ServiceError>;

/// Replays scripted replies and records every call it receives
///
/// When a vocabulary's script runs out the repeat reply is used; with no
/// repeat reply the call never completes, like a service waiting on silence.
#[derive(Default)]
pub struct ScriptedService {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    repeats: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
    preloads: Mutex<Vec<String>>,
    fail_preload: bool,
    call_made: Notify,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_preload(mut self) -> Self {
        self.fail_preload = true;
        self
    }

    pub fn script(&self, vocabulary: &str, outcome: RecognitionOutcome) {
        self.push(vocabulary, Ok(outcome));
    }

    pub fn script_error(&self, vocabulary: &str, error: ServiceError) {
        self.push(vocabulary, Err(error));
    }

    pub fn repeat(&self, vocabulary: &str, outcome: RecognitionOutcome) {
        self.repeats
            .lock()
            .unwrap()
            .insert(vocabulary.to_string(), Ok(outcome));
    }

    pub fn repeat_error(&self, vocabulary: &str, error: ServiceError) {
        self.repeats
            .lock()
            .unwrap()
            .insert(vocabulary.to_string(), Err(error));
    }

    /// Vocabulary names of every recognize call, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn preloads(&self) -> Vec<String> {
        self.preloads.lock().unwrap().clone()
    }

    /// Wait until at least `count` recognize calls have been made
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.call_made.notified();
            if self.calls.lock().unwrap().len() >= count {
                return;
            }
            notified.await;
        }
    }

    fn push(&self, vocabulary: &str, reply: Reply) {
        self.scripts
            .lock()
            .unwrap()
            .entry(vocabulary.to_string())
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, vocabulary: &str) -> Option<Reply> {
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(vocabulary)
            .and_then(VecDeque::pop_front);
        scripted.or_else(|| self.repeats.lock().unwrap().get(vocabulary).cloned())
    }
}

#[async_trait]
impl RecognitionService for ScriptedService {
    async fn preload(&self, vocabulary: &Vocabulary) -> Result<(), ServiceError> {
        if self.fail_preload {
            return Err(ServiceError::Unavailable("scripted preload failure".into()));
        }
        self.preloads
            .lock()
            .unwrap()
            .push(vocabulary.name().to_string());
        Ok(())
    }

    async fn recognize(
        &self,
        vocabulary: &Vocabulary,
        _timeout: Duration,
    ) -> Result<RecognitionOutcome, ServiceError> {
        let name = vocabulary.name();
        if !self.preloads.lock().unwrap().iter().any(|p| p == name) {
            return Err(ServiceError::NotLoaded(name.to_string()));
        }

        self.calls.lock().unwrap().push(name.to_string());
        self.call_made.notify_waiters();

        match self.next_reply(name) {
            Some(reply) => {
                tokio::task::yield_now().await;
                reply
            }
            None => std::future::pending().await,
        }
    }
}
