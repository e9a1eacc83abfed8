//! Named phrase sets that a recognizer is bound to

use std::sync::Arc;

/// Errors raised while building a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    #[error("vocabulary {0:?} contains no phrases")]
    Empty(String),
}

/// An ordered, de-duplicated set of candidate phrases plus a name
///
/// Immutable once built; clones share the phrase storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    name: Arc<str>,
    phrases: Arc<[String]>,
}

impl Vocabulary {
    /// Build a vocabulary, dropping blank and duplicate phrases
    ///
    /// Fails when no phrase survives.
    pub fn new<I, S>(name: &str, phrases: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty() || kept.iter().any(|p| p.eq_ignore_ascii_case(phrase)) {
                continue;
            }
            kept.push(phrase.to_string());
        }

        if kept.is_empty() {
            return Err(VocabularyError::Empty(name.to_string()));
        }

        Ok(Self {
            name: Arc::from(name),
            phrases: kept.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}
