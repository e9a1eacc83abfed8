//! Recognition results and confidence levels

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categorical certainty reported by the recognition service
///
/// Variants are declared in ascending order so the derived `Ord`
/// gives `Rejected < Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// The utterance did not match the vocabulary
    Rejected,
    Low,
    Medium,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Rejected => write!(f, "Rejected"),
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// Error returned when a confidence name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown confidence level {0:?} (expected rejected, low, medium or high)")]
pub struct ParseConfidenceError(String);

impl FromStr for Confidence {
    type Err = ParseConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rejected" => Ok(Confidence::Rejected),
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(ParseConfidenceError(s.to_string())),
        }
    }
}

/// Result of a single recognition call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    /// Recognized text; `None` when the service timed out or heard nothing
    pub text: Option<String>,
    pub confidence: Confidence,
}

impl RecognitionOutcome {
    /// An outcome carrying recognized text
    pub fn heard(text: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            text: Some(text.into()),
            confidence,
        }
    }

    /// An outcome for a listen that ended without any speech
    pub fn timed_out() -> Self {
        Self {
            text: None,
            confidence: Confidence::Rejected,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.text.is_none()
    }

    /// Whether this outcome clears the given threshold (inclusive)
    ///
    /// Absent text never clears a threshold, whatever its confidence says.
    pub fn meets(&self, threshold: Confidence) -> bool {
        self.text.is_some() && self.confidence >= threshold
    }
}
