//! Result of a successful pipeline run

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// The synthesized, user-facing answer of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalAnswer {
    /// The synthesized answer, also appended to the conversation history
    pub text: String,
    /// Model every agent call used
    pub model: Model,
    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl FinalAnswer {
    pub fn new(text: impl Into<String>, model: Model, elapsed_ms: u64) -> Self {
        Self {
            text: text.into(),
            model,
            elapsed_ms,
        }
    }

    /// Elapsed time in seconds, for display
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}
