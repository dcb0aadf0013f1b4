//! Domain error types

use crate::pipeline::phase::PipelinePhase;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: PipelinePhase,
        to: PipelinePhase,
    },

    #[error("Expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

impl DomainError {
    /// Check if this error was raised by the pipeline state machine
    pub fn is_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
