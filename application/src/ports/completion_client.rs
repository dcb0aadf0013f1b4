//! Completion client port
//!
//! Defines the interface for a single call to the hosted generation service.

use async_trait::async_trait;
use roundtable_domain::{Model, Turn};
use thiserror::Error;

/// Errors from a single generation call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned an empty response")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Client misconfigured: {0}")]
    Configuration(String),

    #[error("Call aborted: {0}")]
    Aborted(String),
}

impl ServiceError {
    /// Human-readable message, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            ServiceError::Transport(m)
            | ServiceError::Malformed(m)
            | ServiceError::Configuration(m)
            | ServiceError::Aborted(m) => m.clone(),
            ServiceError::Status { status, body } => format!("HTTP {}: {}", status, body),
            ServiceError::EmptyResponse => "empty response".to_string(),
        }
    }
}

/// Client for the external text-generation service
///
/// Each call to [`generate`](CompletionClient::generate) makes exactly one
/// outbound request. Implementations do not retry and do not cache; retry
/// policy belongs to the caller. Adapters live in the infrastructure layer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for `contents`, whose last turn is the current prompt.
    ///
    /// Fails on transport errors, non-success status, or an empty or
    /// malformed result.
    async fn generate(
        &self,
        model: &Model,
        contents: &[Turn],
        system_instruction: &str,
    ) -> Result<String, ServiceError>;
}
