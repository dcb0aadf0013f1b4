//! Application layer for roundtable
//!
//! This crate contains the pipeline orchestrator, the fan-out executor,
//! and the port definitions adapters implement. It depends only on the
//! domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    completion_client::{CompletionClient, ServiceError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressReporter},
};
pub use use_cases::fan_out::{FanOutError, FanOutExecutor};
pub use use_cases::run_pipeline::{Orchestrator, PipelineError};
