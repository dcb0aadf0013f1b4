//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters implement.

pub mod completion_client;
pub mod conversation_logger;
pub mod progress;
