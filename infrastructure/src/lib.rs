//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gemini;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGeminiConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FilePipelineConfig, FileReplConfig,
};
pub use gemini::{DEFAULT_API_BASE, GeminiClient, GeminiConfig};
pub use logging::JsonlConversationLogger;
