//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod gemini;
mod logging;
mod output;
mod pipeline;
mod repl;

pub use gemini::FileGeminiConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use pipeline::FilePipelineConfig;
pub use repl::FileReplConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("gemini.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("pipeline.model cannot be empty")]
    EmptyModelName,

    #[error("gemini.api_base cannot be empty")]
    EmptyApiBase,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Pipeline settings
    pub pipeline: FilePipelineConfig,
    /// Gemini API settings
    pub gemini: FileGeminiConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Log and transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.pipeline.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.gemini.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.gemini.api_base.trim().is_empty() {
            return Err(ConfigValidationError::EmptyApiBase);
        }
        Ok(())
    }
}
