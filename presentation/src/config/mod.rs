//! Presentation-level configuration
//!
//! Configuration for output formatting and REPL behavior.

use crate::cli::commands::OutputFormat;
use serde::{Deserialize, Serialize};

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Line-editor history location: the configured file, else the data dir
    pub fn history_path(&self) -> Option<std::path::PathBuf> {
        match &self.history_file {
            Some(path) => Some(path.into()),
            None => dirs::data_dir().map(|p| p.join("roundtable").join("history.txt")),
        }
    }
}
