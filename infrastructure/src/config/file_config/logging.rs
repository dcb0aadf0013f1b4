//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rolling diagnostic logs; stderr when unset
    pub dir: Option<String>,
    /// JSONL file recording every stage's answers for audit
    pub transcript: Option<String>,
}
