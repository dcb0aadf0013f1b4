//! Pipeline configuration from TOML (`[pipeline]` section)

use roundtable_domain::Model;
use serde::{Deserialize, Serialize};

/// Raw pipeline configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Model used for every agent call
    pub model: String,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            model: Model::default().to_string(),
        }
    }
}

impl FilePipelineConfig {
    pub fn parse_model(&self) -> Model {
        Model::from(self.model.trim())
    }
}
