//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["roundtable.toml", ".roundtable.toml"];
const ENV_PREFIX: &str = "ROUNDTABLE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Later sources override earlier ones: defaults, global file, project
    /// file, explicit `--config` file, then environment.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            // Toml::file silently skips missing files; an explicit path must exist
            figment = figment.merge(Toml::file_exact(path));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load a single file over the defaults, ignoring discovery and env
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(FileConfig::default()))
                .merge(Toml::file_exact(path)),
        )
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn extract(figment: Figment) -> Result<FileConfig, Box<figment::Error>> {
        figment.extract().map_err(Box::new)
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("roundtable").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `--show-config`)
    pub fn config_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {}*", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./roundtable.toml or ./.roundtable.toml".into()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileOutputFormat;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.pipeline.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout_seconds, 120);
        assert!(config.logging.transcript.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains("roundtable"));
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[pipeline]
model = "gemini-2.5-pro"

[output]
format = "json"

[logging]
transcript = "/tmp/roundtable.jsonl"
"#
        )
        .unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(config.pipeline.model, "gemini-2.5-pro");
        assert_eq!(config.output.format, Some(FileOutputFormat::Json));
        assert_eq!(
            config.logging.transcript.as_deref(),
            Some("/tmp/roundtable.jsonl")
        );
        // untouched sections keep defaults
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_load_file_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gemini]\ntimeout_seconds = \"soon\"").unwrap();

        assert!(ConfigLoader::load_file(file.path()).is_err());
    }

    #[test]
    fn test_load_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ConfigLoader::load_file(&missing).is_err());
    }

    #[test]
    fn test_config_sources_lists_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("custom.toml");
        let lines = ConfigLoader::config_sources(Some(&missing));
        assert!(lines.iter().any(|l| l.contains("MISSING") && l.contains("custom.toml")));
        assert!(lines.iter().any(|l| l.contains("ROUNDTABLE_")));
    }
}
