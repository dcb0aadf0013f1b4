//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the final answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The answer with a short footer
    Text,
    /// JSON object with query, answer, model and timing
    Json,
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Four agents answer, cross-check each other, and agree on one reply")]
#[command(long_about = r#"
roundtable answers a question with a panel of four agents.

The process has three stages:
1. Initial answers: four agents answer your question in parallel
2. Refinement: each agent revises its answer after reading the other three
3. Synthesis: one final call merges the four revisions into a single answer

Only the synthesized answer is shown and kept as conversation context.

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables (e.g. ROUNDTABLE_PIPELINE__MODEL)
2. --config <path>        Explicit config file
3. ./roundtable.toml      Project-level config
4. ~/.config/roundtable/config.toml   Global config

The API key is read from $GEMINI_API_KEY unless configured otherwise.

Example:
  roundtable "Define entropy."
  roundtable -m gemini-2.5-pro -o json "Compare TCP and QUIC"
  roundtable --chat --transcript ./roundtable.jsonl
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model used for every agent call
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output format (defaults to the config file, then text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append every stage's answers to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}
