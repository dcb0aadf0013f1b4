//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{NoProgress, Orchestrator, ProgressReporter};
use roundtable_domain::{ConversationHistory, Model};
use roundtable_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, GeminiClient, JsonlConversationLogger,
};
use roundtable_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, OutputFormat, ReplConfig, SimpleProgress,
    SpinnerProgress,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::config_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_logging(cli.verbose, &config)?;
    info!("Starting roundtable");

    let output = output_config(&cli, &config);
    if !output.color {
        colored::control::set_override(false);
    }

    let model = match &cli.model {
        Some(name) => Model::from(name.as_str()),
        None => config.pipeline.parse_model(),
    };
    if !Model::known().contains(&model) {
        warn!("Model {} is not a known Gemini model; sending the name as-is", model);
    }

    // === Dependency Injection ===
    let Some(api_key) = config.gemini.resolve_api_key() else {
        bail!(
            "No Gemini API key found. Set ${} or [gemini] api_key in the config file.",
            config.gemini.api_key_env
        );
    };
    let client = Arc::new(GeminiClient::new(config.gemini.to_client_config(api_key))?);

    let mut orchestrator = Orchestrator::new(client, model);
    let transcript = cli
        .transcript
        .clone()
        .or_else(|| config.logging.transcript.as_ref().map(PathBuf::from));
    if let Some(path) = transcript {
        let logger = JsonlConversationLogger::open(&path)
            .with_context(|| format!("Could not open transcript {}", path.display()))?;
        info!("Writing transcript to {}", path.display());
        orchestrator = orchestrator.with_logger(Arc::new(logger));
    }

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.clone(),
        };
        ChatRepl::new(orchestrator, repl_config).run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - query is required
    let Some(query) = cli.query else {
        bail!("A question is required. Use --chat for interactive mode.");
    };

    // Spinners only make sense on a terminal; plain lines otherwise
    let spinner;
    let progress: &dyn ProgressReporter = if cli.quiet {
        &NoProgress
    } else if std::io::stderr().is_terminal() {
        spinner = SpinnerProgress::new();
        &spinner
    } else {
        &SimpleProgress
    };

    let mut history = ConversationHistory::new();
    match orchestrator.run(&query, &mut history, progress).await {
        Ok(answer) => {
            match output.format {
                OutputFormat::Text => println!("{}", ConsoleFormatter::format(&answer)),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&query, &answer)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            match output.format {
                OutputFormat::Text => eprintln!("{}", ConsoleFormatter::format_error(&e)),
                OutputFormat::Json => {
                    println!("{}", ConsoleFormatter::format_error_json(&query, &e))
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Output settings: CLI flags over the config file
fn output_config(cli: &Cli, config: &FileConfig) -> OutputConfig {
    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Text) | None => OutputFormat::Text,
    });
    OutputConfig {
        format,
        color: config.output.color,
    }
}

/// Initialize tracing: `-v` count picks the level, `RUST_LOG` applies otherwise.
///
/// With `[logging] dir` set, logs go to a daily-rolling file instead of stderr.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &config.logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir))?;
            let appender = tracing_appender::rolling::daily(dir, "roundtable.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
