//! Console output formatter for pipeline results

use colored::Colorize;
use roundtable_application::PipelineError;
use roundtable_domain::{ConversationHistory, FinalAnswer, Role};

/// Formats final answers, failures and history for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The synthesized answer with a one-line footer
    pub fn format(answer: &FinalAnswer) -> String {
        format!(
            "{}\n\n{}\n",
            answer.text.trim_end(),
            Self::footer(answer).dimmed()
        )
    }

    /// Machine-readable result for `--output json`
    pub fn format_json(query: &str, answer: &FinalAnswer) -> String {
        let value = serde_json::json!({
            "query": query,
            "answer": answer.text,
            "model": answer.model,
            "elapsed_ms": answer.elapsed_ms,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generic failure notice naming the stage; never a partial answer
    pub fn format_error(error: &PipelineError) -> String {
        let detail = match error {
            PipelineError::Busy => "a previous question is still being answered".to_string(),
            PipelineError::EmptyQuery => "the question is empty".to_string(),
            PipelineError::Stage { stage, error } => {
                format!("failed during {}: {}", stage.as_str().replace('_', " "), error)
            }
            PipelineError::State(e) => e.to_string(),
        };
        format!("{} {}", "Sorry, no answer this time:".red().bold(), detail)
    }

    pub fn format_error_json(query: &str, error: &PipelineError) -> String {
        let value = serde_json::json!({
            "query": query,
            "error": error.to_string(),
            "stage": error.stage().map(|s| s.as_str()),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Conversation so far, for the `/history` command
    pub fn format_history(history: &ConversationHistory) -> String {
        if history.is_empty() {
            return format!("{}\n", "(no conversation yet)".dimmed());
        }

        let mut output = String::new();
        for turn in history.turns() {
            let speaker = match turn.role() {
                Role::User => "You:".cyan().bold(),
                Role::Agent => "Roundtable:".yellow().bold(),
            };
            output.push_str(&format!("{} {}\n", speaker, Self::indent_tail(turn.text(), "  ")));
        }
        output
    }

    fn footer(answer: &FinalAnswer) -> String {
        format!("-- {} | {:.1}s", answer.model, answer.elapsed_secs())
    }

    /// Indent every line but the first
    fn indent_tail(text: &str, prefix: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("{}{}", prefix, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
