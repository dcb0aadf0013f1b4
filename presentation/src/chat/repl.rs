//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::SpinnerProgress;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use roundtable_application::{
    CompletionClient, NoProgress, Orchestrator, PipelineError, ProgressReporter,
};
use roundtable_domain::{ConversationHistory, FinalAnswer, Turn};

const HISTORY_CAPACITY: usize = 1000;

/// Slash commands understood by the chat loop
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    History,
    Clear,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        if !line.starts_with('/') {
            return None;
        }
        Some(match line {
            "/help" | "/h" | "/?" => Command::Help,
            "/history" => Command::History,
            "/clear" => Command::Clear,
            "/quit" | "/exit" | "/q" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        })
    }
}

/// Interactive chat REPL
///
/// Owns the conversation. A question and its synthesized answer are kept
/// only together: a failed run leaves the conversation as it was.
pub struct ChatRepl<C: CompletionClient + 'static> {
    orchestrator: Orchestrator<C>,
    history: ConversationHistory,
    config: ReplConfig,
}

impl<C: CompletionClient + 'static> ChatRepl<C> {
    pub fn new(orchestrator: Orchestrator<C>, config: ReplConfig) -> Self {
        Self {
            orchestrator,
            history: ConversationHistory::new(),
            config,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run the interactive REPL until `/quit` or end of input
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("roundtable ".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(buffer) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = Command::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                eprintln!("{} line history disabled: {}", "Warning:".yellow(), e);
                editor
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           Roundtable - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.orchestrator.model());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /history          - Show the conversation so far");
        println!("  /clear            - Start a new conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => {
                println!("Bye!");
                return true;
            }
            Command::Help => {
                println!();
                Self::print_help();
            }
            Command::History => {
                println!();
                print!("{}", ConsoleFormatter::format_history(&self.history));
                println!();
            }
            Command::Clear => {
                self.history = ConversationHistory::new();
                println!("Conversation cleared.");
            }
            Command::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        let result = if self.config.show_progress {
            let progress = SpinnerProgress::new();
            self.ask(question, &progress).await
        } else {
            self.ask(question, &NoProgress).await
        };

        match result {
            Ok(answer) => println!("{}", ConsoleFormatter::format(&answer)),
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e)),
        }
        println!();
    }

    /// Run the pipeline over the conversation plus `question`.
    ///
    /// The question is recorded on a candidate copy that replaces the
    /// conversation only once the orchestrator has appended the answer.
    async fn ask(
        &mut self,
        question: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<FinalAnswer, PipelineError> {
        let mut candidate = self.history.clone();
        candidate.push(Turn::user(question));
        let answer = self
            .orchestrator
            .run(question, &mut candidate, progress)
            .await?;
        self.history = candidate;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roundtable_application::ServiceError;
    use roundtable_domain::{Model, REFINEMENT_SYSTEM, SYNTHESIS_SYSTEM};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Answers every call and records what it was sent; the first
    /// `failing_syntheses` synthesis calls fail
    struct ScriptedClient {
        failing_syntheses: AtomicUsize,
        calls: Mutex<Vec<Vec<Turn>>>,
    }

    impl ScriptedClient {
        fn new(failing_syntheses: usize) -> Self {
            Self {
                failing_syntheses: AtomicUsize::new(failing_syntheses),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn generate(
            &self,
            _model: &Model,
            contents: &[Turn],
            system_instruction: &str,
        ) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push(contents.to_vec());
            if system_instruction == SYNTHESIS_SYSTEM {
                let remaining = self.failing_syntheses.load(Ordering::SeqCst);
                if remaining > 0 {
                    self.failing_syntheses.store(remaining - 1, Ordering::SeqCst);
                    return Err(ServiceError::Status {
                        status: 500,
                        body: "boom".to_string(),
                    });
                }
                return Ok("Final".to_string());
            }
            if system_instruction == REFINEMENT_SYSTEM {
                return Ok("refined".to_string());
            }
            Ok("initial".to_string())
        }
    }

    fn repl(failing_syntheses: usize) -> (Arc<ScriptedClient>, ChatRepl<ScriptedClient>) {
        let client = Arc::new(ScriptedClient::new(failing_syntheses));
        let orchestrator = Orchestrator::new(Arc::clone(&client), Model::default());
        (client, ChatRepl::new(orchestrator, ReplConfig::default()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
        assert_eq!(Command::parse("/q"), Some(Command::Quit));
        assert_eq!(Command::parse("/history"), Some(Command::History));
        assert_eq!(Command::parse("/clear"), Some(Command::Clear));
        assert_eq!(Command::parse("/?"), Some(Command::Help));
        assert_eq!(
            Command::parse("/models"),
            Some(Command::Unknown("/models".to_string()))
        );
        assert_eq!(Command::parse("What is /dev/null?"), None);
    }

    #[tokio::test]
    async fn test_ask_records_question_and_answer() {
        let (_client, mut repl) = repl(0);

        let answer = repl.ask("Define entropy.", &NoProgress).await.unwrap();

        assert_eq!(answer.text, "Final");
        assert_eq!(
            repl.history().turns(),
            &[Turn::user("Define entropy."), Turn::agent("Final")]
        );
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_conversation_unchanged() {
        let (_client, mut repl) = repl(1);

        let err = repl.ask("Q1", &NoProgress).await.unwrap_err();

        assert!(matches!(err, PipelineError::Stage { .. }));
        assert!(repl.history().is_empty());
    }

    #[tokio::test]
    async fn test_failed_question_is_not_sent_with_the_next_one() {
        let (client, mut repl) = repl(1);

        repl.ask("Q1", &NoProgress).await.unwrap_err();
        client.calls.lock().unwrap().clear();
        repl.ask("Q2", &NoProgress).await.unwrap();

        for contents in client.calls.lock().unwrap().iter() {
            assert!(contents.iter().all(|turn| turn.text() != "Q1"));
        }
        assert_eq!(client.calls.lock().unwrap()[0], vec![Turn::user("Q2")]);
        assert_eq!(
            repl.history().turns(),
            &[Turn::user("Q2"), Turn::agent("Final")]
        );
    }

    #[test]
    fn test_clear_resets_conversation() {
        let (_client, mut repl) = repl(0);
        repl.history.push(Turn::user("hi"));

        assert!(!repl.handle_command(Command::Clear));
        assert!(repl.history().is_empty());
        assert!(repl.handle_command(Command::Quit));
    }
}
