//! Progress reporting for pipeline runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::ProgressReporter;
use roundtable_domain::{PANEL_SIZE, PipelinePhase, Stage};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// "Stage n/3" label for active phases
fn stage_label(phase: &PipelinePhase) -> Option<&'static str> {
    match phase {
        PipelinePhase::InitialFanOut => Some("Stage 1/3"),
        PipelinePhase::Refinement => Some("Stage 2/3"),
        PipelinePhase::Synthesis => Some("Stage 3/3"),
        _ => None,
    }
}

fn agents_in(stage: Stage) -> usize {
    match stage {
        Stage::Synthesis => 1,
        _ => PANEL_SIZE,
    }
}

struct SpinnerState {
    bar: Option<ProgressBar>,
    completed: usize,
}

/// Reports progress with an elapsed-time spinner per stage
///
/// The spinner ticks on its own thread, so the elapsed display keeps moving
/// while agents are in flight and never holds up the pipeline.
pub struct SpinnerProgress {
    state: Mutex<SpinnerState>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SpinnerState {
                bar: None,
                completed: 0,
            }),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock(&self) -> MutexGuard<'_, SpinnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for SpinnerProgress {
    fn on_phase_change(&self, phase: &PipelinePhase) {
        let mut state = self.lock();

        if let Some(bar) = state.bar.take() {
            match phase {
                PipelinePhase::Failed => {
                    bar.abandon_with_message(format!("{} {}", bar.message(), "failed".red()));
                }
                _ => bar.finish_and_clear(),
            }
        }
        state.completed = 0;

        if let Some(label) = stage_label(phase) {
            let bar = ProgressBar::new_spinner();
            bar.set_style(Self::spinner_style());
            bar.set_prefix(label);
            bar.set_message(phase.display_name());
            bar.enable_steady_tick(TICK);
            state.bar = Some(bar);
        }
    }

    fn on_agent_complete(&self, stage: Stage, _index: usize, success: bool) {
        let mut state = self.lock();
        if !success {
            return;
        }
        state.completed += 1;
        if let Some(bar) = &state.bar {
            bar.set_message(format!(
                "{} ({}/{})",
                stage.phase().display_name(),
                state.completed,
                agents_in(stage)
            ));
        }
    }
}

/// Simple line-based progress (no spinner), written to stderr
pub struct SimpleProgress;

impl SimpleProgress {
    fn phase_line(phase: &PipelinePhase) -> Option<String> {
        match stage_label(phase) {
            Some(label) => Some(format!(
                "{} {} {}",
                "->".cyan(),
                label.bold(),
                phase.display_name()
            )),
            None if phase.is_terminal() => Some(format!("{} {}", "->".cyan(), phase.display_name())),
            None => None,
        }
    }

    fn agent_line(stage: Stage, index: usize, success: bool) -> String {
        let who = match stage {
            Stage::Synthesis => "synthesizer".to_string(),
            _ => format!("agent {}", index + 1),
        };
        if success {
            format!("  {} {}", "v".green(), who)
        } else {
            format!("  {} {} (failed)", "x".red(), who)
        }
    }
}

impl ProgressReporter for SimpleProgress {
    fn on_phase_change(&self, phase: &PipelinePhase) {
        if let Some(line) = Self::phase_line(phase) {
            eprintln!("{}", line);
        }
    }

    fn on_agent_complete(&self, stage: Stage, index: usize, success: bool) {
        eprintln!("{}", Self::agent_line(stage, index, success));
    }
}
