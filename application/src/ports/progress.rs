//! Progress notification port
//!
//! Defines the interface for reporting pipeline progress to the
//! presentation layer.

use roundtable_domain::{PipelinePhase, Stage};

/// Observer for phase transitions during a pipeline run
///
/// Notifications are fire-and-forget: implementations must return promptly
/// and never block the orchestrator. Implementations live in the
/// presentation layer.
pub trait ProgressReporter: Send + Sync {
    /// Called on every phase change, before the phase issues any request
    fn on_phase_change(&self, phase: &PipelinePhase);

    /// Called when one agent call within a stage resolves
    fn on_agent_complete(&self, _stage: Stage, _index: usize, _success: bool) {}
}

/// No-op reporter for headless runs and tests
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_phase_change(&self, _phase: &PipelinePhase) {}
}
