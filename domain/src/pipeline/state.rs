//! Pipeline state machine

use super::phase::PipelinePhase;
use crate::core::error::DomainError;
use std::time::{Duration, Instant};

/// State of the orchestrator's single run slot (Value Object)
///
/// Replaces UI-held globals (phase label, busy flag, timer) with one value
/// the orchestrator owns and callers read by snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    phase: PipelinePhase,
    started_at: Option<Instant>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            phase: PipelinePhase::Idle,
            started_at: None,
        }
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// A run holds the slot from `InitialFanOut` until it returns to `Idle`
    pub fn is_busy(&self) -> bool {
        self.phase != PipelinePhase::Idle
    }

    /// Time since the current run started, if one is in progress
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|t| t.elapsed())
    }

    /// Move to `next`, rejecting edges the state machine does not allow.
    pub fn advance(&mut self, next: PipelinePhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        match next {
            PipelinePhase::InitialFanOut => self.started_at = Some(Instant::now()),
            PipelinePhase::Idle => self.started_at = None,
            _ => {}
        }
        self.phase = next;
        Ok(())
    }

    /// Return to `Idle` from any phase.
    ///
    /// Used when a run is abandoned before reaching a terminal phase.
    pub fn reset(&mut self) {
        self.phase = PipelinePhase::Idle;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = PipelineState::new();
        assert_eq!(state.phase(), PipelinePhase::Idle);
        assert!(!state.is_busy());
        assert!(state.elapsed().is_none());
    }

    #[test]
    fn test_advance_through_happy_path() {
        let mut state = PipelineState::new();
        state.advance(PipelinePhase::InitialFanOut).unwrap();
        assert!(state.is_busy());
        assert!(state.elapsed().is_some());
        state.advance(PipelinePhase::Refinement).unwrap();
        state.advance(PipelinePhase::Synthesis).unwrap();
        state.advance(PipelinePhase::Succeeded).unwrap();
        assert!(state.is_busy());
        state.advance(PipelinePhase::Idle).unwrap();
        assert!(!state.is_busy());
        assert!(state.elapsed().is_none());
    }

    #[test]
    fn test_advance_rejects_skip() {
        let mut state = PipelineState::new();
        let err = state.advance(PipelinePhase::Synthesis).unwrap_err();
        assert!(err.is_transition());
        assert_eq!(state.phase(), PipelinePhase::Idle);
    }

    #[test]
    fn test_reset_from_active_phase() {
        let mut state = PipelineState::new();
        state.advance(PipelinePhase::InitialFanOut).unwrap();
        state.reset();
        assert_eq!(state.phase(), PipelinePhase::Idle);
    }
}
