//! Pipeline phases

use serde::{Deserialize, Serialize};

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    /// No run in progress; the only phase that accepts a new run
    Idle,
    /// Every agent answers the query independently
    InitialFanOut,
    /// Every agent revises its answer after reading the other three
    Refinement,
    /// One call merges the refined answers into the final answer
    Synthesis,
    Succeeded,
    Failed,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::InitialFanOut => "initial_fan_out",
            PipelinePhase::Refinement => "refinement",
            PipelinePhase::Synthesis => "synthesis",
            PipelinePhase::Succeeded => "succeeded",
            PipelinePhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PipelinePhase::Idle => "Idle",
            PipelinePhase::InitialFanOut => "Gathering initial answers",
            PipelinePhase::Refinement => "Refining answers",
            PipelinePhase::Synthesis => "Synthesizing final answer",
            PipelinePhase::Succeeded => "Done",
            PipelinePhase::Failed => "Failed",
        }
    }

    /// True while a run is issuing or awaiting service calls
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PipelinePhase::InitialFanOut | PipelinePhase::Refinement | PipelinePhase::Synthesis
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelinePhase::Succeeded | PipelinePhase::Failed)
    }

    /// Legal edges of the run state machine.
    ///
    /// Stages advance strictly in order; any active phase may fail; a
    /// finished run re-arms the machine by returning to `Idle`.
    pub fn can_transition_to(&self, next: PipelinePhase) -> bool {
        use PipelinePhase::*;
        match (self, next) {
            (Idle, InitialFanOut)
            | (InitialFanOut, Refinement)
            | (Refinement, Synthesis)
            | (Synthesis, Succeeded) => true,
            (from, Failed) => from.is_active(),
            (from, Idle) => from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A phase in which a service call can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InitialFanOut,
    Refinement,
    Synthesis,
}

impl Stage {
    pub fn phase(&self) -> PipelinePhase {
        match self {
            Stage::InitialFanOut => PipelinePhase::InitialFanOut,
            Stage::Refinement => PipelinePhase::Refinement,
            Stage::Synthesis => PipelinePhase::Synthesis,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.phase().as_str()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_edges() {
        use PipelinePhase::*;
        let path = [Idle, InitialFanOut, Refinement, Synthesis, Succeeded, Idle];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_no_skipping_or_revisiting() {
        use PipelinePhase::*;
        assert!(!Idle.can_transition_to(Refinement));
        assert!(!Idle.can_transition_to(Synthesis));
        assert!(!InitialFanOut.can_transition_to(Synthesis));
        assert!(!Refinement.can_transition_to(InitialFanOut));
        assert!(!Synthesis.can_transition_to(Refinement));
        assert!(!Succeeded.can_transition_to(InitialFanOut));
        assert!(!InitialFanOut.can_transition_to(Idle));
    }

    #[test]
    fn test_only_active_phases_fail() {
        use PipelinePhase::*;
        assert!(InitialFanOut.can_transition_to(Failed));
        assert!(Refinement.can_transition_to(Failed));
        assert!(Synthesis.can_transition_to(Failed));
        assert!(!Idle.can_transition_to(Failed));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(Failed.can_transition_to(Idle));
    }

    #[test]
    fn test_stage_maps_to_phase() {
        assert_eq!(Stage::Refinement.phase(), PipelinePhase::Refinement);
        assert_eq!(Stage::Synthesis.to_string(), "synthesis");
    }
}
