//! Pipeline domain
//!
//! Value objects for the three-stage answer pipeline:
//! - [`phase::PipelinePhase`] / [`phase::Stage`] - where a run is
//! - [`state::PipelineState`] - the state machine owned by the orchestrator
//! - [`answers::AnswerSet`] - a full, index-stable set of agent answers
//! - [`result::FinalAnswer`] - what a successful run hands back

pub mod answers;
pub mod phase;
pub mod result;
pub mod state;

/// Number of agents in every fan-out stage
pub const PANEL_SIZE: usize = 4;
