//! Domain layer for roundtable
//!
//! This crate contains the core entities and value objects of the answer
//! pipeline. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! A query is answered by a panel of [`PANEL_SIZE`] agents in three stages:
//!
//! - **Initial fan-out**: every agent answers the query independently
//! - **Refinement**: every agent revises its answer after reading the others
//! - **Synthesis**: one call merges the refined answers into the final answer
//!
//! Only the final answer ever enters the [`ConversationHistory`].

pub mod conversation;
pub mod core;
pub mod pipeline;
pub mod prompt;

// Re-export commonly used types
pub use conversation::entities::{ConversationHistory, Role, Turn};
pub use core::{error::DomainError, model::Model, question::Question};
pub use pipeline::{
    PANEL_SIZE,
    answers::{AgentAnswer, AnswerSet},
    phase::{PipelinePhase, Stage},
    result::FinalAnswer,
    state::PipelineState,
};
pub use prompt::{
    INITIAL_SYSTEM, PromptTemplate, REFINEMENT_SYSTEM, SYNTHESIS_SYSTEM, StagePrompt,
};
