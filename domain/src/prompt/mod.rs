//! Prompt domain
//!
//! Per-stage system instructions and content turns for the answer pipeline.

mod template;

pub use template::{
    INITIAL_SYSTEM, PromptTemplate, REFINEMENT_SYSTEM, SYNTHESIS_SYSTEM, StagePrompt,
};
