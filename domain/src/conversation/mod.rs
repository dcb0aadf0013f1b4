//! Conversation domain
//!
//! Turns exchanged between the user and the agent panel, and the
//! append-only history that carries them between runs.

pub mod entities;
