//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - the generation model every agent call uses
//! - [`question::Question`] - a validated user query
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod question;
