//! Gemini adapter
//!
//! Implements the [`CompletionClient`](roundtable_application::CompletionClient)
//! port over the Gemini `generateContent` REST endpoint.

mod client;
mod types;

pub use client::{DEFAULT_API_BASE, GeminiClient, GeminiConfig};
