//! Interactive chat module
//!
//! Provides a line-editor chat interface over one conversation.

mod repl;

pub use repl::ChatRepl;
