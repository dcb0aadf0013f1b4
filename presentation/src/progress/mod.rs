//! Progress reporters for pipeline runs

pub mod reporter;
