//! CLI support for rowql
//!
//! The binary is a thin wrapper over these functions, so the same behaviour
//! is available to tools that embed the engine.

mod docs;
mod run;

pub use docs::grammar_reference;
pub use run::{RunOptions, execute_check, execute_run, parse_records};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Execution error: {0}")]
    Execution(#[from] crate::ExecutionError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    /// Input parsed as JSON but is not an array of objects
    #[error("Input must be a JSON array of objects (offending element: {0})")]
    NotAnArray(String),
}
