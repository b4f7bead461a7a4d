//! Error handling for the session-replay crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for session-replay operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while replaying a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Reading the scenario file failed.
    #[error("Failed to read scenario {path}: {source}")]
    ReadScenario {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The scenario is not valid RON or does not match the schema.
    #[error("Invalid scenario: {0}")]
    Scenario(#[from] ron::error::SpannedError),
    /// The scenario refers to something its desktop does not define.
    #[error("Inconsistent scenario: {0}")]
    Inconsistent(String),
    /// Errors surfaced by the coordinator.
    #[error("Coordinator error: {0}")]
    Coordinator(#[from] session_coordinator::Error),
}

impl Error {
    /// Helper to build a consistency error from an arbitrary message.
    pub fn inconsistent<M: Into<String>>(msg: M) -> Self {
        Self::Inconsistent(msg.into())
    }
}
