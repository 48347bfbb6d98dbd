// src/errors.rs

//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::Interruption;

#[derive(Error, Debug)]
pub enum RebakeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Cannot read dependency graph {path:?}: {source}")]
    GraphFile {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cycle detected in dependency graph: {0}")]
    DagCycle(String),

    #[error("Variable {0} is not set in the build environment")]
    MissingVariable(String),

    #[error("`{command}` failed (exit code {code:?})")]
    ToolFailed { command: String, code: Option<i32> },

    #[error("{0}")]
    Interrupted(Interruption),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RebakeError {
    /// The interruption behind this error, if it is one.
    pub fn interruption(&self) -> Option<Interruption> {
        match self {
            RebakeError::Interrupted(kind) => Some(*kind),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RebakeError>;
