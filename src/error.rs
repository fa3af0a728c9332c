//! Error types for the op CLI.
//!
//! Uses thiserror for derive macros. Configuration failures carry the path
//! involved so the message printed by `main` is actionable on its own.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for op operations.
#[derive(Error, Debug)]
pub enum OpError {
    /// The workspace directory could not be created.
    #[error("cannot create workspace at '{}': {source}", .path.display())]
    WorkspaceCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seeded default configuration could not be persisted.
    #[error("cannot save default configuration file at '{}': {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace configuration file exists but could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace configuration file is not valid configuration YAML.
    #[error("failed to parse config file '{}': {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// User provided invalid input or referenced something that does not exist.
    #[error("{0}")]
    UserError(String),

    /// The container runtime could not be invoked or reported a failure.
    #[error("container runtime failed: {0}")]
    RuntimeError(String),
}

impl OpError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            OpError::WorkspaceCreate { .. }
            | OpError::ConfigWrite { .. }
            | OpError::ConfigRead { .. }
            | OpError::ConfigParse { .. } => exit_codes::CONFIG_FAILURE,
            OpError::UserError(_) => exit_codes::USER_ERROR,
            OpError::RuntimeError(_) => exit_codes::RUNTIME_FAILURE,
        }
    }
}

/// Result type alias for op operations.
pub type Result<T> = std::result::Result<T, OpError>;
