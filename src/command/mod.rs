mod commands;
mod history;
mod render;

use thiserror::Error;

use crate::config::ConfigError;
use crate::error::{BufferError, FillError};

pub use commands::Command;
pub use history::{EngineState, HistoryOutcome, UndoRedoEngine};

/// Result type for command operations
pub type CommandResult<T = ()> = Result<T, CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command cannot be executed in the current state
    #[error("command cannot run in the current state: {0}")]
    InvalidState(String),

    /// The command parameters are invalid
    #[error("invalid command parameters: {0}")]
    InvalidParameters(String),

    /// The command failed during execution
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Fill(#[from] FillError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
