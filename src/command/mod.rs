mod commands;
mod history;

use thiserror::Error;

pub use commands::Command;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The command cannot be executed in the current state
    #[error("Command cannot run in the current state")]
    InvalidState,
    /// Undo was asked for but the history is empty
    #[error("Nothing to undo")]
    NothingToUndo,
    /// Redo was asked for but nothing has been undone
    #[error("Nothing to redo")]
    NothingToRedo,
}
