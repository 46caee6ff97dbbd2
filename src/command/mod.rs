mod commands;
mod context;
mod history;

use thiserror::Error;

use crate::error::DesignerError;

pub use commands::{AddDeleteElement, Command, CommandGroup, MoveItem, SetValue};
pub use context::CommandContext;
pub use history::CommandHistory;

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during command execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The document rejected a change
    #[error(transparent)]
    Designer(#[from] DesignerError),

    /// The command cannot be executed in the current editor state
    #[error("Command not possible: {0}")]
    InvalidState(String),
}
