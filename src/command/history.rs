use super::{Command, CommandContext, CommandResult};

/// Linear undo history with a pointer to the last executed command.
/// Executing a new command discards everything after the pointer.
#[derive(Debug, Default)]
pub struct CommandHistory {
    commands: Vec<Command>,
    last_index: Option<usize>,
    /// Selection revision right after the last execute. Cleared by undo/redo
    /// so an edit after undo never merges into an older entry.
    selection_revision: Option<u64>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and record it. Empty groups are ignored; a failed
    /// command is not recorded.
    ///
    /// A `SetValue` following a `SetValue` on the same object, field and
    /// value kind, with no selection change in between, replaces the previous
    /// entry's new value instead of adding an entry.
    pub fn execute(&mut self, command: Command, ctx: &mut CommandContext<'_>) -> CommandResult {
        if command.is_empty() {
            log::debug!("Skipping empty command group '{}'", command.name());
            return Ok(());
        }
        let revision = ctx.selection.revision();
        command.execute(ctx)?;

        let keep = self.last_index.map_or(0, |index| index + 1);
        self.commands.truncate(keep);

        let merges = self.selection_revision == Some(revision)
            && matches!(
                (self.commands.last(), &command),
                (Some(Command::SetValue(prev)), Command::SetValue(next)) if prev.can_merge(next)
            );
        if merges {
            if let (Some(Command::SetValue(prev)), Command::SetValue(next)) = (self.commands.last_mut(), command) {
                log::debug!("Merged edit of {} into previous history entry", next.field);
                prev.merge(next);
            }
        } else {
            log::debug!("Executed '{}'", command.name());
            self.commands.push(command);
        }
        self.last_index = Some(self.commands.len() - 1);
        self.selection_revision = Some(ctx.selection.revision());
        Ok(())
    }

    /// Undo the command at the pointer. Returns false at the start of history.
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) -> Result<bool, super::CommandError> {
        let Some(index) = self.last_index else {
            return Ok(false);
        };
        self.commands[index].undo(ctx)?;
        log::debug!("Undid '{}'", self.commands[index].name());
        self.last_index = index.checked_sub(1);
        self.selection_revision = None;
        Ok(true)
    }

    /// Re-execute the command after the pointer. Returns false at the end of history.
    pub fn redo(&mut self, ctx: &mut CommandContext<'_>) -> Result<bool, super::CommandError> {
        let next = self.last_index.map_or(0, |index| index + 1);
        let Some(command) = self.commands.get(next) else {
            return Ok(false);
        };
        command.execute(ctx)?;
        log::debug!("Redid '{}'", command.name());
        self.last_index = Some(next);
        self.selection_revision = None;
        Ok(true)
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        self.last_index.is_some()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        self.last_index.map_or(0, |index| index + 1) < self.commands.len()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.last_index = None;
        self.selection_revision = None;
    }
}
