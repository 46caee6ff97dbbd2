use super::{CommandContext, CommandResult};
use crate::document::Document;
use crate::element::{ElementSnapshot, Field, FieldValue, ValueKind};
use crate::error::DesignerResult;
use crate::registry::ObjectId;

/// Assign one field of one data object
#[derive(Debug, Clone, PartialEq)]
pub struct SetValue {
    pub object_id: ObjectId,
    pub field: Field,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub kind: ValueKind,
}

impl SetValue {
    pub fn new(object_id: ObjectId, field: Field, old_value: FieldValue, new_value: FieldValue, kind: ValueKind) -> Self {
        Self {
            object_id,
            field,
            old_value,
            new_value,
            kind,
        }
    }

    /// Build a command that changes `field` of `object_id` from its current value
    pub fn capture(
        document: &Document,
        object_id: ObjectId,
        field: Field,
        new_value: FieldValue,
        kind: ValueKind,
    ) -> DesignerResult<Self> {
        let old_value = document.get_value(object_id, field)?;
        Ok(Self::new(object_id, field, old_value, new_value, kind))
    }

    /// Consecutive edits of the same field through the same kind of input
    pub fn can_merge(&self, next: &SetValue) -> bool {
        self.object_id == next.object_id && self.field == next.field && self.kind == next.kind
    }

    /// Take over the new value of `next`, keeping our old value
    pub fn merge(&mut self, next: SetValue) {
        self.new_value = next.new_value;
    }
}

/// Insert or remove an element together with everything it hosts. The full
/// subtree is stored so either direction can be replayed any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct AddDeleteElement {
    pub add: bool,
    pub snapshot: ElementSnapshot,
    pub container_id: Option<ObjectId>,
    /// Child index inside the container; `None` appends
    pub position: Option<usize>,
}

impl AddDeleteElement {
    pub fn add(snapshot: ElementSnapshot, position: Option<usize>) -> Self {
        Self {
            add: true,
            container_id: snapshot.element.container_id(),
            snapshot,
            position,
        }
    }

    pub fn delete(document: &Document, id: ObjectId) -> DesignerResult<Self> {
        let snapshot = document.snapshot(id)?;
        let container_id = document.element(id)?.container_id;
        let position = match container_id {
            Some(container_id) => document.container(container_id)?.child_index(id),
            None => None,
        };
        Ok(Self {
            add: false,
            snapshot,
            container_id,
            position,
        })
    }

    pub fn element_id(&self) -> ObjectId {
        self.snapshot.id()
    }

    fn insert(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        ctx.add_element(&self.snapshot, self.position)
    }

    fn remove(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        ctx.remove_element(self.snapshot.id())
    }
}

/// Reorder an element inside its container or move it to another container
#[derive(Debug, Clone, PartialEq)]
pub struct MoveItem {
    pub item_id: ObjectId,
    pub old_container_id: ObjectId,
    pub old_position: usize,
    pub new_container_id: ObjectId,
    pub new_position: usize,
}

/// Commands applied as one step: forward on execute, reverse on undo
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandGroup {
    pub name: String,
    commands: Vec<Command>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn add(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The command to execute for this group: nothing when it is empty, the
    /// only child when it has one (so single edits still coalesce)
    pub fn into_command(mut self) -> Option<Command> {
        match self.commands.len() {
            0 => None,
            1 => self.commands.pop(),
            _ => Some(Command::Group(self)),
        }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        ctx.begin_batch();
        let mut result = Ok(());
        for (index, command) in self.commands.iter().enumerate() {
            if let Err(err) = command.execute(ctx) {
                log::warn!("Command group '{}' failed at step {}: {}", self.name, index, err);
                for done in self.commands[..index].iter().rev() {
                    if let Err(undo_err) = done.undo(ctx) {
                        log::warn!("Rollback of '{}' failed: {}", done.name(), undo_err);
                    }
                }
                result = Err(err);
                break;
            }
        }
        ctx.end_batch();
        result
    }

    fn undo(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        ctx.begin_batch();
        let mut result = Ok(());
        for command in self.commands.iter().rev() {
            if let Err(err) = command.undo(ctx) {
                result = Err(err);
                break;
            }
        }
        ctx.end_batch();
        result
    }
}

/// Reversible change of the document
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetValue(SetValue),
    AddDeleteElement(AddDeleteElement),
    MoveItem(MoveItem),
    Group(CommandGroup),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::SetValue(_) => "set value",
            Command::AddDeleteElement(cmd) if cmd.add => "add element",
            Command::AddDeleteElement(_) => "delete element",
            Command::MoveItem(_) => "move item",
            Command::Group(group) => &group.name,
        }
    }

    /// A group without children; such commands are never executed
    pub fn is_empty(&self) -> bool {
        matches!(self, Command::Group(group) if group.is_empty())
    }

    /// Execute the command with the given context
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::SetValue(cmd) => ctx.set_value(cmd.object_id, cmd.field, &cmd.new_value, cmd.kind),
            Command::AddDeleteElement(cmd) if cmd.add => cmd.insert(ctx),
            Command::AddDeleteElement(cmd) => cmd.remove(ctx),
            Command::MoveItem(cmd) => ctx.move_item(cmd.item_id, cmd.new_container_id, cmd.new_position),
            Command::Group(group) => group.execute(ctx),
        }
    }

    /// Revert the effect of [`Command::execute`]
    pub fn undo(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        match self {
            Command::SetValue(cmd) => ctx.set_value(cmd.object_id, cmd.field, &cmd.old_value, cmd.kind),
            Command::AddDeleteElement(cmd) if cmd.add => cmd.remove(ctx),
            Command::AddDeleteElement(cmd) => cmd.insert(ctx),
            Command::MoveItem(cmd) => ctx.move_item(cmd.item_id, cmd.old_container_id, cmd.old_position),
            Command::Group(group) => group.undo(ctx),
        }
    }
}

impl From<SetValue> for Command {
    fn from(cmd: SetValue) -> Self {
        Command::SetValue(cmd)
    }
}

impl From<CommandGroup> for Command {
    fn from(group: CommandGroup) -> Self {
        Command::Group(group)
    }
}
