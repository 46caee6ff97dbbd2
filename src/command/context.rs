use super::CommandResult;
use crate::document::Document;
use crate::element::{ElementSnapshot, Field, FieldValue, ValueKind};
use crate::event::{EditorEvent, EventBus, SelectionEvent};
use crate::registry::ObjectId;
use crate::selection::SelectionSet;

/// Everything a command may touch while it runs. Events raised inside a
/// command group are held back and delivered once the outermost group is done.
pub struct CommandContext<'a> {
    pub document: &'a mut Document,
    pub selection: &'a mut SelectionSet,
    event_bus: &'a EventBus,
    pending: Vec<EditorEvent>,
    batch_depth: usize,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut Document, selection: &'a mut SelectionSet, event_bus: &'a EventBus) -> Self {
        Self {
            document,
            selection,
            event_bus,
            pending: Vec::new(),
            batch_depth: 0,
        }
    }

    pub fn notify(&mut self, event: EditorEvent) {
        if self.batch_depth > 0 {
            self.pending.push(event);
        } else {
            self.event_bus.emit(event);
        }
    }

    pub(crate) fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    pub(crate) fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            for event in std::mem::take(&mut self.pending) {
                self.event_bus.emit(event);
            }
        }
    }

    fn notify_display(&mut self, id: ObjectId) {
        for display_id in self.document.display_group(id) {
            if let Ok(element) = self.document.element(display_id) {
                let rect = element.rect();
                self.notify(EditorEvent::DisplayUpdated { id: display_id, rect });
            }
        }
    }

    pub fn set_value(&mut self, id: ObjectId, field: Field, value: &FieldValue, kind: ValueKind) -> CommandResult {
        if !self.document.set_value(id, field, value)? {
            return Ok(());
        }
        log::debug!("Set {} of {} ({:?})", field, id, kind);
        self.notify(EditorEvent::FieldChanged { id, field, kind });
        if field.is_geometry() || matches!(field, Field::ContainerId | Field::Header | Field::Footer) {
            self.notify_display(id);
        }
        Ok(())
    }

    pub fn add_element(&mut self, snapshot: &ElementSnapshot, position: Option<usize>) -> CommandResult {
        let created = self.document.add_snapshot(snapshot, position)?;
        log::debug!("Added element {} ({} objects)", snapshot.id(), created.len());
        for id in created {
            self.notify(EditorEvent::ElementAdded { id });
            self.notify_display(id);
        }
        Ok(())
    }

    /// Remove an element subtree. Removed elements are deselected first.
    pub fn remove_element(&mut self, id: ObjectId) -> CommandResult {
        let ids = self.document.subtree_ids(id)?;
        for removed in &ids {
            self.deselect(*removed);
        }
        self.document.remove_element(id)?;
        log::debug!("Removed element {} ({} objects)", id, ids.len());
        for removed in ids {
            self.notify(EditorEvent::ElementRemoved { id: removed });
        }
        Ok(())
    }

    pub fn move_item(&mut self, id: ObjectId, container_id: ObjectId, position: usize) -> CommandResult {
        self.document.move_item(id, container_id, position)?;
        self.notify_display(id);
        Ok(())
    }

    pub fn deselect(&mut self, id: ObjectId) {
        if self.selection.remove(id) {
            if let Ok(element) = self.document.element_mut(id) {
                element.deselect();
            }
            self.notify(EditorEvent::SelectionChanged(SelectionEvent::Deselected(id)));
        }
    }
}
