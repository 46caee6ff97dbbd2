use egui::{Key, Modifiers, Vec2, vec2};

use crate::command::{Command, CommandError, CommandGroup};
use crate::element::ElementType;
use crate::geometry::DragKind;
use crate::state::EditorContext;

impl EditorContext {
    /// Handle a key press. Returns whether the key was consumed.
    ///
    /// | Key | Action |
    /// |---|---|
    /// | Arrows | nudge the selection (shift: large step) |
    /// | Delete, Backspace | delete the selection |
    /// | Ctrl+Z | undo |
    /// | Ctrl+Shift+Z, Ctrl+Y | redo |
    /// | Escape | cancel the running gesture |
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Result<bool, CommandError> {
        if key == Key::Escape {
            let active = !self.state.is_idle();
            self.cancel()?;
            return Ok(active);
        }
        if !self.state.is_idle() {
            return Ok(false);
        }
        let step = if modifiers.shift {
            self.settings.nudge_step_large
        } else {
            self.settings.nudge_step
        };
        match key {
            Key::Z if modifiers.command && modifiers.shift => self.redo(),
            Key::Z if modifiers.command => self.undo(),
            Key::Y if modifiers.command => self.redo(),
            Key::Delete | Key::Backspace => self.delete_selection(),
            Key::ArrowLeft => self.nudge(vec2(-step, 0.0)),
            Key::ArrowRight => self.nudge(vec2(step, 0.0)),
            Key::ArrowUp => self.nudge(vec2(0.0, -step)),
            Key::ArrowDown => self.nudge(vec2(0.0, step)),
            _ => Ok(false),
        }
    }

    /// Move the selection by `delta` as one undo step, clamped into each
    /// element's container. Page breaks only move vertically.
    pub fn nudge(&mut self, delta: Vec2) -> Result<bool, CommandError> {
        let mut group = CommandGroup::new("nudge");
        for id in self.dragged_elements(DragKind::Move) {
            let element = self.document.element(id)?;
            let Some(container_id) = element.container_id else {
                continue;
            };
            let delta = if element.element_type() == ElementType::PageBreak {
                vec2(0.0, delta.y)
            } else {
                delta
            };
            let size = self.document.container_content_size(container_id)?;
            self.document
                .update_position_and_size(id, element.rect().translate(delta), size, &mut group)?;
        }
        if group.is_empty() {
            return Ok(false);
        }
        self.execute(Command::Group(group))?;
        Ok(true)
    }
}
