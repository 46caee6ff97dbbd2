//! Pointer and keyboard input of the editing surface.
//!
//! Renderers feed raw canvas positions (page top left is the origin) and
//! modifiers; the context resolves what is under the pointer, runs the
//! drag or marquee gesture and turns the result into commands.

mod drag;
mod keyboard;
mod selection_area;

use egui::{Modifiers, Pos2};

use crate::command::CommandResult;
use crate::document::PointerTarget;
use crate::geometry::DragKind;
use crate::state::EditorContext;

pub use drag::DragSession;
pub use selection_area::SelectionArea;

impl EditorContext {
    /// Pointer pressed on the canvas.
    ///
    /// A resize handle of a selected element starts a resize. An element
    /// starts a move (shift toggles it in the selection instead of
    /// replacing the selection). The empty canvas starts a marquee and
    /// clears the selection unless shift is held.
    pub fn pointer_down(&mut self, pos: Pos2, modifiers: Modifiers) -> CommandResult {
        if !self.state.is_idle() {
            log::debug!("Ignoring pointer down while {}", self.state.name());
            return Ok(());
        }
        match self.document.hit_test(pos, self.selection.ids()) {
            PointerTarget::Handle { element_id, kind } => {
                self.begin_drag(element_id, kind, pos, modifiers)?;
            }
            PointerTarget::Element(id) => {
                if modifiers.shift && self.selection.contains(id) {
                    self.deselect(id);
                    return Ok(());
                }
                if !self.selection.contains(id) {
                    self.select(id, modifiers.shift)?;
                }
                self.begin_drag(id, DragKind::Move, pos, modifiers)?;
            }
            PointerTarget::Canvas => {
                if !modifiers.shift {
                    self.clear_selection();
                }
                self.begin_selection_area(pos)?;
            }
        }
        Ok(())
    }

    /// Pointer moved with the button held
    pub fn pointer_move(&mut self, pos: Pos2, modifiers: Modifiers) -> CommandResult {
        if self.state.is_dragging() {
            self.update_drag(pos, modifiers)?;
        } else if self.state.is_selecting() {
            self.update_selection_area(pos);
        }
        Ok(())
    }

    /// Pointer released: commit the running gesture
    pub fn pointer_up(&mut self, pos: Pos2, modifiers: Modifiers) -> CommandResult {
        if self.state.is_dragging() {
            self.update_drag(pos, modifiers)?;
            self.finish_drag()
        } else if self.state.is_selecting() {
            self.update_selection_area(pos);
            Ok(self.finish_selection_area()?)
        } else {
            Ok(())
        }
    }

    /// Abort the running gesture without touching the document
    pub fn cancel(&mut self) -> CommandResult {
        if self.state.is_dragging() {
            log::debug!("Drag cancelled");
            self.cancel_drag()?;
        } else if self.state.is_selecting() {
            log::debug!("Marquee cancelled");
            self.cancel_selection_area()?;
        }
        Ok(())
    }
}
