//! Pointer interaction state machine.
//!
//! ```text
//!            pointer down on element/handle
//!   ┌──────┐ ─────────────────────────────► ┌──────────┐
//!   │      │ ◄───────────────────────────── │ Dragging │
//!   │ Idle │   pointer up / cancel          └──────────┘
//!   │      │ ─────────────────────────────► ┌───────────┐
//!   └──────┘ ◄───────────────────────────── │ Selecting │
//!            pointer down on empty canvas   └───────────┘
//! ```
//!
//! A drag and a marquee can never be active at the same time.

use crate::interaction::{DragSession, SelectionArea};

/// The possible states of the editor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    /// No active gesture
    #[default]
    Idle,
    /// Moving or resizing the selection
    Dragging(DragSession),
    /// Drawing a marquee
    Selecting(SelectionArea),
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        matches!(
            (self, new_state),
            (EditorState::Idle, _)
                | (EditorState::Dragging(_), EditorState::Idle)
                | (EditorState::Selecting(_), EditorState::Idle)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Dragging(_) => "dragging",
            EditorState::Selecting(_) => "selecting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, EditorState::Dragging(_))
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, EditorState::Selecting(_))
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match self {
            EditorState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn selection_area(&self) -> Option<&SelectionArea> {
        match self {
            EditorState::Selecting(area) => Some(area),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn gestures_are_mutually_exclusive() {
        let selecting = EditorState::Selecting(SelectionArea::new(pos2(0.0, 0.0)));
        assert!(EditorState::Idle.can_transition_to(&selecting));
        assert!(selecting.can_transition_to(&EditorState::Idle));
        assert!(!selecting.can_transition_to(&selecting));
    }
}
