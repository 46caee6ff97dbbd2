use egui::Rect;

use crate::element::{Field, ValueKind};
use crate::registry::ObjectId;

/// Notifications for the renderer and property panels
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    StateChanged {
        old: &'static str,
        new: &'static str,
    },
    /// Geometry to draw for an element, relative to its container. Sent for
    /// committed changes as well as for transient drag previews.
    DisplayUpdated {
        id: ObjectId,
        rect: Rect,
    },
    FieldChanged {
        id: ObjectId,
        field: Field,
        kind: ValueKind,
    },
    ElementAdded {
        id: ObjectId,
    },
    ElementRemoved {
        id: ObjectId,
    },
    SelectionChanged(SelectionEvent),
    /// Drop target highlight while dragging
    ContainerHover {
        container_id: ObjectId,
        hovered: bool,
    },
    /// Marquee rectangle in canvas coordinates; `None` once it is gone
    SelectionAreaChanged {
        rect: Option<Rect>,
    },
    ErrorsChanged {
        id: ObjectId,
    },
    DocumentChanged(DocumentEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Selected(ObjectId),
    Deselected(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Modified,
    Saved,
    Loaded,
}
