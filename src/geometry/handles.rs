use egui::{CursorIcon, Pos2, Rect};

/// What a drag does to the dragged element: move it, or resize it by one of
/// the eight handles (named by compass direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Move,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl DragKind {
    /// Move plus every resize handle
    pub const ALL: &'static [DragKind] = &[
        DragKind::Move,
        DragKind::N,
        DragKind::NE,
        DragKind::E,
        DragKind::SE,
        DragKind::S,
        DragKind::SW,
        DragKind::W,
        DragKind::NW,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DragKind::Move => "move",
            DragKind::N => "n",
            DragKind::NE => "ne",
            DragKind::E => "e",
            DragKind::SE => "se",
            DragKind::S => "s",
            DragKind::SW => "sw",
            DragKind::W => "w",
            DragKind::NW => "nw",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            DragKind::Move => CursorIcon::Move,
            DragKind::N => CursorIcon::ResizeNorth,
            DragKind::NE => CursorIcon::ResizeNorthEast,
            DragKind::E => CursorIcon::ResizeEast,
            DragKind::SE => CursorIcon::ResizeSouthEast,
            DragKind::S => CursorIcon::ResizeSouth,
            DragKind::SW => CursorIcon::ResizeSouthWest,
            DragKind::W => CursorIcon::ResizeWest,
            DragKind::NW => CursorIcon::ResizeNorthWest,
        }
    }

    pub fn is_resize(&self) -> bool {
        *self != DragKind::Move
    }

    pub fn moves_top(&self) -> bool {
        matches!(self, DragKind::N | DragKind::NE | DragKind::NW)
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(self, DragKind::S | DragKind::SE | DragKind::SW)
    }

    pub fn moves_left(&self) -> bool {
        matches!(self, DragKind::W | DragKind::NW | DragKind::SW)
    }

    pub fn moves_right(&self) -> bool {
        matches!(self, DragKind::E | DragKind::NE | DragKind::SE)
    }

    /// Center of the handle on `rect`. `None` for [`DragKind::Move`].
    pub fn handle_position(&self, rect: Rect) -> Option<Pos2> {
        let center = rect.center();
        let pos = match self {
            DragKind::Move => return None,
            DragKind::N => Pos2::new(center.x, rect.top()),
            DragKind::NE => rect.right_top(),
            DragKind::E => Pos2::new(rect.right(), center.y),
            DragKind::SE => rect.right_bottom(),
            DragKind::S => Pos2::new(center.x, rect.bottom()),
            DragKind::SW => rect.left_bottom(),
            DragKind::W => Pos2::new(rect.left(), center.y),
            DragKind::NW => rect.left_top(),
        };
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn corner_handles_move_two_edges() {
        assert!(DragKind::NE.moves_top() && DragKind::NE.moves_right());
        assert!(!DragKind::NE.moves_left() && !DragKind::NE.moves_bottom());
        assert!(!DragKind::Move.is_resize());
    }

    #[test]
    fn handle_positions() {
        let rect = Rect::from_min_size(pos2(10.0, 10.0), vec2(100.0, 50.0));
        assert_eq!(DragKind::E.handle_position(rect), Some(pos2(110.0, 35.0)));
        assert_eq!(DragKind::NW.handle_position(rect), Some(pos2(10.0, 10.0)));
        assert_eq!(DragKind::Move.handle_position(rect), None);
    }
}
