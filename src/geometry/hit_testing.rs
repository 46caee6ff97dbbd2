use egui::{Pos2, Rect, Vec2};

use super::DragKind;

/// Side length of the square hit area around each resize handle
pub const HANDLE_HIT_SIZE: f32 = crate::element::HANDLE_SIZE;

/// Resize handle of `kinds` under `pos` for an element occupying `rect`
/// (absolute coordinates). Corners win over edges where they overlap.
pub fn handle_at(pos: Pos2, rect: Rect, kinds: &[DragKind]) -> Option<DragKind> {
    const ORDER: [DragKind; 8] = [
        DragKind::NW,
        DragKind::NE,
        DragKind::SW,
        DragKind::SE,
        DragKind::N,
        DragKind::E,
        DragKind::S,
        DragKind::W,
    ];
    ORDER.into_iter().filter(|kind| kinds.contains(kind)).find(|kind| {
        kind.handle_position(rect)
            .map(|center| Rect::from_center_size(center, Vec2::splat(HANDLE_HIT_SIZE)).contains(pos))
            .unwrap_or(false)
    })
}

/// Rectangle spanned by two arbitrary corner points
pub fn normalize_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}

/// Whether `inner` lies completely within `outer` (edges included)
pub fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.min.x >= outer.min.x
        && inner.min.y >= outer.min.y
        && inner.max.x <= outer.max.x
        && inner.max.y <= outer.max.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn finds_handle_near_corner() {
        let rect = Rect::from_min_size(pos2(100.0, 100.0), vec2(80.0, 40.0));
        assert_eq!(handle_at(pos2(181.0, 141.0), rect, DragKind::ALL), Some(DragKind::SE));
        assert_eq!(handle_at(pos2(180.0, 120.0), rect, DragKind::ALL), Some(DragKind::E));
        assert_eq!(handle_at(pos2(140.0, 120.0), rect, DragKind::ALL), None);
    }

    #[test]
    fn ignores_unsupported_handles() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(80.0, 40.0));
        let horizontal = [DragKind::Move, DragKind::E, DragKind::W];
        assert_eq!(handle_at(pos2(80.0, 40.0), rect, &horizontal), None);
        assert_eq!(handle_at(pos2(80.0, 20.0), rect, &horizontal), Some(DragKind::E));
    }

    #[test]
    fn normalizes_any_drag_direction() {
        let rect = normalize_rect(pos2(70.0, 40.0), pos2(0.0, 0.0));
        assert_eq!(rect.min, pos2(0.0, 0.0));
        assert_eq!(rect.max, pos2(70.0, 40.0));
    }
}
