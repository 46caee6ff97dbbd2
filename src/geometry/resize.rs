use egui::{Rect, Vec2, vec2};

use super::DragKind;

/// Constraints applied while turning a pointer delta into a geometry change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragLimits {
    /// Content size of the element's container. `None` for elements that
    /// may leave their container (watermarks).
    pub bounds: Option<Vec2>,
    pub min_size: Vec2,
    /// Grid spacing when snapping is active
    pub grid: Option<f32>,
}

impl DragLimits {
    pub fn new(bounds: Option<Vec2>, min_size: Vec2) -> Self {
        Self {
            bounds,
            min_size,
            grid: None,
        }
    }

    pub fn with_grid(mut self, grid: Option<f32>) -> Self {
        self.grid = grid.filter(|g| *g > 0.0);
        self
    }
}

/// Round `value` to the nearest multiple of `grid`
pub fn snap(value: f32, grid: Option<f32>) -> f32 {
    match grid {
        Some(grid) if grid > 0.0 => (value / grid).round() * grid,
        _ => value,
    }
}

/// Change of the moved edge(s) for a drag of `kind` by `delta` on `rect`.
///
/// Moves snap the new position to the grid and are not clamped here; the
/// final position is clamped when the drag is committed. Resizes keep every
/// dimension at least `min_size` (or the current size when the element is
/// already smaller), keep the top/left edge at or right of the container
/// origin and keep the bottom/right edge inside the container bounds.
pub fn drag_diff(rect: Rect, delta: Vec2, kind: DragKind, limits: &DragLimits) -> Vec2 {
    if kind == DragKind::Move {
        return vec2(
            snap(rect.min.x + delta.x, limits.grid) - rect.min.x,
            snap(rect.min.y + delta.y, limits.grid) - rect.min.y,
        );
    }
    edge_diff(rect, delta, kind, limits, limits.grid)
}

/// Re-apply the resize constraints of `rect` to a diff computed for another
/// element. Used for every selected element besides the one being dragged.
pub fn constrain_drag_diff(rect: Rect, diff: Vec2, kind: DragKind, limits: &DragLimits) -> Vec2 {
    if kind == DragKind::Move {
        return diff;
    }
    edge_diff(rect, diff, kind, limits, None)
}

fn edge_diff(rect: Rect, delta: Vec2, kind: DragKind, limits: &DragLimits, grid: Option<f32>) -> Vec2 {
    let min_width = limits.min_size.x.min(rect.width());
    let min_height = limits.min_size.y.min(rect.height());
    let mut diff = Vec2::ZERO;

    if kind.moves_top() {
        let top = rect.top();
        let new_top = snap(top + delta.y, grid)
            .min(rect.bottom() - min_height)
            .max(top.min(0.0));
        diff.y = new_top - top;
    } else if kind.moves_bottom() {
        let bottom = rect.bottom();
        let mut new_bottom = snap(bottom + delta.y, grid);
        if let Some(bounds) = limits.bounds {
            new_bottom = new_bottom.min(bounds.y.max(bottom));
        }
        new_bottom = new_bottom.max(rect.top() + min_height);
        diff.y = new_bottom - bottom;
    }

    if kind.moves_left() {
        let left = rect.left();
        let new_left = snap(left + delta.x, grid)
            .min(rect.right() - min_width)
            .max(left.min(0.0));
        diff.x = new_left - left;
    } else if kind.moves_right() {
        let right = rect.right();
        let mut new_right = snap(right + delta.x, grid);
        if let Some(bounds) = limits.bounds {
            new_right = new_right.min(bounds.x.max(right));
        }
        new_right = new_right.max(rect.left() + min_width);
        diff.x = new_right - right;
    }

    diff
}

/// Apply a diff produced by [`drag_diff`] to `rect`
pub fn apply_drag_diff(rect: Rect, diff: Vec2, kind: DragKind) -> Rect {
    if kind == DragKind::Move {
        return rect.translate(diff);
    }
    let mut result = rect;
    if kind.moves_top() {
        result.min.y += diff.y;
    }
    if kind.moves_bottom() {
        result.max.y += diff.y;
    }
    if kind.moves_left() {
        result.min.x += diff.x;
    }
    if kind.moves_right() {
        result.max.x += diff.x;
    }
    result
}

/// Fit `rect` into a container of size `bounds`: the position is corrected
/// first, then the size is shrunk if the element is larger than the container.
/// Negative sizes are floored at zero.
pub fn clamp_rect(rect: Rect, bounds: Vec2) -> Rect {
    let (x, width) = clamp_axis(rect.min.x, rect.width(), bounds.x);
    let (y, height) = clamp_axis(rect.min.y, rect.height(), bounds.y);
    Rect::from_min_size(egui::pos2(x, y), vec2(width, height))
}

fn clamp_axis(mut pos: f32, mut size: f32, bound: f32) -> (f32, f32) {
    size = size.max(0.0);
    if pos + size > bound {
        pos = bound - size;
    }
    if pos < 0.0 {
        pos = 0.0;
    }
    if pos + size > bound {
        size = (bound - pos).max(0.0);
    }
    (pos, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn limits() -> DragLimits {
        DragLimits::new(Some(vec2(500.0, 400.0)), vec2(20.0, 20.0))
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(pos2(x, y), vec2(w, h))
    }

    #[test]
    fn east_handle_grows_width() {
        let r = rect(50.0, 10.0, 50.0, 20.0);
        let diff = drag_diff(r, vec2(350.0, 0.0), DragKind::E, &limits());
        let result = apply_drag_diff(r, diff, DragKind::E);
        assert_eq!(result.width(), 400.0);
        assert_eq!(result.min, r.min);
    }

    #[test]
    fn east_handle_stops_at_container_edge() {
        let r = rect(400.0, 10.0, 50.0, 20.0);
        let diff = drag_diff(r, vec2(300.0, 0.0), DragKind::E, &limits());
        assert_eq!(apply_drag_diff(r, diff, DragKind::E).right(), 500.0);
    }

    #[test]
    fn resize_keeps_min_size() {
        let r = rect(100.0, 100.0, 80.0, 60.0);
        let diff = drag_diff(r, vec2(-200.0, 0.0), DragKind::E, &limits());
        assert_eq!(apply_drag_diff(r, diff, DragKind::E).width(), 20.0);

        let diff = drag_diff(r, vec2(0.0, 200.0), DragKind::N, &limits());
        assert_eq!(apply_drag_diff(r, diff, DragKind::N).height(), 20.0);
    }

    #[test]
    fn smaller_elements_are_not_grown_to_min_size() {
        let r = rect(100.0, 100.0, 10.0, 10.0);
        let diff = drag_diff(r, vec2(0.0, -50.0), DragKind::S, &limits());
        assert_eq!(apply_drag_diff(r, diff, DragKind::S).height(), 10.0);
    }

    #[test]
    fn north_west_handle_stops_at_origin() {
        let r = rect(30.0, 40.0, 50.0, 50.0);
        let diff = drag_diff(r, vec2(-100.0, -100.0), DragKind::NW, &limits());
        let result = apply_drag_diff(r, diff, DragKind::NW);
        assert_eq!(result.min, pos2(0.0, 0.0));
        assert_eq!(result.max, r.max);
    }

    #[test]
    fn move_snaps_to_grid() {
        let r = rect(12.0, 7.0, 50.0, 20.0);
        let grid = limits().with_grid(Some(10.0));
        let diff = drag_diff(r, vec2(14.0, 1.0), DragKind::Move, &grid);
        let result = apply_drag_diff(r, diff, DragKind::Move);
        assert_eq!(result.min, pos2(30.0, 10.0));
    }

    #[test]
    fn move_is_not_clamped() {
        let r = rect(10.0, 10.0, 50.0, 20.0);
        let diff = drag_diff(r, vec2(-100.0, 0.0), DragKind::Move, &limits());
        assert_eq!(diff, vec2(-100.0, 0.0));
    }

    #[test]
    fn constrained_diff_respects_other_element() {
        let wide = rect(0.0, 0.0, 100.0, 20.0);
        let narrow = rect(0.0, 50.0, 30.0, 20.0);
        let diff = drag_diff(wide, vec2(-60.0, 0.0), DragKind::E, &limits());
        assert_eq!(diff.x, -60.0);
        let constrained = constrain_drag_diff(narrow, diff, DragKind::E, &limits());
        assert_eq!(apply_drag_diff(narrow, constrained, DragKind::E).width(), 20.0);
    }

    #[test]
    fn clamp_moves_before_shrinking() {
        let bounds = vec2(200.0, 100.0);
        assert_eq!(clamp_rect(rect(180.0, 0.0, 50.0, 20.0), bounds), rect(150.0, 0.0, 50.0, 20.0));
        assert_eq!(clamp_rect(rect(-10.0, -5.0, 50.0, 20.0), bounds), rect(0.0, 0.0, 50.0, 20.0));
        assert_eq!(clamp_rect(rect(20.0, 0.0, 300.0, 20.0), bounds), rect(0.0, 0.0, 200.0, 20.0));
    }

    #[test]
    fn clamp_floors_negative_size() {
        let clamped = clamp_rect(rect(10.0, 10.0, -5.0, 20.0), vec2(200.0, 100.0));
        assert_eq!(clamped.width(), 0.0);
    }
}
