use egui::{Pos2, Rect};

use crate::error::DesignerResult;
use crate::event::EditorEvent;
use crate::geometry::hit_testing::normalize_rect;
use crate::registry::ObjectId;
use crate::state::{EditorContext, EditorState};

/// Marquee drawn on the empty canvas, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionArea {
    pub start: Pos2,
    pub current: Pos2,
}

impl SelectionArea {
    pub fn new(start: Pos2) -> Self {
        Self { start, current: start }
    }

    /// Normalized marquee rectangle
    pub fn rect(&self) -> Rect {
        normalize_rect(self.start, self.current)
    }

    /// True when the marquee is larger than `threshold` in both dimensions
    pub fn exceeds(&self, threshold: f32) -> bool {
        let rect = self.rect();
        rect.width() > threshold && rect.height() > threshold
    }
}

impl EditorContext {
    pub(crate) fn begin_selection_area(&mut self, pos: Pos2) -> DesignerResult<()> {
        let area = SelectionArea::new(pos);
        self.transition_to(EditorState::Selecting(area))?;
        self.event_bus
            .emit(EditorEvent::SelectionAreaChanged { rect: Some(area.rect()) });
        Ok(())
    }

    pub(crate) fn update_selection_area(&mut self, pos: Pos2) {
        let EditorState::Selecting(area) = &mut self.state else {
            return;
        };
        area.current = pos;
        let rect = area.rect();
        self.event_bus.emit(EditorEvent::SelectionAreaChanged { rect: Some(rect) });
    }

    /// Elements a marquee covering `rect` selects, in document order.
    /// Elements hosted by an element that is already selected (or selected
    /// earlier in the same pass) are skipped.
    pub fn elements_in_area(&self, rect: Rect) -> Vec<ObjectId> {
        let mut hits: Vec<ObjectId> = Vec::new();
        for id in self.document.elements_in_order() {
            let Ok(element) = self.document.element(id) else {
                continue;
            };
            if !element.element_type().is_area_selectable() {
                continue;
            }
            if !element.container_id.is_some_and(|c| self.document.is_container_visible(c)) {
                continue;
            }
            if !self.document.absolute_rect(id).is_ok_and(|r| r.intersects(rect)) {
                continue;
            }
            let nested = self
                .document
                .ancestor_elements(id)
                .iter()
                .any(|ancestor| self.selection.contains(*ancestor) || hits.contains(ancestor));
            if !nested {
                hits.push(id);
            }
        }
        hits
    }

    pub(crate) fn finish_selection_area(&mut self) -> DesignerResult<()> {
        let Some(area) = self.state.selection_area().copied() else {
            return Ok(());
        };
        self.transition_to(EditorState::Idle)?;
        self.event_bus.emit(EditorEvent::SelectionAreaChanged { rect: None });
        if !area.exceeds(self.settings.marquee_threshold) {
            log::debug!("Marquee {:?} below threshold", area.rect());
            return Ok(());
        }
        let hits = self.elements_in_area(area.rect());
        log::debug!("Marquee selected {} element(s)", hits.len());
        for id in hits {
            self.select(id, true)?;
        }
        Ok(())
    }

    pub(crate) fn cancel_selection_area(&mut self) -> DesignerResult<()> {
        if !self.state.is_selecting() {
            return Ok(());
        }
        self.transition_to(EditorState::Idle)?;
        self.event_bus.emit(EditorEvent::SelectionAreaChanged { rect: None });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn marquee_is_normalized() {
        let mut area = SelectionArea::new(pos2(70.0, 40.0));
        area.current = pos2(0.0, 0.0);
        assert_eq!(area.rect(), Rect::from_min_max(pos2(0.0, 0.0), pos2(70.0, 40.0)));
        assert!(area.exceeds(10.0));
    }

    #[test]
    fn thin_marquee_does_not_exceed_threshold() {
        let mut area = SelectionArea::new(pos2(0.0, 0.0));
        area.current = pos2(200.0, 9.0);
        assert!(!area.exceeds(10.0));
    }
}
