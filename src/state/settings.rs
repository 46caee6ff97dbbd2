use egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Editor preferences that are not part of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub grid_size: f32,
    pub grid_visible: bool,
    pub min_element_width: f32,
    pub min_element_height: f32,
    /// Smallest marquee (both dimensions) that selects anything
    pub marquee_threshold: f32,
    pub nudge_step: f32,
    pub nudge_step_large: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            grid_visible: true,
            min_element_width: crate::element::DEFAULT_MIN_WIDTH,
            min_element_height: crate::element::DEFAULT_MIN_HEIGHT,
            marquee_threshold: 10.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
        }
    }
}

impl EditorSettings {
    pub fn min_size(&self) -> Vec2 {
        vec2(self.min_element_width, self.min_element_height)
    }

    /// Grid to snap to, or `None` when snapping is off for this gesture
    pub fn snap_grid(&self, snap_requested: bool) -> Option<f32> {
        (snap_requested && self.grid_visible && self.grid_size > 0.0).then_some(self.grid_size)
    }
}
