//! Pure geometry of element dragging: which edges a drag moves, how a
//! pointer delta turns into a constrained rectangle change, and hit testing
//! of the resize handles.

mod handles;
pub mod hit_testing;
mod resize;

pub use handles::DragKind;
pub use resize::{DragLimits, apply_drag_diff, clamp_rect, constrain_drag_diff, drag_diff, snap};
