// Common constants for all element types
pub const DEFAULT_MIN_WIDTH: f32 = 20.0;
pub const DEFAULT_MIN_HEIGHT: f32 = 20.0;

/// Side length of the square hit area around a resize handle
pub const HANDLE_SIZE: f32 = 10.0;

pub(crate) const DEFAULT_BAND_HEIGHT: f32 = 20.0;
pub(crate) const PAGE_BREAK_HEIGHT: f32 = 1.0;
