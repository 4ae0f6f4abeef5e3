//! GUI-specific constants for layout and the preview window

/// Preview window dimensions
pub const WINDOW_WIDTH: f32 = 720.0;
pub const WINDOW_HEIGHT: f32 = 640.0;
pub const WINDOW_MIN_WIDTH: f32 = 480.0;
pub const WINDOW_MIN_HEIGHT: f32 = 400.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Width of the option combo boxes
pub const COMBO_WIDTH: f32 = 220.0;

/// Options dialog width
pub const DIALOG_WIDTH: f32 = 360.0;
