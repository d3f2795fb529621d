//! Shared numeric constants for the canvas crate.

// ── Grid ────────────────────────────────────────────────────────

/// Default grid cell size in world units.
pub const GRID_SIZE: f64 = 64.0;

/// Grid line color (RGB).
pub const GRID_LINE_COLOR: u32 = 0x00CC_CCCC;

/// Grid line opacity.
pub const GRID_LINE_ALPHA: f64 = 0.3;

// ── Images ──────────────────────────────────────────────────────

/// Largest width or height a custom image is allowed to occupy on the plan.
pub const MAX_IMAGE_SIZE: f64 = 128.0;

// ── Selection ───────────────────────────────────────────────────

/// Highlight color used for selected objects and image outlines.
pub const SELECTION_COLOR: u32 = 0x0000_FF00;

/// Stroke width of a selected built-in object.
pub const SELECTED_STROKE_WIDTH: f64 = 3.0;

/// Line width of the outline drawn around a selected image.
pub const OUTLINE_WIDTH: f64 = 3.0;

/// Gap between an image's bounds and its selection outline.
pub const OUTLINE_MARGIN: f64 = 2.0;

/// Resting stroke width for walls.
pub const WALL_STROKE_WIDTH: f64 = 1.0;

/// Resting stroke width for rooms and furniture.
pub const FURNITURE_STROKE_WIDTH: f64 = 2.0;

// ── View ────────────────────────────────────────────────────────

/// Smallest allowed camera zoom.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest allowed camera zoom.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;

/// Tooltip offset from the pointer, in screen pixels.
pub const TOOLTIP_OFFSET_PX: f64 = 15.0;

/// Neutral image tint (no tint).
pub const NEUTRAL_TINT: u32 = 0x00FF_FFFF;
