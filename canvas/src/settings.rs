use serde::{Deserialize, Serialize};

use crate::consts::{GRID_SIZE, MAX_IMAGE_SIZE, MAX_ZOOM, MIN_ZOOM, TOOLTIP_OFFSET_PX, ZOOM_STEP};

/// Tunables for the scene core. Missing fields fall back to the defaults in
/// [`crate::consts`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Grid cell size in world units.
    pub grid_size: f64,
    /// Bounding box (square) that custom images are scaled down to fit.
    pub max_image_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Tooltip offset from the pointer, in screen pixels.
    pub tooltip_offset_px: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            max_image_size: MAX_IMAGE_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            tooltip_offset_px: TOOLTIP_OFFSET_PX,
        }
    }
}
