//! Grid model: maps continuous coordinates onto grid lines.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::Point;

/// Round `value` to the nearest multiple of `cell_size`.
///
/// A non-positive or non-finite `cell_size` disables snapping and returns
/// `value` unchanged.
#[must_use]
pub fn snap(value: f64, cell_size: f64) -> f64 {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return value;
    }
    (value / cell_size).round() * cell_size
}

/// Snap both axes of a point.
#[must_use]
pub fn snap_point(pt: Point, cell_size: f64) -> Point {
    Point::new(snap(pt.x, cell_size), snap(pt.y, cell_size))
}
