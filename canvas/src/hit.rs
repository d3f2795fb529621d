#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::PlacedObject;

/// The object with the greatest depth whose bounds contain `world_pt`.
///
/// Depth values are unique, so there is never a tie.
#[must_use]
pub fn topmost_at(objects: &[PlacedObject], world_pt: Point) -> Option<&PlacedObject> {
    objects
        .iter()
        .filter(|obj| obj.contains(world_pt))
        .max_by_key(|obj| obj.depth)
}
