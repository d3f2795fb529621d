//! Single-object selection.
//!
//! The controller records which object is selected and drives the object's
//! selected/unselected style through [`PlacedObject`](crate::doc::PlacedObject).
//! Objects live in the registry; the controller only holds an id.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectRegistry};

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    current: Option<ObjectId>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected object, if any.
    #[must_use]
    pub fn current(&self) -> Option<ObjectId> {
        self.current
    }

    #[must_use]
    pub fn is_selected(&self, id: &ObjectId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Select `id`, reverting the previous selection's style first.
    ///
    /// Returns `false` and leaves the selection untouched when `id` is not
    /// registered. Selecting the current object again only re-applies its
    /// selected style.
    pub fn select(&mut self, registry: &mut ObjectRegistry, id: ObjectId) -> bool {
        if registry.get(&id).is_none() {
            return false;
        }
        if let Some(prev) = self.current.filter(|prev| *prev != id) {
            Self::revert(registry, &prev);
        }
        if let Some(obj) = registry.get_mut(&id) {
            obj.apply_selected_style();
        }
        self.current = Some(id);
        tracing::debug!(%id, "selected");
        true
    }

    /// Select the topmost object under `world_pt`, or clear the selection
    /// when nothing is there.
    pub fn select_at(&mut self, registry: &mut ObjectRegistry, world_pt: Point) -> Option<ObjectId> {
        match registry.find_topmost_at(world_pt).map(|obj| obj.id) {
            Some(id) => {
                self.select(registry, id);
                Some(id)
            }
            None => {
                self.clear(registry);
                None
            }
        }
    }

    /// Deselect, reverting the object's style.
    pub fn clear(&mut self, registry: &mut ObjectRegistry) {
        if let Some(prev) = self.current.take() {
            Self::revert(registry, &prev);
            tracing::debug!(id = %prev, "selection cleared");
        }
    }

    /// Drop the reference to `id` without touching any style. Used once the
    /// object has already left the registry.
    pub fn forget(&mut self, id: &ObjectId) {
        if self.is_selected(id) {
            self.current = None;
        }
    }

    fn revert(registry: &mut ObjectRegistry, id: &ObjectId) {
        if let Some(obj) = registry.get_mut(id) {
            obj.apply_unselected_style();
        }
    }
}
