//! Single-object drag sessions.
//!
//! A session is begun by the drag button going down over an object and is
//! fed every subsequent pointer move. Because a release event can be lost
//! (the pointer leaves the surface, focus changes), every update re-checks
//! whether the drag button is still held and ends the session itself when
//! it is not.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::camera::Point;
use crate::doc::{ObjectId, ObjectRegistry};
use crate::error::EditError;
use crate::grid;
use crate::selection::SelectionController;

/// Cursor shown while a drag is in progress.
pub const MOVE_CURSOR: &str = "move";
/// Cursor restored when a drag ends.
pub const DEFAULT_CURSOR: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    id: ObjectId,
    /// Pointer position minus object center at the start of the drag.
    offset: Point,
}

/// Result of feeding a pointer move to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// No drag in progress.
    Idle,
    /// The dragged object moved to this center.
    Moved { id: ObjectId, position: Point },
    /// The drag button was no longer held; the session ended.
    Ended { id: ObjectId },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The object being dragged, if any.
    #[must_use]
    pub fn current(&self) -> Option<ObjectId> {
        self.session.map(|s| s.id)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start dragging `id` from `pointer_world`.
    ///
    /// Raises the object to a fresh top depth, then selects it so any
    /// outline is built above the new depth. The object does not move until
    /// the first [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` if `id` is not registered.
    pub fn begin(
        &mut self,
        registry: &mut ObjectRegistry,
        selection: &mut SelectionController,
        id: ObjectId,
        pointer_world: Point,
    ) -> Result<(), EditError> {
        let position = registry.get(&id).ok_or(EditError::ObjectNotFound(id))?.position;
        let depth = registry.raise(&id);
        selection.select(registry, id);
        self.session = Some(DragSession { id, offset: pointer_world.sub(position) });
        tracing::debug!(%id, ?depth, "drag started");
        Ok(())
    }

    /// Move the dragged object so it keeps its grab offset under the pointer.
    ///
    /// Ends the session instead when `held` is false. With `snap`, the new
    /// center is snapped to the registry grid.
    pub fn update(&mut self, registry: &mut ObjectRegistry, pointer_world: Point, held: bool, snap: bool) -> DragUpdate {
        let Some(session) = self.session else {
            return DragUpdate::Idle;
        };
        if !held {
            self.end();
            return DragUpdate::Ended { id: session.id };
        }

        let mut position = pointer_world.sub(session.offset);
        if snap {
            position = grid::snap_point(position, registry.grid_size());
        }
        let Some(obj) = registry.get_mut(&session.id) else {
            // Object vanished mid-drag.
            self.end();
            return DragUpdate::Ended { id: session.id };
        };
        obj.position = position;
        obj.refresh_decoration();
        DragUpdate::Moved { id: session.id, position }
    }

    /// End the session. Returns the object that was being dragged.
    pub fn end(&mut self) -> Option<ObjectId> {
        let session = self.session.take()?;
        tracing::debug!(id = %session.id, "drag ended");
        Some(session.id)
    }

    /// End the session if it is dragging `id`.
    pub fn forget(&mut self, id: &ObjectId) {
        if self.current().as_ref() == Some(id) {
            self.session = None;
        }
    }
}
