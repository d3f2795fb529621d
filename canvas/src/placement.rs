//! Placement: turning the armed toolbar kind plus a click point into a new
//! object, or into a deletion when delete mode is armed.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use std::fmt;
use std::str::FromStr;

use crate::camera::Point;
use crate::doc::{BuiltinKind, CUSTOM_IMAGE, ObjectId, ObjectRegistry, ObjectSource, PlacedObject};
use crate::drag::DragController;
use crate::error::EditError;
use crate::palette::ImagePalette;
use crate::selection::SelectionController;

/// Toolbar id that arms delete mode.
pub const DELETE: &str = "delete";

/// What a primary click does when a tool is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementKind {
    Builtin(BuiltinKind),
    /// Place the chosen uploaded image.
    CustomImage,
    /// Remove the topmost object under the pointer.
    Delete,
}

impl PlacementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Builtin(kind) => kind.as_str(),
            Self::CustomImage => CUSTOM_IMAGE,
            Self::Delete => DELETE,
        }
    }
}

impl FromStr for PlacementKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DELETE => Ok(Self::Delete),
            CUSTOM_IMAGE => Ok(Self::CustomImage),
            other => other.parse().map(Self::Builtin),
        }
    }
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a placement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Created(ObjectId),
    /// An object was removed. `image` is the resource key it displayed, if any.
    Deleted { id: ObjectId, image: Option<String> },
    /// Nothing to do: delete mode over empty space.
    Ignored,
}

/// Validates placement requests and creates objects through the registry.
#[derive(Debug, Clone, Copy)]
pub struct PlacementEngine {
    max_image_size: f64,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new(crate::consts::MAX_IMAGE_SIZE)
    }
}

impl PlacementEngine {
    /// Create an engine that scales images down to fit `max_image_size`.
    #[must_use]
    pub fn new(max_image_size: f64) -> Self {
        Self { max_image_size }
    }

    /// Carry out `kind` at `world`.
    ///
    /// # Errors
    ///
    /// For `CustomImage`: `NoImageSelected` when no upload is chosen,
    /// `ResourceNotReady` when the chosen upload is still decoding. The
    /// registry is unchanged on error.
    pub fn place(
        &self,
        kind: PlacementKind,
        world: Point,
        registry: &mut ObjectRegistry,
        selection: &mut SelectionController,
        drag: &mut DragController,
        palette: &ImagePalette,
    ) -> Result<Placement, EditError> {
        let source = match kind {
            PlacementKind::Delete => {
                let Some(id) = registry.find_topmost_at(world).map(|obj| obj.id) else {
                    return Ok(Placement::Ignored);
                };
                let image = delete_object(registry, selection, drag, &id)
                    .and_then(|removed| removed.image().map(|img| img.key.clone()));
                return Ok(Placement::Deleted { id, image });
            }
            PlacementKind::CustomImage => {
                let upload = palette.chosen().ok_or(EditError::NoImageSelected)?;
                ObjectSource::Image { upload, max_size: self.max_image_size }
            }
            PlacementKind::Builtin(kind) => ObjectSource::Builtin(kind),
        };

        let obj = registry.create(source, world)?;
        tracing::info!(id = %obj.id, kind = %obj.kind(), depth = obj.depth, "object placed");
        Ok(Placement::Created(obj.id))
    }
}

/// Remove `id` from the registry and drop any selection or drag reference
/// to it. Returns the removed object, or `None` if it was not present.
pub fn delete_object(
    registry: &mut ObjectRegistry,
    selection: &mut SelectionController,
    drag: &mut DragController,
    id: &ObjectId,
) -> Option<PlacedObject> {
    let removed = registry.remove(id)?;
    selection.forget(id);
    drag.forget(id);
    tracing::info!(%id, kind = %removed.kind(), "object deleted");
    Some(removed)
}
