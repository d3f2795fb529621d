//! Image swap: point a placed image at a different uploaded resource.
//!
//! The render backend is not assumed to support replacing a visual in
//! place, so a swap builds a whole new object and puts it in the old one's
//! registry slot. The [`ObjectId`] carries over; the [`VisualHandle`] does
//! not. Position, depth, annotation, and selection state are preserved.

#[cfg(test)]
#[path = "swap_test.rs"]
mod swap_test;

use crate::annotation;
use crate::doc::{Body, ObjectId, ObjectRegistry, PlacedObject, VisualHandle};
use crate::error::EditError;
use crate::palette::UploadedImage;
use crate::selection::SelectionController;

/// Result of a successful swap.
#[derive(Debug, Clone)]
pub struct Swapped {
    /// The object that was displaced, including its old handle and image.
    pub previous: PlacedObject,
    /// Handle of the rebuilt visual.
    pub handle: VisualHandle,
}

/// Replace the image shown by `id` with `upload`, rescaled to fit `max_size`.
///
/// # Errors
///
/// `ResourceNotReady` if `upload` is still decoding, `ObjectNotFound` if
/// `id` is not registered, `NotAnImage` if `id` is a built-in object.
/// Nothing changes on error.
pub fn swap_image(
    registry: &mut ObjectRegistry,
    selection: &mut SelectionController,
    id: ObjectId,
    upload: &UploadedImage,
    max_size: f64,
) -> Result<Swapped, EditError> {
    let image = upload.loaded()?;
    let old = registry.get(&id).ok_or(EditError::ObjectNotFound(id))?;
    if old.image().is_none() {
        return Err(EditError::NotAnImage(id));
    }
    let (position, depth, record) = (old.position, old.depth, old.annotation.clone());
    let was_selected = selection.is_selected(&id);

    let mut rebuilt = PlacedObject {
        id,
        handle: registry.allocate_handle(),
        position,
        size: image.natural.fit_within(max_size),
        depth,
        annotation: None,
        tooltip: String::new(),
        body: Body::Image { image, tint: None, outline: None },
    };
    match record {
        Some(record) => annotation::attach(&mut rebuilt, record),
        None => rebuilt.tooltip = annotation::tooltip_text(&rebuilt),
    }
    let handle = rebuilt.handle;

    // The displaced object takes its outline with it.
    let mut previous = registry.replace(rebuilt)?;
    previous.apply_unselected_style();
    if was_selected {
        selection.select(registry, id);
    }

    tracing::info!(%id, from = %previous.handle.0, to = %handle.0, image = %upload.name, "image swapped");
    Ok(Swapped { previous, handle })
}
