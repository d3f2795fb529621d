//! Document model: placed objects, their templates, and the registry that owns them.
//!
//! `PlacedObject` is a tagged variant: built-in furniture renders as a filled,
//! stroked rectangle derived from a fixed template, while custom images carry
//! a shared reference to an uploaded resource plus an optional tint. Both
//! variants expose the same selection-style interface so callers never probe
//! for which representation they hold.
//!
//! `ObjectRegistry` is the single source of truth for what is on the plan. It
//! hands out identities, render handles, and depth values, and every other
//! component reads or writes objects through it.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::annotation::{self, MetadataRecord};
use crate::camera::Point;
use crate::consts::{
    FURNITURE_STROKE_WIDTH, OUTLINE_MARGIN, OUTLINE_WIDTH, SELECTED_STROKE_WIDTH, SELECTION_COLOR, WALL_STROKE_WIDTH,
};
use crate::error::EditError;
use crate::grid;
use crate::hit;
use crate::palette::{LoadedImage, UploadedImage};

/// Stable identity of a placed object. Survives image swaps.
pub type ObjectId = Uuid;

/// Render-backend handle for an object's current visual.
///
/// Unlike [`ObjectId`], a handle is replaced whenever the object's visual is
/// rebuilt (for example by an image swap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Width and height in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale down (never up) to fit inside a `max` × `max` box, preserving
    /// the aspect ratio.
    #[must_use]
    pub fn fit_within(self, max: f64) -> Size {
        if self.width <= max && self.height <= max {
            return self;
        }
        let scale = (max / self.width).min(max / self.height);
        Size::new(self.width * scale, self.height * scale)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    /// Edge-inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

/// Visual template for a built-in kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub width: f64,
    pub height: f64,
    /// Base fill color (RGB).
    pub fill: u32,
    /// Base stroke color (RGB).
    pub stroke: u32,
}

/// The closed set of built-in room and furniture kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinKind {
    Room,
    WallH,
    WallV,
    Table,
    Chair,
    Sofa,
    Bed,
    Desk,
    Plant,
    Lamp,
    Picture,
}

impl BuiltinKind {
    pub const ALL: [BuiltinKind; 11] = [
        Self::Room,
        Self::WallH,
        Self::WallV,
        Self::Table,
        Self::Chair,
        Self::Sofa,
        Self::Bed,
        Self::Desk,
        Self::Plant,
        Self::Lamp,
        Self::Picture,
    ];

    /// Toolbar identifier for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::WallH => "wall-h",
            Self::WallV => "wall-v",
            Self::Table => "table",
            Self::Chair => "chair",
            Self::Sofa => "sofa",
            Self::Bed => "bed",
            Self::Desk => "desk",
            Self::Plant => "plant",
            Self::Lamp => "lamp",
            Self::Picture => "picture",
        }
    }

    #[must_use]
    pub fn template(self) -> Template {
        let (width, height, fill, stroke) = match self {
            Self::Room => (256.0, 192.0, 0x00E8_E8E8, 0x0088_8888),
            Self::WallH => (128.0, 8.0, 0x008B_7355, 0x005A_4A3A),
            Self::WallV => (8.0, 128.0, 0x008B_7355, 0x005A_4A3A),
            Self::Table => (80.0, 60.0, 0x008B_4513, 0x0065_4321),
            Self::Chair => (40.0, 40.0, 0x0065_4321, 0x003D_2817),
            Self::Sofa => (120.0, 60.0, 0x008B_4513, 0x0065_4321),
            Self::Bed => (160.0, 120.0, 0x0041_69E1, 0x002E_4A8F),
            Self::Desk => (100.0, 50.0, 0x008B_4513, 0x0065_4321),
            Self::Plant => (32.0, 48.0, 0x0022_8B22, 0x0000_6400),
            Self::Lamp => (24.0, 40.0, 0x00FF_D700, 0x00DA_A520),
            Self::Picture => (60.0, 80.0, 0x00D3_D3D3, 0x0080_8080),
        };
        Template { width, height, fill, stroke }
    }

    #[must_use]
    pub fn is_wall(self) -> bool {
        matches!(self, Self::WallH | Self::WallV)
    }

    /// Stroke width when not selected. Walls use a thinner border.
    #[must_use]
    pub fn resting_stroke_width(self) -> f64 {
        if self.is_wall() { WALL_STROKE_WIDTH } else { FURNITURE_STROKE_WIDTH }
    }
}

impl FromStr for BuiltinKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall-horizontal" => Ok(Self::WallH),
            "wall-vertical" => Ok(Self::WallV),
            other => Self::ALL
                .into_iter()
                .find(|k| k.as_str() == other)
                .ok_or_else(|| EditError::UnknownKind(other.to_owned())),
        }
    }
}

/// Kind tag of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Builtin(BuiltinKind),
    CustomImage,
}

/// Toolbar / kind identifier for uploaded images.
pub const CUSTOM_IMAGE: &str = "custom-image";

impl ObjectKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Builtin(kind) => kind.as_str(),
            Self::CustomImage => CUSTOM_IMAGE,
        }
    }
}

impl Serialize for ObjectKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke style of a built-in object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    pub color: u32,
}

/// Outline drawn around a selected image. Owned by the image it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionOutline {
    pub rect: Rect,
    /// Always one above the owning object's depth.
    pub depth: i64,
    pub width: f64,
    pub color: u32,
}

impl SelectionOutline {
    fn around(bounds: Rect, depth: i64) -> Self {
        Self {
            rect: bounds.inflate(OUTLINE_MARGIN),
            depth: depth + 1,
            width: OUTLINE_WIDTH,
            color: SELECTION_COLOR,
        }
    }
}

/// Per-variant visual state.
#[derive(Debug, Clone)]
pub enum Body {
    /// Built-in template rendered as a filled rectangle.
    Shape { kind: BuiltinKind, fill: u32, stroke: Stroke },
    /// Uploaded image with an optional multiplicative tint.
    Image {
        image: Arc<LoadedImage>,
        tint: Option<u32>,
        outline: Option<SelectionOutline>,
    },
}

/// An object placed on the plan.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    /// Stable identity.
    pub id: ObjectId,
    /// Current render handle.
    pub handle: VisualHandle,
    /// Center point in world coordinates.
    pub position: Point,
    pub size: Size,
    /// Z-order; higher values draw and hit-test above lower values.
    pub depth: i64,
    /// Attached external record, if any.
    pub annotation: Option<MetadataRecord>,
    /// Hover text, recomputed whenever the annotation changes.
    pub tooltip: String,
    pub body: Body,
}

impl PlacedObject {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match &self.body {
            Body::Shape { kind, .. } => ObjectKind::Builtin(*kind),
            Body::Image { .. } => ObjectKind::CustomImage,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }

    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.bounds().contains(pt)
    }

    /// The image this object displays, for custom images.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<LoadedImage>> {
        match &self.body {
            Body::Image { image, .. } => Some(image),
            Body::Shape { .. } => None,
        }
    }

    /// The selection outline, present only on a selected image.
    #[must_use]
    pub fn outline(&self) -> Option<&SelectionOutline> {
        match &self.body {
            Body::Image { outline, .. } => outline.as_ref(),
            Body::Shape { .. } => None,
        }
    }

    /// Whether this object currently renders in its selected style.
    #[must_use]
    pub fn shows_selected(&self) -> bool {
        match &self.body {
            Body::Shape { stroke, .. } => stroke.color == SELECTION_COLOR,
            Body::Image { outline, .. } => outline.is_some(),
        }
    }

    /// Switch to the selected look: a bold highlighted border for built-ins,
    /// an owned outline decoration for images.
    pub fn apply_selected_style(&mut self) {
        let bounds = self.bounds();
        let depth = self.depth;
        match &mut self.body {
            Body::Shape { stroke, .. } => {
                *stroke = Stroke { width: SELECTED_STROKE_WIDTH, color: SELECTION_COLOR };
            }
            Body::Image { outline, .. } => {
                *outline = Some(SelectionOutline::around(bounds, depth));
            }
        }
    }

    /// Restore the resting look: template border for built-ins, no outline
    /// for images.
    pub fn apply_unselected_style(&mut self) {
        match &mut self.body {
            Body::Shape { kind, stroke, .. } => {
                *stroke = Stroke { width: kind.resting_stroke_width(), color: kind.template().stroke };
            }
            Body::Image { outline, .. } => {
                *outline = None;
            }
        }
    }

    /// Re-fit an existing outline to the object's current bounds and depth.
    /// No-op when the object has no outline.
    pub fn refresh_decoration(&mut self) {
        let bounds = self.bounds();
        let depth = self.depth;
        if let Body::Image { outline: Some(outline), .. } = &mut self.body {
            *outline = SelectionOutline::around(bounds, depth);
        }
    }
}

/// What a new object is built from.
#[derive(Debug, Clone, Copy)]
pub enum ObjectSource<'a> {
    Builtin(BuiltinKind),
    /// An uploaded image, scaled down to fit `max_size`.
    Image { upload: &'a UploadedImage, max_size: f64 },
}

/// Ordered collection of every placed object.
pub struct ObjectRegistry {
    objects: Vec<PlacedObject>,
    grid_size: f64,
    next_depth: i64,
    next_handle: u64,
}

impl ObjectRegistry {
    /// Create an empty registry snapping new objects to `grid_size`.
    #[must_use]
    pub fn new(grid_size: f64) -> Self {
        Self { objects: Vec::new(), grid_size, next_depth: 1, next_handle: 1 }
    }

    /// Take the next depth value. The counter never decreases.
    pub fn allocate_depth(&mut self) -> i64 {
        let depth = self.next_depth;
        self.next_depth += 1;
        depth
    }

    /// Take a fresh render handle.
    pub fn allocate_handle(&mut self) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Create an object centered on the grid point nearest `center`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotReady` if an image source has not finished loading.
    pub fn create(&mut self, source: ObjectSource<'_>, center: Point) -> Result<&PlacedObject, EditError> {
        let position = grid::snap_point(center, self.grid_size);
        let (size, body) = match source {
            ObjectSource::Builtin(kind) => {
                let t = kind.template();
                let body = Body::Shape {
                    kind,
                    fill: t.fill,
                    stroke: Stroke { width: kind.resting_stroke_width(), color: t.stroke },
                };
                (Size::new(t.width, t.height), body)
            }
            ObjectSource::Image { upload, max_size } => {
                let image = upload.loaded()?;
                let size = image.natural.fit_within(max_size);
                (size, Body::Image { image, tint: None, outline: None })
            }
        };

        let mut obj = PlacedObject {
            id: Uuid::new_v4(),
            handle: self.allocate_handle(),
            position,
            size,
            depth: self.allocate_depth(),
            annotation: None,
            tooltip: String::new(),
            body,
        };
        obj.tooltip = annotation::tooltip_text(&obj);

        tracing::debug!(id = %obj.id, kind = %obj.kind(), depth = obj.depth, "object created");
        self.objects.push(obj);
        Ok(&self.objects[self.objects.len() - 1])
    }

    /// The object with the highest depth whose bounds contain `pt`.
    #[must_use]
    pub fn find_topmost_at(&self, pt: Point) -> Option<&PlacedObject> {
        hit::topmost_at(&self.objects, pt)
    }

    /// Remove an object, dropping its decoration with it. Returns `None`
    /// (and changes nothing) if the object is not present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|o| &o.id == id)?;
        let mut obj = self.objects.remove(index);
        obj.apply_unselected_style();
        Some(obj)
    }

    /// Remove every object.
    pub fn remove_all(&mut self) -> Vec<PlacedObject> {
        let mut removed = std::mem::take(&mut self.objects);
        for obj in &mut removed {
            obj.apply_unselected_style();
        }
        removed
    }

    /// Put `replacement` in the slot held by the object with the same id,
    /// returning the displaced object.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` if no object with that id is registered.
    pub fn replace(&mut self, replacement: PlacedObject) -> Result<PlacedObject, EditError> {
        let id = replacement.id;
        let slot = self
            .objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(EditError::ObjectNotFound(id))?;
        Ok(std::mem::replace(slot, replacement))
    }

    /// Give an object a fresh, highest depth. Returns the new depth.
    pub fn raise(&mut self, id: &ObjectId) -> Option<i64> {
        let index = self.objects.iter().position(|o| &o.id == id)?;
        let depth = self.allocate_depth();
        let obj = &mut self.objects[index];
        obj.depth = depth;
        obj.refresh_decoration();
        Some(depth)
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| &o.id == id)
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    /// Objects sorted by depth, bottom first.
    #[must_use]
    pub fn sorted_by_depth(&self) -> Vec<&PlacedObject> {
        let mut objs: Vec<&PlacedObject> = self.objects.iter().collect();
        objs.sort_by_key(|o| o.depth);
        objs
    }

    /// Whether any placed image still uses the resource `key`.
    #[must_use]
    pub fn references_image(&self, key: &str) -> bool {
        self.objects.iter().any(|o| o.image().is_some_and(|img| img.key == key))
    }

    #[must_use]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new(crate::consts::GRID_SIZE)
    }
}
