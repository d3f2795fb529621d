use serde::Serialize;

use crate::CanvasSettings;
use crate::annotation::{self, MetadataRecord};
use crate::camera::{Camera, Point};
use crate::doc::{ObjectId, ObjectKind, ObjectRegistry, PlacedObject, Size, VisualHandle};
use crate::drag::{DEFAULT_CURSOR, DragController, DragUpdate, MOVE_CURSOR};
use crate::error::EditError;
use crate::input::{Button, Buttons, Key, Modifiers, ToolbarItem, UiState, WheelDelta};
use crate::palette::{ImagePalette, PaletteItem, UploadedImage};
use crate::placement::{self, Placement, PlacementEngine, PlacementKind};
use crate::render::{self, DisplayList};
use crate::selection::SelectionController;
use crate::swap;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Error code attached to a failed image decode notification.
pub const DECODE_FAILED: &str = "E_DECODE_FAILED";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    ObjectCreated { id: ObjectId, kind: ObjectKind },
    ObjectDeleted { id: ObjectId },
    ObjectMoved { id: ObjectId, x: f64, y: f64 },
    ImageSwapped { id: ObjectId, handle: VisualHandle },
    SetCursor { cursor: String },
    /// Context menu for a custom image.
    ShowImageMenu { id: ObjectId, can_swap: bool, can_annotate: bool, can_detach: bool },
    /// Record picker for a built-in object.
    ShowMetadataChoices { id: ObjectId, can_detach: bool },
    /// Blocking user notification.
    Notify { code: String, message: String },
    ToolbarChanged { tool: Option<String>, highlighted: bool },
    PaletteChanged,
    /// No palette entry or placed object uses this texture any more.
    ReleaseTexture { key: String },
    RenderNeeded,
}

impl Action {
    fn notify(err: &EditError) -> Self {
        tracing::warn!(code = err.error_code(), error = %err, "edit rejected");
        Self::Notify { code: err.error_code().to_owned(), message: err.user_message() }
    }

    fn cursor(cursor: &str) -> Self {
        Self::SetCursor { cursor: cursor.to_owned() }
    }
}

/// The editor state: every scene component plus view and UI state.
///
/// Free of browser dependencies so it can be driven directly from tests.
pub struct EngineCore {
    pub registry: ObjectRegistry,
    pub selection: SelectionController,
    pub drag: DragController,
    pub palette: ImagePalette,
    pub camera: Camera,
    pub ui: UiState,
    pub settings: CanvasSettings,
    placement: PlacementEngine,
    metadata: Vec<MetadataRecord>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(CanvasSettings::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            registry: ObjectRegistry::new(settings.grid_size),
            selection: SelectionController::new(),
            drag: DragController::new(),
            palette: ImagePalette::new(),
            camera: Camera::default(),
            ui: UiState { cursor: DEFAULT_CURSOR.to_owned(), ..UiState::default() },
            settings,
            placement: PlacementEngine::new(settings.max_image_size),
            metadata: Vec::new(),
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // --- Metadata ---

    /// Install the externally fetched records. An empty list disables every
    /// annotation choice.
    pub fn load_metadata(&mut self, records: Vec<MetadataRecord>) {
        tracing::info!(count = records.len(), "metadata loaded");
        self.metadata = records;
    }

    #[must_use]
    pub fn metadata(&self) -> &[MetadataRecord] {
        &self.metadata
    }

    /// Attach metadata record `index` to `id`.
    pub fn attach_metadata(&mut self, id: &ObjectId, index: usize) -> Vec<Action> {
        let Some(record) = self.metadata.get(index).cloned() else {
            return vec![Action::notify(&EditError::MetadataIndexOutOfRange(index))];
        };
        let Some(obj) = self.registry.get_mut(id) else {
            return vec![Action::notify(&EditError::ObjectNotFound(*id))];
        };
        annotation::attach(obj, record);
        vec![Action::RenderNeeded]
    }

    /// Remove the record attached to `id`, if any.
    pub fn detach_metadata(&mut self, id: &ObjectId) -> Vec<Action> {
        let Some(obj) = self.registry.get_mut(id) else {
            return vec![Action::notify(&EditError::ObjectNotFound(*id))];
        };
        if obj.annotation.is_none() {
            return Vec::new();
        }
        annotation::detach(obj);
        vec![Action::RenderNeeded]
    }

    // --- Toolbar ---

    /// Handle a toolbar button press by id.
    pub fn select_tool(&mut self, id: &str) -> Vec<Action> {
        let item = match id.parse::<ToolbarItem>() {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "unknown toolbar id");
                return Vec::new();
            }
        };

        match item {
            ToolbarItem::Clear => {
                let mut actions = self.clear();
                self.ui.tool = None;
                self.ui.tool_highlighted = false;
                actions.push(self.toolbar_changed());
                actions
            }
            ToolbarItem::Arm(PlacementKind::CustomImage) if self.palette.chosen().is_none() => {
                // The highlight drops but whatever was armed stays armed.
                self.ui.tool_highlighted = false;
                vec![self.toolbar_changed(), Action::notify(&EditError::NoImageSelected)]
            }
            ToolbarItem::Arm(kind) => {
                self.arm(kind);
                vec![self.toolbar_changed()]
            }
        }
    }

    fn arm(&mut self, kind: PlacementKind) {
        tracing::debug!(tool = %kind, "tool armed");
        self.ui.tool = Some(kind);
        self.ui.tool_highlighted = true;
    }

    fn toolbar_changed(&self) -> Action {
        Action::ToolbarChanged {
            tool: self.ui.tool.map(|kind| kind.as_str().to_owned()),
            highlighted: self.ui.tool_highlighted,
        }
    }

    // --- Uploads ---

    /// Register an upload whose decode has just started. Returns its key.
    pub fn begin_upload(&mut self, name: &str, data: Vec<u8>) -> String {
        let key = self.palette.begin(name, data);
        tracing::debug!(%key, name, "upload started");
        key
    }

    /// Mark an upload as decoded with its natural size.
    pub fn finish_upload(&mut self, key: &str, width: f64, height: f64) -> Vec<Action> {
        match self.palette.finish(key, Size::new(width, height)) {
            Ok(entry) => {
                tracing::info!(key, name = %entry.name, width, height, "upload ready");
                vec![Action::PaletteChanged]
            }
            Err(e) => {
                // Removed while decoding.
                tracing::debug!(error = %e, "upload finished after removal");
                Vec::new()
            }
        }
    }

    /// Drop an upload whose decode failed and tell the user which file it was.
    pub fn fail_upload(&mut self, key: &str, reason: &str) -> Vec<Action> {
        let Some(entry) = self.palette.remove(key) else {
            return Vec::new();
        };
        tracing::warn!(key, name = %entry.name, reason, "upload failed");
        vec![
            Action::Notify { code: DECODE_FAILED.to_owned(), message: format!("Could not load image: {}", entry.name) },
            Action::PaletteChanged,
        ]
    }

    /// Choose the image used by the custom-image tool, and arm that tool.
    pub fn choose_image(&mut self, key: &str) -> Vec<Action> {
        if let Err(e) = self.palette.choose(key) {
            return vec![Action::notify(&e)];
        }
        self.arm(PlacementKind::CustomImage);
        vec![Action::PaletteChanged, self.toolbar_changed()]
    }

    /// Remove an upload from the palette. Placed objects keep their copy.
    pub fn remove_image(&mut self, key: &str) -> Vec<Action> {
        let was_chosen = self.palette.chosen().is_some_and(|entry| entry.key == key);
        if self.palette.remove(key).is_none() {
            return Vec::new();
        }
        tracing::info!(key, "upload removed");

        let mut actions = vec![Action::PaletteChanged];
        if was_chosen && self.ui.tool == Some(PlacementKind::CustomImage) {
            self.ui.tool = None;
            self.ui.tool_highlighted = false;
            actions.push(self.toolbar_changed());
        }
        actions.extend(self.release_unused([key.to_owned()]));
        actions
    }

    #[must_use]
    pub fn palette_items(&self) -> Vec<PaletteItem> {
        self.palette.items()
    }

    // --- Scene edits ---

    /// Replace the image shown by `id` with the upload `key`.
    pub fn swap_image(&mut self, id: &ObjectId, key: &str) -> Vec<Action> {
        let Some(upload) = self.palette.get(key) else {
            return vec![Action::notify(&EditError::UnknownResource(key.to_owned()))];
        };
        match swap::swap_image(&mut self.registry, &mut self.selection, *id, upload, self.settings.max_image_size) {
            Ok(swapped) => {
                let mut actions = vec![Action::ImageSwapped { id: *id, handle: swapped.handle }, Action::RenderNeeded];
                actions.extend(self.release_unused(image_key(&swapped.previous)));
                actions
            }
            Err(e) => vec![Action::notify(&e)],
        }
    }

    /// Delete the selected object. No-op when nothing is selected.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.selection.current() {
            Some(id) => self.delete(&id),
            None => Vec::new(),
        }
    }

    /// Delete `id`, dropping selection, drag, and hover references to it.
    pub fn delete(&mut self, id: &ObjectId) -> Vec<Action> {
        let was_dragging = self.drag.current().as_ref() == Some(id);
        let Some(removed) = placement::delete_object(&mut self.registry, &mut self.selection, &mut self.drag, id)
        else {
            return Vec::new();
        };
        self.after_delete(*id, was_dragging, image_key(&removed))
    }

    fn after_delete(&mut self, id: ObjectId, was_dragging: bool, image: Option<String>) -> Vec<Action> {
        if self.ui.hovered == Some(id) {
            self.ui.hovered = None;
        }
        let mut actions = vec![Action::ObjectDeleted { id }];
        if was_dragging {
            actions.push(self.set_cursor(DEFAULT_CURSOR));
        }
        actions.extend(self.release_unused(image));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Remove every object, ending any selection or drag.
    pub fn clear(&mut self) -> Vec<Action> {
        let was_dragging = self.drag.end().is_some();
        self.selection = SelectionController::new();
        self.ui.hovered = None;
        let removed = self.registry.remove_all();
        tracing::info!(count = removed.len(), "plan cleared");

        let mut actions: Vec<Action> = removed.iter().map(|obj| Action::ObjectDeleted { id: obj.id }).collect();
        if was_dragging {
            actions.push(self.set_cursor(DEFAULT_CURSOR));
        }
        actions.extend(self.release_unused(removed.iter().filter_map(image_key)));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// `ReleaseTexture` for every key that neither the palette nor any
    /// placed object still uses.
    fn release_unused(&self, keys: impl IntoIterator<Item = String>) -> Vec<Action> {
        let mut released: Vec<String> = Vec::new();
        for key in keys {
            if released.contains(&key) || self.palette.contains(&key) || self.registry.references_image(&key) {
                continue;
            }
            tracing::debug!(%key, "texture released");
            released.push(key);
        }
        released.into_iter().map(|key| Action::ReleaseTexture { key }).collect()
    }

    fn set_cursor(&mut self, cursor: &str) -> Action {
        cursor.clone_into(&mut self.ui.cursor);
        Action::cursor(cursor)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.ui.pointer_screen = Some(screen_pt);
        let world = self.camera.screen_to_world(screen_pt);
        match button {
            Button::Primary => match self.ui.tool {
                Some(kind) => self.place(kind, world),
                None => self.select_at(world),
            },
            Button::Secondary => self.context_click(world),
            Button::Middle => self.begin_drag(world),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, buttons: Buttons, modifiers: Modifiers) -> Vec<Action> {
        self.ui.pointer_screen = Some(screen_pt);
        let world = self.camera.screen_to_world(screen_pt);

        if self.drag.is_dragging() {
            return match self.drag.update(&mut self.registry, world, buttons.contains(Button::Middle), modifiers.command()) {
                DragUpdate::Moved { id, position } => {
                    vec![Action::ObjectMoved { id, x: position.x, y: position.y }, Action::RenderNeeded]
                }
                DragUpdate::Ended { .. } => vec![self.set_cursor(DEFAULT_CURSOR), Action::RenderNeeded],
                DragUpdate::Idle => Vec::new(),
            };
        }

        let hovered = self.registry.find_topmost_at(world).map(|obj| obj.id);
        let changed = hovered != self.ui.hovered;
        self.ui.hovered = hovered;
        // The tooltip tracks the pointer, so any move over an object repaints.
        if changed || hovered.is_some() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Middle && self.drag.end().is_some() {
            return vec![self.set_cursor(DEFAULT_CURSOR), Action::RenderNeeded];
        }
        Vec::new()
    }

    /// The pointer left the surface: hide the tooltip.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.ui.pointer_screen = None;
        if self.ui.hovered.take().is_some() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Zoom around the pointer while ctrl/cmd is held; otherwise ignored.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.command() {
            return Vec::new();
        }
        let step = if delta.dy < 0.0 { self.settings.zoom_step } else { -self.settings.zoom_step };
        let anchor = self.camera.screen_to_world(screen_pt);
        if !self.camera.step_zoom(step, self.settings.min_zoom, self.settings.max_zoom) {
            return Vec::new();
        }
        self.camera.pan_x = screen_pt.x - anchor.x * self.camera.zoom;
        self.camera.pan_y = screen_pt.y - anchor.y * self.camera.zoom;
        tracing::debug!(zoom = self.camera.zoom, "zoom changed");
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_delete() {
            return self.delete_selected();
        }
        Vec::new()
    }

    fn place(&mut self, kind: PlacementKind, world: Point) -> Vec<Action> {
        let was_dragging = self.drag.current();
        let result =
            self.placement.place(kind, world, &mut self.registry, &mut self.selection, &mut self.drag, &self.palette);
        match result {
            Ok(Placement::Created(id)) => {
                let Some(obj) = self.registry.get(&id) else {
                    return Vec::new();
                };
                vec![Action::ObjectCreated { id, kind: obj.kind() }, Action::RenderNeeded]
            }
            Ok(Placement::Deleted { id, image }) => self.after_delete(id, was_dragging == Some(id), image),
            Ok(Placement::Ignored) => Vec::new(),
            Err(e) => vec![Action::notify(&e)],
        }
    }

    fn select_at(&mut self, world: Point) -> Vec<Action> {
        let before = self.selection.current();
        let after = self.selection.select_at(&mut self.registry, world);
        let mut actions = Vec::new();
        if after.is_some() && self.ui.tool_highlighted {
            self.ui.tool_highlighted = false;
            actions.push(self.toolbar_changed());
        }
        if before != after || after.is_some() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn context_click(&mut self, world: Point) -> Vec<Action> {
        let mut actions = self.select_at(world);
        let Some(obj) = self.selection.current().and_then(|id| self.registry.get(&id)) else {
            return actions;
        };
        let can_annotate = !self.metadata.is_empty();
        let can_detach = obj.annotation.is_some();
        match obj.kind() {
            ObjectKind::CustomImage => actions.push(Action::ShowImageMenu {
                id: obj.id,
                can_swap: self.palette.iter().any(UploadedImage::is_loaded),
                can_annotate,
                can_detach,
            }),
            ObjectKind::Builtin(_) if can_annotate => {
                actions.push(Action::ShowMetadataChoices { id: obj.id, can_detach });
            }
            ObjectKind::Builtin(_) => {}
        }
        actions
    }

    fn begin_drag(&mut self, world: Point) -> Vec<Action> {
        let Some(id) = self.registry.find_topmost_at(world).map(|obj| obj.id) else {
            return Vec::new();
        };
        if let Err(e) = self.drag.begin(&mut self.registry, &mut self.selection, id, world) {
            return vec![Action::notify(&e)];
        }
        self.ui.hovered = None;
        let mut actions = vec![self.set_cursor(MOVE_CURSOR)];
        if self.ui.tool_highlighted {
            self.ui.tool_highlighted = false;
            actions.push(self.toolbar_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The currently selected object, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection.current()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&PlacedObject> {
        self.registry.get(id)
    }

    /// Draw commands for the current frame.
    #[must_use]
    pub fn display_list(&self) -> DisplayList {
        render::display_list(
            &self.registry,
            &self.camera,
            &self.ui,
            &self.settings,
            self.viewport_width,
            self.viewport_height,
        )
    }
}

fn image_key(obj: &PlacedObject) -> Option<String> {
    obj.image().map(|img| img.key.clone())
}
