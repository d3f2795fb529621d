//! Rendering: turns scene state into a flat display list.
//!
//! This module reads registry, camera, and UI state and produces draw
//! commands; it never mutates application state. The host walks the list in
//! order and paints it. Objects appear bottom-first by depth. A selection
//! outline sits at its owner's depth + 1 and is drawn after any object that
//! shares that depth.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::camera::{Camera, Point};
use crate::consts::{GRID_LINE_ALPHA, GRID_LINE_COLOR, NEUTRAL_TINT};
use crate::doc::{Body, ObjectId, ObjectRegistry, Rect, Stroke, VisualHandle};
use crate::input::UiState;
use crate::CanvasSettings;

/// A grid line in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
}

/// Grid layer: style shared by every line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayer {
    pub color: u32,
    pub alpha: f64,
    /// Line width in screen pixels.
    pub width: f64,
    pub lines: Vec<GridLine>,
}

/// One draw command, in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Filled, stroked rectangle for a built-in object.
    Shape { id: ObjectId, handle: VisualHandle, rect: Rect, fill: u32, stroke: Stroke, depth: i64 },
    /// Uploaded image multiplied by `tint`.
    Image { id: ObjectId, handle: VisualHandle, texture: String, rect: Rect, tint: u32, depth: i64 },
    /// Selection outline around an image.
    Outline { owner: ObjectId, rect: Rect, width: f64, color: u32, depth: i64 },
}

impl DrawCommand {
    #[must_use]
    pub fn depth(&self) -> i64 {
        match self {
            Self::Shape { depth, .. } | Self::Image { depth, .. } | Self::Outline { depth, .. } => *depth,
        }
    }
}

/// Hover tooltip, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub at: Point,
}

/// Everything the host needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayList {
    pub camera: Camera,
    pub grid: GridLayer,
    pub items: Vec<DrawCommand>,
    pub tooltip: Option<Tooltip>,
}

/// Build the display list for the current frame.
///
/// `viewport_w` and `viewport_h` are in CSS pixels.
#[must_use]
pub fn display_list(
    registry: &ObjectRegistry,
    camera: &Camera,
    ui: &UiState,
    settings: &CanvasSettings,
    viewport_w: f64,
    viewport_h: f64,
) -> DisplayList {
    DisplayList {
        camera: *camera,
        grid: grid_layer(camera, settings.grid_size, viewport_w, viewport_h),
        items: draw_commands(registry),
        tooltip: tooltip(registry, ui, settings.tooltip_offset_px),
    }
}

/// Grid lines covering the visible part of the world.
#[must_use]
pub fn grid_layer(camera: &Camera, cell: f64, viewport_w: f64, viewport_h: f64) -> GridLayer {
    let mut lines = Vec::new();
    if cell.is_finite() && cell > 0.0 && viewport_w > 0.0 && viewport_h > 0.0 {
        let top_left = camera.screen_to_world(Point::new(0.0, 0.0));
        let bottom_right = camera.screen_to_world(Point::new(viewport_w, viewport_h));

        let mut x = (top_left.x / cell).floor() * cell;
        while x <= bottom_right.x {
            lines.push(GridLine { from: Point::new(x, top_left.y), to: Point::new(x, bottom_right.y) });
            x += cell;
        }
        let mut y = (top_left.y / cell).floor() * cell;
        while y <= bottom_right.y {
            lines.push(GridLine { from: Point::new(top_left.x, y), to: Point::new(bottom_right.x, y) });
            y += cell;
        }
    }
    GridLayer { color: GRID_LINE_COLOR, alpha: GRID_LINE_ALPHA, width: 1.0, lines }
}

fn draw_commands(registry: &ObjectRegistry) -> Vec<DrawCommand> {
    // (depth, is_decoration) keeps an outline above an object of equal depth.
    let mut keyed: Vec<((i64, bool), DrawCommand)> = Vec::with_capacity(registry.len());
    for obj in registry.sorted_by_depth() {
        let rect = obj.bounds();
        let cmd = match &obj.body {
            Body::Shape { fill, stroke, .. } => DrawCommand::Shape {
                id: obj.id,
                handle: obj.handle,
                rect,
                fill: *fill,
                stroke: *stroke,
                depth: obj.depth,
            },
            Body::Image { image, tint, .. } => DrawCommand::Image {
                id: obj.id,
                handle: obj.handle,
                texture: image.key.clone(),
                rect,
                tint: tint.unwrap_or(NEUTRAL_TINT),
                depth: obj.depth,
            },
        };
        keyed.push(((obj.depth, false), cmd));

        if let Some(outline) = obj.outline() {
            let cmd = DrawCommand::Outline {
                owner: obj.id,
                rect: outline.rect,
                width: outline.width,
                color: outline.color,
                depth: outline.depth,
            };
            keyed.push(((outline.depth, true), cmd));
        }
    }
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, cmd)| cmd).collect()
}

fn tooltip(registry: &ObjectRegistry, ui: &UiState, offset: f64) -> Option<Tooltip> {
    let obj = registry.get(&ui.hovered?)?;
    let pointer = ui.pointer_screen?;
    Some(Tooltip { text: obj.tooltip.clone(), at: Point::new(pointer.x + offset, pointer.y + offset) })
}
