//! Input model: toolbar items, mouse buttons, modifier keys, and the UI state
//! the renderer needs between events.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use crate::camera::Point;
use crate::doc::ObjectId;
use crate::error::EditError;
use crate::placement::PlacementKind;

/// Toolbar id that empties the plan.
pub const CLEAR: &str = "clear";

/// One toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    /// Arm a placement kind (including delete mode).
    Arm(PlacementKind),
    /// Remove every object.
    Clear,
}

impl FromStr for ToolbarItem {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CLEAR {
            return Ok(Self::Clear);
        }
        s.parse().map(Self::Arm)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether ctrl or cmd is held. Enables wheel zoom and drag snapping.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button: place, or select when no tool is armed.
    Primary,
    /// Middle mouse button: drag.
    Middle,
    /// Right mouse button: select and open the object menu.
    Secondary,
}

/// Buttons currently held, as reported with a pointer-move event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub middle: bool,
    pub secondary: bool,
}

impl Buttons {
    /// Decode the DOM `MouseEvent.buttons` bitmask.
    #[must_use]
    pub fn from_mask(mask: u16) -> Self {
        Self { primary: mask & 1 != 0, secondary: mask & 2 != 0, middle: mask & 4 != 0 }
    }

    #[must_use]
    pub fn contains(self, button: Button) -> bool {
        match button {
            Button::Primary => self.primary,
            Button::Middle => self.middle,
            Button::Secondary => self.secondary,
        }
    }
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down (zooms out).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Armed placement kind, if any.
    pub tool: Option<PlacementKind>,
    /// Whether the armed tool's toolbar button is highlighted. Selecting an
    /// object drops the highlight but keeps the tool armed.
    pub tool_highlighted: bool,
    /// Object under the pointer when no drag is active.
    pub hovered: Option<ObjectId>,
    /// Last pointer position in screen space.
    pub pointer_screen: Option<Point>,
    /// CSS cursor name.
    pub cursor: String,
}
