//! Scene core for the floor-plan editor.
//!
//! This crate owns everything that decides *what* is on the plan: which
//! objects exist, where they sit on the grid, which one is selected or being
//! dragged, how they stack, and what metadata is attached to them. It has no
//! browser dependencies; the host crate feeds it pointer, keyboard, and
//! toolbar events and paints the [`render::DisplayList`] it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`], the single editor-state struct, and its [`engine::Action`] stream |
//! | [`doc`] | Placed objects, templates, and the [`doc::ObjectRegistry`] |
//! | [`grid`] | Grid snapping |
//! | [`hit`] | Topmost-object lookup by point |
//! | [`palette`] | Uploaded image resources and the current choice |
//! | [`selection`] | Single-object selection and its decoration lifecycle |
//! | [`drag`] | Single-object drag sessions |
//! | [`placement`] | Validated object creation from the active tool |
//! | [`annotation`] | External metadata records, rating colors, tooltips |
//! | [`swap`] | Image replacement that preserves object identity |
//! | [`input`] | Toolbar ids, buttons, modifiers, keys |
//! | [`camera`] | Pan/zoom and coordinate conversion |
//! | [`render`] | Display list for the host painter |
//! | [`consts`] | Shared constants (grid size, colors, stroke widths) |
//! | [`error`] | [`error::EditError`] |

pub mod annotation;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hit;
pub mod input;
pub mod palette;
pub mod placement;
pub mod render;
pub mod selection;
pub mod swap;

mod settings;

pub use settings::CanvasSettings;
