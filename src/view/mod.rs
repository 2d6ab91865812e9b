//! Presentation: glyph layout, viewport selection, the virtual screen and
//! the per-tick renderer.

pub mod layout;
pub mod render;
pub mod screen;
pub mod status_bar;
pub mod viewport;
