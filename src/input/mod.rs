//! Input handling: crossterm events to logical keys to actions

pub mod actions;
pub mod keybindings;
pub mod keys;
