//! Collaborators at the edge of the editor: external filter, diagnostics,
//! logging and terminal setup.

pub mod diagnostics;
pub mod filter;
pub mod terminal_modes;
pub mod tracing_setup;
