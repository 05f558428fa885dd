//! UI module for the kassist TUI.

pub mod layout;
pub mod theme;

pub use layout::*;
pub use theme::*;
