//! UI building blocks for the taskchat TUI.

pub mod layout;
pub mod text;
pub mod theme;
pub mod widgets;

pub use layout::*;
pub use theme::*;
