//! Block editing: brush shapes and the editor that applies them.

pub mod brush;
pub mod editor;

pub use brush::{Brush, BrushShape, EditMode};
pub use editor::BlockEditor;
