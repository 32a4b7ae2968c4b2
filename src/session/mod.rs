//! Session driver: startup menu and per-frame pass ordering

pub mod menu;
pub mod state;

pub use menu::{Menu, MenuOutcome};
pub use state::{FrameReport, Pass, Session};
