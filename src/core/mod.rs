//! Core types: errors, logging, configuration and input state

pub mod types;
pub mod error;
pub mod logging;
pub mod config;
pub mod input;

pub use types::*;
pub use error::Error;
pub use config::{Settings, WorldConfig};
