//! Tables the core produces for the renderer

pub mod ao;
pub mod context;

pub use ao::{AoSample, AoTable, AO_CAPACITY};
pub use context::RenderContext;
