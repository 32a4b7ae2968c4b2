//! Procedural terrain generation

pub mod generator;
pub use generator::{fill, Heightmap, TerrainGenerator, TerrainParams, TerrainRule};
