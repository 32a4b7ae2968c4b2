//! Voxel data structures and operations

pub mod voxel;
pub mod store;
pub mod occupancy;
pub mod query;
pub mod edit;

pub use voxel::{Phase, VoxelState};
pub use store::{VoxelStore, WorldDims};
pub use occupancy::OccupancyHierarchy;
pub use query::{raycast, RayHit};
pub use edit::{BlockEditor, Brush, BrushShape, EditMode};
