//! Integer voxel math

pub mod aabb;
pub mod morton;
pub mod ray;

pub use aabb::Aabb;
pub use morton::{morton_index, morton_position};
pub use ray::{Ray, VoxelStep, VoxelWalk};
