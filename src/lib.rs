//! Pundus - packed voxel world core: store, occupancy, compaction index,
//! block editing and cellular-automaton physics

pub mod core;
pub mod math;
pub mod pack;
pub mod voxel;
pub mod physics;
pub mod terrain;
pub mod render;
pub mod persist;
pub mod session;
