use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;
use crate::voxel::voxel::VoxelState;

/// Brush shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushShape {
    #[default]
    Cube,
    Sphere,
}

/// What an edit does to the cells inside the brush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Fill with the given state
    Add(VoxelState),
    /// Clear to air
    Remove,
}

impl EditMode {
    /// State written into brush cells
    pub fn state(self) -> VoxelState {
        match self {
            EditMode::Add(state) => state,
            EditMode::Remove => VoxelState::Air,
        }
    }
}

/// A brush placed at a target voxel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub shape: BrushShape,
    pub size: u32,
    pub target: IVec3,
}

impl Brush {
    pub fn new(shape: BrushShape, size: u32, target: IVec3) -> Self {
        Self { shape, size, target }
    }

    /// Box the brush can touch (before clamping to the world)
    pub fn bounds(&self) -> Aabb {
        Aabb::cube_around(self.target, self.size)
    }

    /// Check if voxel `p` is covered by the brush
    pub fn contains(&self, p: IVec3) -> bool {
        let bounds = self.bounds();
        if !bounds.contains(p) {
            return false;
        }
        match self.shape {
            BrushShape::Cube => true,
            BrushShape::Sphere => {
                let center = (bounds.min.as_vec3() + bounds.max.as_vec3()) * 0.5;
                let cell = p.as_vec3() + Vec3::splat(0.5);
                cell.distance(center) <= self.size as f32 * 0.5
            }
        }
    }
}
