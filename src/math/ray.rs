//! Ray type and voxel traversal

use crate::core::types::{IVec3, Vec3};
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast box intersection
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction is normalized here)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray-box intersection using slab method
    /// Returns Some((t_near, t_far)) if intersection, None otherwise
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let t1 = (aabb.min.as_vec3() - self.origin) * self.inv_direction;
        let t2 = (aabb.max.as_vec3() - self.origin) * self.inv_direction;

        let t_min = t1.min(t2);
        let t_max = t1.max(t2);

        let t_near = t_min.x.max(t_min.y).max(t_min.z);
        let t_far = t_max.x.min(t_max.y).min(t_max.z);

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Walk the voxels pierced by the ray, nearest first, up to `max_distance`
    pub fn voxels(&self, max_distance: f32) -> VoxelWalk {
        VoxelWalk::new(self, max_distance)
    }
}

/// One voxel visited by a [`VoxelWalk`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelStep {
    /// Voxel coordinate
    pub voxel: IVec3,
    /// Face normal through which the ray entered (zero for the start voxel)
    pub normal: IVec3,
    /// Distance along the ray at entry
    pub distance: f32,
}

/// Grid traversal (Amanatides & Woo) over unit voxels
pub struct VoxelWalk {
    voxel: IVec3,
    step: IVec3,
    t_max: Vec3,
    t_delta: Vec3,
    normal: IVec3,
    distance: f32,
    max_distance: f32,
    done: bool,
}

impl VoxelWalk {
    fn new(ray: &Ray, max_distance: f32) -> Self {
        let voxel = ray.origin.floor().as_ivec3();
        let mut step = IVec3::ZERO;
        let mut t_max = Vec3::INFINITY;
        let mut t_delta = Vec3::INFINITY;
        for axis in 0..3 {
            let d = ray.direction[axis];
            if d == 0.0 {
                continue;
            }
            step[axis] = if d > 0.0 { 1 } else { -1 };
            let boundary = (voxel[axis] + step[axis].max(0)) as f32;
            t_max[axis] = (boundary - ray.origin[axis]) * ray.inv_direction[axis];
            t_delta[axis] = ray.inv_direction[axis].abs();
        }
        Self {
            voxel,
            step,
            t_max,
            t_delta,
            normal: IVec3::ZERO,
            distance: 0.0,
            max_distance,
            done: ray.direction == Vec3::ZERO,
        }
    }
}

impl Iterator for VoxelWalk {
    type Item = VoxelStep;

    fn next(&mut self) -> Option<VoxelStep> {
        if self.done || self.distance > self.max_distance {
            return None;
        }
        let current = VoxelStep {
            voxel: self.voxel,
            normal: self.normal,
            distance: self.distance,
        };

        // Advance along the axis whose boundary is nearest
        let axis = if self.t_max.x < self.t_max.y {
            if self.t_max.x < self.t_max.z { 0 } else { 2 }
        } else if self.t_max.y < self.t_max.z {
            1
        } else {
            2
        };
        self.distance = self.t_max[axis];
        self.t_max[axis] += self.t_delta[axis];
        self.voxel[axis] += self.step[axis];
        self.normal = IVec3::ZERO;
        self.normal[axis] = -self.step[axis];
        if !self.distance.is_finite() {
            self.done = true;
        }

        Some(current)
    }
}
