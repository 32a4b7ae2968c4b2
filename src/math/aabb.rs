//! Axis-aligned voxel box

use crate::core::types::{IVec3, UVec3};

/// Axis-aligned box of voxel coordinates.
///
/// `min` is inclusive and `max` is exclusive. Coordinates are signed so that
/// boxes built around a target near the edge can extend past the world before
/// they are clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub min: IVec3,
    pub max: IVec3,
}

impl Aabb {
    /// Create box from min (inclusive) and max (exclusive) corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Box covering a whole world of the given axis size
    pub fn world(axis: u32) -> Self {
        Self::new(IVec3::ZERO, IVec3::splat(axis as i32))
    }

    /// Cube of edge `size` whose centre cell is `center` (rounding towards min for even sizes)
    pub fn cube_around(center: IVec3, size: u32) -> Self {
        let min = center - IVec3::splat((size / 2) as i32);
        Self::new(min, min + IVec3::splat(size as i32))
    }

    /// Get size (max - min), zero on inverted axes
    pub fn size(&self) -> UVec3 {
        (self.max - self.min).max(IVec3::ZERO).as_uvec3()
    }

    /// Number of voxels inside the box
    pub fn volume(&self) -> u64 {
        let s = self.size();
        s.x as u64 * s.y as u64 * s.z as u64
    }

    /// True if the box holds no voxels
    pub fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Check if a voxel lies inside the box
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x < self.max.x &&
        p.y >= self.min.y && p.y < self.max.y &&
        p.z >= self.min.z && p.z < self.max.z
    }

    /// Check if two boxes share at least one voxel
    pub fn intersects(&self, other: &Aabb) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Overlapping region of two boxes (may be empty)
    pub fn intersection(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Return merged box containing both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Clamp to a world of the given axis size
    pub fn clamped(&self, axis: u32) -> Aabb {
        self.intersection(&Aabb::world(axis))
    }

    /// Iterate every voxel in the box, x fastest
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (min, max) = (self.min, self.max);
        (min.z..max.z)
            .flat_map(move |z| (min.y..max.y).map(move |y| (y, z)))
            .flat_map(move |(y, z)| (min.x..max.x).map(move |x| IVec3::new(x, y, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(IVec3::ZERO, IVec3::new(2, 3, 4));
        assert_eq!(aabb.size(), UVec3::new(2, 3, 4));
        assert_eq!(aabb.volume(), 24);
        assert!(!aabb.is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let aabb = Aabb::new(IVec3::ZERO, IVec3::ONE);
        assert!(aabb.contains(IVec3::ZERO));
        assert!(!aabb.contains(IVec3::ONE));
        assert!(!aabb.contains(IVec3::new(-1, 0, 0)));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::new(IVec3::ZERO, IVec3::splat(2));
        let b = Aabb::new(IVec3::ONE, IVec3::splat(3));
        let c = Aabb::new(IVec3::splat(2), IVec3::splat(3));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_clamped() {
        let aabb = Aabb::new(IVec3::new(-4, 2, 30), IVec3::new(3, 40, 50));
        let clamped = aabb.clamped(32);
        assert_eq!(clamped.min, IVec3::new(0, 2, 30));
        assert_eq!(clamped.max, IVec3::new(3, 32, 32));

        let outside = Aabb::new(IVec3::splat(40), IVec3::splat(50));
        assert!(outside.clamped(32).is_empty());
    }

    #[test]
    fn test_cube_around() {
        let odd = Aabb::cube_around(IVec3::splat(10), 3);
        assert_eq!(odd.min, IVec3::splat(9));
        assert_eq!(odd.max, IVec3::splat(12));
        assert!(Aabb::cube_around(IVec3::splat(10), 0).is_empty());
    }

    #[test]
    fn test_iter_visits_every_voxel_once() {
        let aabb = Aabb::new(IVec3::new(1, 2, 3), IVec3::new(3, 4, 6));
        let cells: Vec<IVec3> = aabb.iter().collect();
        assert_eq!(cells.len() as u64, aabb.volume());
        assert_eq!(cells[0], IVec3::new(1, 2, 3));
        assert_eq!(cells[1], IVec3::new(2, 2, 3));
        assert_eq!(Aabb::new(IVec3::ONE, IVec3::ZERO).iter().count(), 0);
    }

    #[test]
    fn test_merged_ignores_empty() {
        let a = Aabb::new(IVec3::ZERO, IVec3::ONE);
        let empty = Aabb::default();
        assert_eq!(a.merged(&empty), a);
        assert_eq!(
            a.merged(&Aabb::new(IVec3::splat(4), IVec3::splat(5))),
            Aabb::new(IVec3::ZERO, IVec3::splat(5))
        );
    }
}
