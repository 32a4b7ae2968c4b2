use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;

/// Box the automaton updates in one tick.
///
/// `extent` voxels wide on x and z around the reference position, full
/// world height, clamped to the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsWindow {
    bounds: Aabb,
}

impl PhysicsWindow {
    /// Window centred on `reference` in a world of `axis` voxels.
    /// Extents wider than the world are clamped to it.
    pub fn centered(reference: Vec3, extent: u32, axis: u32) -> Self {
        let extent = extent.min(axis) as i64;
        let half = extent / 2;
        let span = |c: f32| {
            let lo = (c.floor() as i64).saturating_sub(half);
            let hi = lo.saturating_add(extent);
            (lo.clamp(0, axis as i64) as i32, hi.clamp(0, axis as i64) as i32)
        };
        let (min_x, max_x) = span(reference.x);
        let (min_z, max_z) = span(reference.z);
        let min = IVec3::new(min_x, 0, min_z);
        let max = IVec3::new(max_x, axis as i32, max_z);
        Self {
            bounds: Aabb::new(min, max).clamped(axis),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn contains(&self, p: IVec3) -> bool {
        self.bounds.contains(p)
    }

    /// Index of `p` in an x-fastest buffer covering the window
    #[inline]
    pub fn local_index(&self, p: IVec3) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let size = self.bounds.size().as_u64vec3();
        let local = (p - self.bounds.min).as_u64vec3();
        Some((local.x + size.x * (local.y + size.y * local.z)) as usize)
    }

    /// Inverse of [`local_index`](Self::local_index)
    #[inline]
    pub fn position(&self, index: usize) -> IVec3 {
        let size = self.bounds.size().as_u64vec3();
        let i = index as u64;
        let x = i % size.x;
        let y = (i / size.x) % size.y;
        let z = i / (size.x * size.y);
        self.bounds.min + IVec3::new(x as i32, y as i32, z as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_window() {
        let window = PhysicsWindow::centered(Vec3::new(32.7, 10.0, 40.2), 16, 64);
        assert_eq!(window.bounds(), Aabb::new(IVec3::new(24, 0, 32), IVec3::new(40, 64, 48)));
    }

    #[test]
    fn test_window_clamped_at_world_edge() {
        let window = PhysicsWindow::centered(Vec3::new(2.0, 0.0, 62.0), 16, 64);
        assert_eq!(window.bounds(), Aabb::new(IVec3::new(0, 0, 54), IVec3::new(10, 64, 64)));
    }

    #[test]
    fn test_window_outside_world_is_empty() {
        assert!(PhysicsWindow::centered(Vec3::splat(-500.0), 16, 64).is_empty());
        assert!(PhysicsWindow::centered(Vec3::splat(8.0), 0, 64).is_empty());
    }

    #[test]
    fn test_local_index_roundtrip() {
        let window = PhysicsWindow::centered(Vec3::new(8.0, 0.0, 8.0), 6, 16);
        for (i, p) in window.bounds().iter().enumerate() {
            assert_eq!(window.local_index(p), Some(i));
            assert_eq!(window.position(i), p);
        }
        assert_eq!(window.local_index(IVec3::new(0, 0, 0)), None);
    }

    #[test]
    fn test_oversized_extent_covers_world() {
        let mut settings = crate::core::Settings::default();
        settings.set("sim", "3000000000").unwrap();
        let window = PhysicsWindow::centered(Vec3::splat(16.0), settings.sim_extent, 32);
        assert_eq!(window.bounds(), Aabb::world(32));

        assert!(PhysicsWindow::centered(Vec3::splat(f32::MAX), u32::MAX, 32).is_empty());
        assert!(PhysicsWindow::centered(Vec3::splat(f32::MIN), 16, 32).is_empty());
    }

    #[test]
    fn test_index_past_u32_range() {
        let window = PhysicsWindow::centered(Vec3::splat(1024.0), 2048, 2048);
        let last = IVec3::splat(2047);
        let index = window.local_index(last).unwrap();
        assert_eq!(index as u64, 2048u64 * 2048 * 2048 - 1);
        assert_eq!(window.position(index), last);
    }
}
