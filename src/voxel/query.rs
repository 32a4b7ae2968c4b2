//! Read-only ray queries against the store, used to target edits.

use super::occupancy::OccupancyHierarchy;
use super::store::VoxelStore;
use super::voxel::VoxelState;
use crate::core::types::IVec3;
use crate::math::Ray;

/// First solid voxel hit by a ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Voxel that was hit
    pub voxel: IVec3,
    /// Last empty voxel before the hit (where an added block goes)
    pub previous: IVec3,
    /// Face normal of the hit
    pub normal: IVec3,
    pub distance: f32,
    pub state: VoxelState,
}

/// Walk `ray` through the store and return the first non-air voxel within
/// `max_distance`. Chunks the occupancy summary marks empty are passed over
/// without touching the voxel words.
pub fn raycast(
    store: &VoxelStore,
    occupancy: &OccupancyHierarchy,
    ray: &Ray,
    max_distance: f32,
) -> Option<RayHit> {
    let dims = store.dims();
    let world = dims.bounds();
    // Skip the stretch in front of the world
    let (t_near, _) = ray.intersects_aabb(&world)?;

    let mut previous = ray.at(t_near).floor().as_ivec3();
    for step in ray.voxels(max_distance) {
        if step.distance + 1.0 < t_near {
            continue;
        }
        let p = step.voxel;
        if !world.contains(p) {
            previous = p;
            continue;
        }
        let chunk = occupancy.chunk_of(p.as_uvec3());
        if occupancy.query(chunk) {
            if let Ok(state) = store.read(p) {
                if !state.is_air() {
                    return Some(RayHit {
                        voxel: p,
                        previous,
                        normal: step.normal,
                        distance: step.distance,
                        state,
                    });
                }
            }
        }
        previous = p;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::math::Aabb;
    use crate::voxel::store::WorldDims;

    fn floor_world() -> (VoxelStore, OccupancyHierarchy) {
        let mut store = VoxelStore::new(WorldDims::new(32, 8).unwrap());
        store.write_region(&Aabb::new(IVec3::ZERO, IVec3::new(32, 4, 32)), |_| VoxelState::Stone);
        let occupancy = OccupancyHierarchy::from_store(&store);
        (store, occupancy)
    }

    #[test]
    fn test_hit_floor_from_above() {
        let (store, occupancy) = floor_world();
        let ray = Ray::new(Vec3::new(10.5, 20.5, 10.5), -Vec3::Y);
        let hit = raycast(&store, &occupancy, &ray, 64.0).unwrap();
        assert_eq!(hit.voxel, IVec3::new(10, 3, 10));
        assert_eq!(hit.previous, IVec3::new(10, 4, 10));
        assert_eq!(hit.normal, IVec3::Y);
        assert_eq!(hit.state, VoxelState::Stone);
    }

    #[test]
    fn test_miss_when_looking_up() {
        let (store, occupancy) = floor_world();
        let ray = Ray::new(Vec3::new(10.5, 20.5, 10.5), Vec3::Y);
        assert!(raycast(&store, &occupancy, &ray, 64.0).is_none());
    }

    #[test]
    fn test_max_distance() {
        let (store, occupancy) = floor_world();
        let ray = Ray::new(Vec3::new(10.5, 20.5, 10.5), -Vec3::Y);
        assert!(raycast(&store, &occupancy, &ray, 5.0).is_none());
    }

    #[test]
    fn test_ray_from_outside_world() {
        let (store, occupancy) = floor_world();
        let ray = Ray::new(Vec3::new(-5.5, 2.5, 3.5), Vec3::X);
        let hit = raycast(&store, &occupancy, &ray, 64.0).unwrap();
        assert_eq!(hit.voxel, IVec3::new(0, 2, 3));
        assert_eq!(hit.normal, IVec3::new(-1, 0, 0));
    }
}
