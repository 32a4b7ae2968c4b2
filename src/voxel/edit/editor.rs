//! Localized block edits.

use log::debug;

use super::brush::{Brush, EditMode};
use crate::math::Aabb;
use crate::voxel::occupancy::OccupancyHierarchy;
use crate::voxel::store::VoxelStore;

/// Applies brush edits to the store and keeps the occupancy summary coherent.
///
/// The editor itself has no memory of buttons; the caller decides when an
/// edit fires (once per press).
#[derive(Debug, Default)]
pub struct BlockEditor {
    edits: u64,
}

impl BlockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `mode` to every cell of `brush`, then rebuild occupancy over
    /// the touched box.
    ///
    /// Returns the clamped box that was written, or None when the brush is
    /// empty or lies entirely outside the world (nothing changes).
    pub fn apply(
        &mut self,
        store: &mut VoxelStore,
        occupancy: &mut OccupancyHierarchy,
        brush: &Brush,
        mode: EditMode,
    ) -> Option<Aabb> {
        let region = brush.bounds().clamped(store.dims().axis());
        if brush.size == 0 || region.is_empty() {
            return None;
        }

        let state = mode.state();
        // Cells outside the brush shape keep their current state
        let current = store.snapshot(&region);
        let size = region.size();
        store.write_region(&region, |p| {
            let p = p.as_ivec3();
            if brush.contains(p) {
                state
            } else {
                let local = (p - region.min).as_uvec3();
                current[(local.x + size.x * (local.y + size.y * local.z)) as usize]
            }
        });
        occupancy.rebuild_window(store, &region);

        self.edits += 1;
        debug!("Edit {:?} at {:?}: {} voxels in {:?}", mode, brush.target, region.volume(), region);
        Some(region)
    }

    /// Number of edits applied
    pub fn edit_count(&self) -> u64 {
        self.edits
    }
}
