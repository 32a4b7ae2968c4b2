use log::debug;
use rayon::prelude::*;

use super::rule::Snapshot;
use super::window::PhysicsWindow;
use crate::core::types::Vec3;
use crate::voxel::{OccupancyHierarchy, VoxelState, VoxelStore};

/// Cellular automaton over a window that follows the observer.
///
/// One tick is one synchronous wave: the window is copied out of the
/// store, every cell's next state is computed in parallel from that copy,
/// and the results are written back before occupancy is rebuilt.
#[derive(Debug)]
pub struct PhysicsAutomaton {
    extent: u32,
    ticks: u64,
}

impl PhysicsAutomaton {
    /// Automaton with a window `extent` voxels wide on x and z
    pub fn new(extent: u32) -> Self {
        Self { extent, ticks: 0 }
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    pub fn set_extent(&mut self, extent: u32) {
        self.extent = extent;
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Window a tick at `reference` would cover
    pub fn window(&self, store: &VoxelStore, reference: Vec3) -> PhysicsWindow {
        PhysicsWindow::centered(reference, self.extent, store.dims().axis())
    }

    /// Next states for the window, x fastest. Pure in the store and seed.
    pub fn step(&self, store: &VoxelStore, window: &PhysicsWindow, seed: u32) -> Vec<VoxelState> {
        let cells = store.snapshot(&window.bounds());
        let snapshot = Snapshot::new(window, &cells, seed);
        (0..cells.len())
            .into_par_iter()
            .map(|i| snapshot.next(window.position(i)))
            .collect()
    }

    /// Run one tick centred on `reference`, then rebuild occupancy over the
    /// window. Returns the window that was updated.
    pub fn tick(
        &mut self,
        store: &mut VoxelStore,
        occupancy: &mut OccupancyHierarchy,
        reference: Vec3,
        seed: u32,
    ) -> PhysicsWindow {
        let window = self.window(store, reference);
        if window.is_empty() {
            return window;
        }

        let next = self.step(store, &window, seed);
        store.write_region(&window.bounds(), |p| {
            window
                .local_index(p.as_ivec3())
                .and_then(|i| next.get(i).copied())
                .unwrap_or_default()
        });
        occupancy.rebuild_window(store, &window.bounds());

        self.ticks += 1;
        debug!("Physics tick {} over {:?}", self.ticks, window.bounds());
        window
    }
}
