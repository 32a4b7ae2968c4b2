//! Falling and flowing rule over one tick's snapshot.
//!
//! Every voxel's next state depends only on the previous-tick snapshot and
//! the seed. A mover (granular or fluid) names at most one target cell; a
//! target accepts at most one mover, checked in a fixed order. A mover leaves
//! its cell exactly when its target accepts it, so the number of each state
//! in the window is conserved.

use super::window::PhysicsWindow;
use crate::core::types::IVec3;
use crate::voxel::{Phase, VoxelState};

/// Sideways directions a fluid may spread in
const LATERAL: [IVec3; 4] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

/// Deterministic 3D hash
fn hash_3d(p: IVec3, seed: u32) -> u32 {
    let mut h = seed;
    h ^= p.x as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= p.y as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= p.z as u32;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h
}

/// Read-only view of the previous tick
pub struct Snapshot<'a> {
    window: &'a PhysicsWindow,
    cells: &'a [VoxelState],
    seed: u32,
}

impl<'a> Snapshot<'a> {
    pub fn new(window: &'a PhysicsWindow, cells: &'a [VoxelState], seed: u32) -> Self {
        Self { window, cells, seed }
    }

    /// Previous state of `p`, None outside the window
    #[inline]
    fn cell(&self, p: IVec3) -> Option<VoxelState> {
        self.window
            .local_index(p)
            .and_then(|i| self.cells.get(i).copied())
    }

    #[inline]
    fn is_open(&self, p: IVec3) -> bool {
        self.cell(p) == Some(VoxelState::Air)
    }

    /// Cell the voxel at `p` tries to move into this tick
    fn target(&self, p: IVec3) -> Option<IVec3> {
        let phase = self.cell(p)?.phase();
        if !matches!(phase, Phase::Granular | Phase::Fluid) {
            return None;
        }
        let below = p - IVec3::Y;
        if self.is_open(below) {
            return Some(below);
        }
        if phase == Phase::Fluid {
            let side = p + LATERAL[(hash_3d(p, self.seed) % 4) as usize];
            if self.is_open(side) {
                return Some(side);
            }
        }
        None
    }

    /// Mover that lands on the empty cell `t`: the cell above has first
    /// claim, then the four sideways neighbours in order.
    fn incoming(&self, t: IVec3) -> Option<IVec3> {
        std::iter::once(t + IVec3::Y)
            .chain(LATERAL.iter().map(|d| t - *d))
            .find(|&s| self.target(s) == Some(t))
    }

    /// State of `p` after this tick
    pub fn next(&self, p: IVec3) -> VoxelState {
        let Some(state) = self.cell(p) else {
            return VoxelState::Air;
        };
        match state.phase() {
            Phase::Solid => state,
            Phase::Empty => self
                .incoming(p)
                .and_then(|s| self.cell(s))
                .unwrap_or(VoxelState::Air),
            Phase::Granular | Phase::Fluid => match self.target(p) {
                Some(t) if self.incoming(t) == Some(p) => VoxelState::Air,
                _ => state,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;

    fn column(states: &[VoxelState]) -> (PhysicsWindow, Vec<VoxelState>) {
        // 1x1 column of the given height, bottom first
        let window = PhysicsWindow::centered(Vec3::new(0.5, 0.0, 0.5), 1, states.len() as u32);
        (window, states.to_vec())
    }

    #[test]
    fn test_sand_falls_one_cell() {
        use VoxelState::*;
        let (window, cells) = column(&[Stone, Air, Sand, Air]);
        let snap = Snapshot::new(&window, &cells, 7);
        let next: Vec<_> = (0..4).map(|y| snap.next(IVec3::new(0, y, 0))).collect();
        assert_eq!(next, vec![Stone, Sand, Air, Air]);
    }

    #[test]
    fn test_stack_moves_as_one_wave() {
        use VoxelState::*;
        let (window, cells) = column(&[Air, Sand, Sand]);
        let snap = Snapshot::new(&window, &cells, 0);
        let next: Vec<_> = (0..3).map(|y| snap.next(IVec3::new(0, y, 0))).collect();
        // Only the bottom grain sees an open cell in the previous tick
        assert_eq!(next, vec![Sand, Air, Sand]);
    }

    #[test]
    fn test_window_floor_blocks() {
        use VoxelState::*;
        let (window, cells) = column(&[Water, Air]);
        let snap = Snapshot::new(&window, &cells, 3);
        assert_eq!(snap.next(IVec3::ZERO), Water);
    }

    #[test]
    fn test_water_spreads_sideways() {
        // 3x1x3 floor layer with water in the middle
        let window = PhysicsWindow::centered(Vec3::new(1.5, 0.0, 1.5), 3, 1);
        let mut cells = vec![VoxelState::Air; 9];
        cells[4] = VoxelState::Water;
        let snap = Snapshot::new(&window, &cells, 42);

        let next: Vec<_> = (0..9).map(|i| snap.next(window.position(i))).collect();
        assert_eq!(next[4], VoxelState::Air);
        assert_eq!(next.iter().filter(|&&s| s == VoxelState::Water).count(), 1);
    }

    #[test]
    fn test_contested_cell_takes_one_mover() {
        use VoxelState::*;
        // Sand above an empty cell, water beside it on a stone floor
        let window = PhysicsWindow::centered(Vec3::new(1.0, 0.0, 0.5), 2, 3);
        let mut cells = vec![Air; 6];
        // x fastest, then y: (0,0) (1,0) (0,1) (1,1) (0,2) (1,2)
        cells[1] = Stone;
        cells[3] = Water;
        cells[4] = Sand;
        for seed in 0..16 {
            let snap = Snapshot::new(&window, &cells, seed);
            let next: Vec<_> = (0..6).map(|i| snap.next(window.position(i))).collect();
            let count = |s: VoxelState| next.iter().filter(|&&c| c == s).count();
            assert_eq!(count(Sand), 1, "seed {}", seed);
            assert_eq!(count(Water), 1, "seed {}", seed);
            assert_eq!(count(Stone), 1, "seed {}", seed);
        }
    }
}
