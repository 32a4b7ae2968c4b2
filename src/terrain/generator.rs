//! Noise-based procedural terrain generation

use std::time::Instant;

use log::info;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::types::UVec3;
use crate::voxel::{VoxelState, VoxelStore};

/// Maps a voxel coordinate to its generated state
pub trait TerrainRule: Sync {
    fn evaluate(&self, p: UVec3) -> VoxelState;
}

impl<F> TerrainRule for F
where
    F: Fn(UVec3) -> VoxelState + Sync,
{
    fn evaluate(&self, p: UVec3) -> VoxelState {
        self(p)
    }
}

/// Fill the whole store from a terrain rule
pub fn fill<R: TerrainRule + ?Sized>(store: &mut VoxelStore, rule: &R) {
    let start = Instant::now();
    let bounds = store.dims().bounds();
    store.write_region(&bounds, |p| rule.evaluate(p));
    info!(
        "Generated {}³ world in {:.2?} ({} solid voxels)",
        store.dims().axis(),
        start.elapsed(),
        store.occupied_count()
    );
}

/// Parameters controlling terrain generation. Heights are in voxels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f32,        // Horizontal scale (larger = smoother)
    pub base_height: f32,  // Height of the lowest valleys
    pub height_scale: f32, // Vertical range above the base
    pub octaves: u32,      // FBM octaves (detail levels)
    pub persistence: f32,  // FBM persistence (0.5 typical)
    pub lacunarity: f32,   // FBM lacunarity (2.0 typical)
    pub sea_level: u32,    // Columns are flooded up to this height
    pub dirt_depth: u32,   // Dirt layer between stone and the surface
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 200.0,
            base_height: 192.0,
            height_scale: 256.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 288,
            dirt_depth: 4,
        }
    }
}

impl TerrainParams {
    /// Defaults scaled to a world of `axis` voxels (defaults target 1024)
    pub fn for_axis(axis: u32) -> Self {
        let defaults = Self::default();
        let k = axis as f32 / 1024.0;
        Self {
            scale: (defaults.scale * k).max(1.0),
            base_height: defaults.base_height * k,
            height_scale: defaults.height_scale * k,
            sea_level: (defaults.sea_level as f32 * k) as u32,
            dirt_depth: ((defaults.dirt_depth as f32 * k).ceil() as u32).max(1),
            ..defaults
        }
    }
}

/// Procedural terrain generator using fractal Brownian motion (FBM)
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
}

impl TerrainGenerator {
    /// Create a new terrain generator with the given parameters
    pub fn new(params: TerrainParams) -> Self {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves as usize)
            .set_persistence(params.persistence as f64)
            .set_lacunarity(params.lacunarity as f64);

        Self { params, noise }
    }

    /// Get terrain parameters
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Get terrain height at column (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = (x / self.params.scale) as f64;
        let nz = (z / self.params.scale) as f64;

        // Noise value in [-1, 1] mapped to [0, 1]
        let normalized = ((self.noise.get([nx, nz]) + 1.0) / 2.0).clamp(0.0, 1.0);
        self.params.base_height + (normalized * self.params.height_scale as f64) as f32
    }

    /// Sample every column of a world of `axis` voxels in parallel
    pub fn heightmap(&self, axis: u32) -> Heightmap {
        let heights = (0..(axis as usize * axis as usize))
            .into_par_iter()
            .map(|i| {
                let x = (i % axis as usize) as f32;
                let z = (i / axis as usize) as f32;
                (self.height_at(x + 0.5, z + 0.5).round() as u32).clamp(1, axis)
            })
            .collect();
        Heightmap {
            axis,
            heights,
            sea_level: self.params.sea_level.min(axis),
            dirt_depth: self.params.dirt_depth,
        }
    }

    /// Generate terrain into `store`
    pub fn generate(&self, store: &mut VoxelStore) {
        let heightmap = self.heightmap(store.dims().axis());
        fill(store, &heightmap);
    }
}

/// Column heights of a generated world
#[derive(Clone, Debug)]
pub struct Heightmap {
    axis: u32,
    heights: Vec<u32>,
    sea_level: u32,
    dirt_depth: u32,
}

impl Heightmap {
    /// Number of solid voxels in column (x, z)
    pub fn height(&self, x: u32, z: u32) -> u32 {
        self.heights
            .get((z * self.axis + x) as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn sea_level(&self) -> u32 {
        self.sea_level
    }
}

impl TerrainRule for Heightmap {
    /// Stone, then dirt, then a grass cap (sand at or below the waterline),
    /// with water filling the column up to sea level.
    fn evaluate(&self, p: UVec3) -> VoxelState {
        let height = self.height(p.x, p.z);
        if p.y >= height {
            return if p.y < self.sea_level {
                VoxelState::Water
            } else {
                VoxelState::Air
            };
        }
        let depth = height - 1 - p.y;
        if depth == 0 {
            if height <= self.sea_level {
                VoxelState::Sand
            } else {
                VoxelState::Grass
            }
        } else if depth <= self.dirt_depth {
            VoxelState::Dirt
        } else {
            VoxelState::Stone
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::voxel::WorldDims;

    #[test]
    fn test_terrain_params_default() {
        let params = TerrainParams::default();
        assert_eq!(params.seed, 12345);
        assert_eq!(params.octaves, 4);
        assert_eq!(params.persistence, 0.5);
        assert_eq!(params.lacunarity, 2.0);
        assert!(params.base_height + params.height_scale < 1024.0);
    }

    #[test]
    fn test_params_for_small_axis() {
        let params = TerrainParams::for_axis(64);
        assert_eq!(params.base_height, 12.0);
        assert_eq!(params.sea_level, 18);
        assert_eq!(params.dirt_depth, 1);
    }

    #[test]
    fn test_heights_in_range() {
        let generator = TerrainGenerator::new(TerrainParams::for_axis(32));
        let map = generator.heightmap(32);
        for z in 0..32 {
            for x in 0..32 {
                let h = map.height(x, z);
                assert!((1..=32).contains(&h));
            }
        }
    }

    #[test]
    fn test_column_layers() {
        let map = Heightmap {
            axis: 1,
            heights: vec![10],
            sea_level: 12,
            dirt_depth: 2,
        };
        let column: Vec<VoxelState> = (0..14).map(|y| map.evaluate(UVec3::new(0, y, 0))).collect();
        assert_eq!(&column[..7], &[VoxelState::Stone; 7]);
        assert_eq!(&column[7..9], &[VoxelState::Dirt; 2]);
        assert_eq!(column[9], VoxelState::Sand);
        assert_eq!(&column[10..12], &[VoxelState::Water; 2]);
        assert_eq!(&column[12..], &[VoxelState::Air; 2]);
    }

    #[test]
    fn test_grass_above_sea() {
        let map = Heightmap {
            axis: 1,
            heights: vec![10],
            sea_level: 4,
            dirt_depth: 2,
        };
        assert_eq!(map.evaluate(UVec3::new(0, 9, 0)), VoxelState::Grass);
        assert_eq!(map.evaluate(UVec3::new(0, 10, 0)), VoxelState::Air);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let dims = WorldDims::new(32, 8).unwrap();
        let generator = TerrainGenerator::new(TerrainParams::for_axis(32));
        let mut a = VoxelStore::new(dims);
        let mut b = VoxelStore::new(dims);
        generator.generate(&mut a);
        generator.generate(&mut b);
        assert_eq!(a, b);
        // Bottom layer is always solid
        assert!(!a.read(IVec3::new(5, 0, 5)).unwrap().is_air());
    }

    #[test]
    fn test_fill_with_closure() {
        let mut store = VoxelStore::new(WorldDims::new(16, 4).unwrap());
        fill(&mut store, &|p: UVec3| if p.y < 3 { VoxelState::Stone } else { VoxelState::Air });
        assert_eq!(store.occupied_count(), 16 * 16 * 3);
    }
}
