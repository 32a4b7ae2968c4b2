//! Dense packed voxel grid, the source of truth for the world.
//!
//! Voxels are laid out in Morton order at [`VOXEL_BITS`] bits each over a
//! flat `u32` buffer. Because every aligned `pass_res³` chunk is one
//! contiguous run of words, writer passes split the buffer per chunk and
//! hand each rayon worker a disjoint slice.

use rayon::prelude::*;

use super::voxel::{VoxelState, VOXEL_BITS, VOXELS_PER_WORD};
use crate::core::config::WorldConfig;
use crate::core::types::{IVec3, UVec3};
use crate::core::{Error, Result};
use crate::math::{morton_index, morton_position, Aabb};
use crate::pack::codec;

/// Largest supported world axis
pub const MAX_AXIS_SIZE: u32 = 2048;

/// Smallest chunk edge whose voxels fill whole bit-cloud terms
pub const MIN_PASS_RES: u32 = 4;

/// Regions smaller than this are written on the calling thread
const PARALLEL_WRITE_THRESHOLD: u64 = 32 * 32 * 32;

/// Validated world and chunk dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldDims {
    axis: u32,
    pass_res: u32,
}

impl WorldDims {
    /// Validate an axis size and chunk edge (both powers of two)
    pub fn new(axis: u32, pass_res: u32) -> Result<Self> {
        if !axis.is_power_of_two() || axis > MAX_AXIS_SIZE {
            return Err(Error::InvalidDimensions(format!(
                "axis size {} must be a power of two no larger than {}",
                axis, MAX_AXIS_SIZE
            )));
        }
        if !pass_res.is_power_of_two() || pass_res < MIN_PASS_RES || pass_res > axis {
            return Err(Error::InvalidDimensions(format!(
                "chunk size {} must be a power of two in {}..={}",
                pass_res, MIN_PASS_RES, axis
            )));
        }
        Ok(Self { axis, pass_res })
    }

    /// Validate dimensions from configuration
    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        Self::new(config.axis_size, config.pass_res)
    }

    /// Voxels per world axis
    pub fn axis(&self) -> u32 {
        self.axis
    }

    /// Voxels per chunk axis
    pub fn pass_res(&self) -> u32 {
        self.pass_res
    }

    /// Chunks per world axis
    pub fn chunks_per_axis(&self) -> u32 {
        self.axis / self.pass_res
    }

    pub fn voxel_count(&self) -> usize {
        (self.axis as usize).pow(3)
    }

    pub fn chunk_count(&self) -> usize {
        (self.chunks_per_axis() as usize).pow(3)
    }

    pub fn voxels_per_chunk(&self) -> usize {
        (self.pass_res as usize).pow(3)
    }

    /// Backing words for the whole world
    pub fn word_count(&self) -> usize {
        self.voxel_count().div_ceil(VOXELS_PER_WORD)
    }

    pub fn words_per_chunk(&self) -> usize {
        self.voxels_per_chunk() / VOXELS_PER_WORD
    }

    /// Size in bytes of the raw world dump
    pub fn byte_len(&self) -> usize {
        self.word_count() * std::mem::size_of::<u32>()
    }

    /// Box covering the whole world
    pub fn bounds(&self) -> Aabb {
        Aabb::world(self.axis)
    }

    /// Check if a voxel coordinate lies inside the world
    pub fn contains(&self, p: IVec3) -> bool {
        self.bounds().contains(p)
    }

    /// Voxel-space box of a chunk
    pub fn chunk_bounds(&self, chunk: UVec3) -> Aabb {
        let min = (chunk * self.pass_res).as_ivec3();
        Aabb::new(min, min + IVec3::splat(self.pass_res as i32))
    }

    /// Chunk coordinate range (min inclusive, max exclusive) overlapping a box
    pub fn chunk_range(&self, region: &Aabb) -> Option<(UVec3, UVec3)> {
        let region = region.clamped(self.axis);
        if region.is_empty() {
            return None;
        }
        let res = self.pass_res as i32;
        let min = (region.min / res).as_uvec3();
        let max = ((region.max + IVec3::splat(res - 1)) / res).as_uvec3();
        Some((min, max))
    }
}

impl Default for WorldDims {
    fn default() -> Self {
        let config = WorldConfig::default();
        Self {
            axis: config.axis_size,
            pass_res: config.pass_res,
        }
    }
}

/// Read one voxel from a word slice at a local Morton index
#[inline]
fn load(words: &[u32], index: usize) -> VoxelState {
    codec::get(words, index, VOXEL_BITS)
        .map(|bits| VoxelState::from_bits(bits as u8))
        .unwrap_or_default()
}

/// Write one voxel into a word slice at a local Morton index
#[inline]
fn store(words: &mut [u32], index: usize, state: VoxelState) {
    let written = codec::set(words, index, VOXEL_BITS, state.bits() as u32);
    debug_assert!(written.is_some(), "voxel {} outside its slice", index);
}

/// Dense packed voxel grid
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelStore {
    dims: WorldDims,
    words: Vec<u32>,
}

impl std::fmt::Debug for VoxelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelStore")
            .field("dims", &self.dims)
            .field("words", &self.words.len())
            .finish()
    }
}

impl VoxelStore {
    /// Allocate an all-air world
    pub fn new(dims: WorldDims) -> Self {
        Self {
            dims,
            words: vec![0; dims.word_count()],
        }
    }

    pub fn dims(&self) -> WorldDims {
        self.dims
    }

    /// State of the voxel at `p`
    pub fn read(&self, p: IVec3) -> Result<VoxelState> {
        if !self.dims.contains(p) {
            return Err(Error::OutOfRange {
                x: p.x as i64,
                y: p.y as i64,
                z: p.z as i64,
                axis: self.dims.axis,
            });
        }
        Ok(self.get(p.as_uvec3()))
    }

    /// State of an in-bounds voxel
    #[inline]
    pub(crate) fn get(&self, p: UVec3) -> VoxelState {
        load(&self.words, morton_index(p))
    }

    /// Apply `f` to every voxel of `region` after clamping it to the world.
    ///
    /// Returns the clamped box that was written; an empty box means nothing
    /// was touched. Large regions are written in parallel, one worker per
    /// chunk slice.
    pub fn write_region<F>(&mut self, region: &Aabb, f: F) -> Aabb
    where
        F: Fn(UVec3) -> VoxelState + Sync,
    {
        let region = region.clamped(self.dims.axis);
        if region.is_empty() {
            return region;
        }

        if region.volume() < PARALLEL_WRITE_THRESHOLD {
            for p in region.iter() {
                let p = p.as_uvec3();
                store(&mut self.words, morton_index(p), f(p));
            }
            return region;
        }

        let dims = self.dims;
        let voxels_per_chunk = dims.voxels_per_chunk();
        self.words
            .par_chunks_mut(dims.words_per_chunk())
            .enumerate()
            .for_each(|(chunk_index, words)| {
                let chunk = morton_position(chunk_index);
                let overlap = dims.chunk_bounds(chunk).intersection(&region);
                if overlap.is_empty() {
                    return;
                }
                let base = chunk_index * voxels_per_chunk;
                for p in overlap.iter() {
                    let p = p.as_uvec3();
                    store(words, morton_index(p) - base, f(p));
                }
            });
        region
    }

    /// Copy the states of a box into a dense x-fastest buffer
    pub fn snapshot(&self, region: &Aabb) -> Vec<VoxelState> {
        let region = region.clamped(self.dims.axis);
        let size = region.size();
        let slab = (size.x * size.y) as usize;
        let mut out = vec![VoxelState::Air; region.volume() as usize];
        if out.is_empty() {
            return out;
        }
        out.par_chunks_mut(slab).enumerate().for_each(|(dz, slab)| {
            let z = region.min.z as u32 + dz as u32;
            for (i, cell) in slab.iter_mut().enumerate() {
                let x = region.min.x as u32 + (i as u32 % size.x);
                let y = region.min.y as u32 + (i as u32 / size.x);
                *cell = self.get(UVec3::new(x, y, z));
            }
        });
        out
    }

    /// Morton index of a chunk, also its slot in chunk-ordered buffers
    pub fn chunk_index(&self, chunk: UVec3) -> usize {
        morton_index(chunk)
    }

    /// Words holding one chunk
    pub fn chunk_words(&self, chunk_index: usize) -> &[u32] {
        let len = self.dims.words_per_chunk();
        let start = (chunk_index * len).min(self.words.len());
        &self.words[start..(start + len).min(self.words.len())]
    }

    /// True if any voxel of the chunk is not air
    pub fn chunk_is_occupied(&self, chunk_index: usize) -> bool {
        // Air encodes as zero, so one nonzero word settles it
        self.chunk_words(chunk_index).iter().any(|&w| w != 0)
    }

    /// Occupancy bitmask of one chunk: bit `i` is set when the chunk's
    /// `i`-th voxel in Morton order is not air. Terms are 32 voxels each.
    pub fn chunk_bit_cloud(&self, chunk: UVec3) -> Option<Vec<u32>> {
        if chunk.cmpge(UVec3::splat(self.dims.chunks_per_axis())).any() {
            return None;
        }
        let words = self.chunk_words(self.chunk_index(chunk));
        let terms = self.dims.voxels_per_chunk() / u32::BITS as usize;
        let cloud = (0..terms)
            .map(|t| {
                (0..u32::BITS as usize).fold(0u32, |term, bit| {
                    if load(words, t * u32::BITS as usize + bit).is_air() {
                        term
                    } else {
                        term | (1 << bit)
                    }
                })
            })
            .collect();
        Some(cloud)
    }

    /// Number of voxels that are not air
    pub fn occupied_count(&self) -> u64 {
        self.words
            .par_iter()
            .map(|&w| w.to_le_bytes().iter().filter(|&&b| b != 0).count() as u64)
            .sum()
    }

    /// Backing words
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Backing words as raw bytes, as written to disk
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Mutable raw bytes, used when loading a dump
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.words)
    }
}
