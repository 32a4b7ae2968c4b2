//! Per-chunk "has anything but air" summary of the voxel store.
//!
//! One bit per `pass_res³` chunk, stored in Morton chunk order so the bit of
//! chunk `c` lives at `morton_index(c)`. The summary may lag the store between
//! a write and the next rebuild; the session orders passes so nothing queries
//! it inside that gap.

use log::debug;
use rayon::prelude::*;

use super::store::{VoxelStore, WorldDims};
use crate::core::types::UVec3;
use crate::math::{morton_index, Aabb};
use crate::pack::codec::WORD_BITS;
use crate::pack::PrefixTable;
use crate::core::Result;

/// Chunk occupancy bitmask
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyHierarchy {
    dims: WorldDims,
    bits: Vec<u32>,
}

impl OccupancyHierarchy {
    /// Empty summary for a world of the given dimensions
    pub fn new(dims: WorldDims) -> Self {
        Self {
            dims,
            bits: vec![0; dims.chunk_count().div_ceil(WORD_BITS as usize)],
        }
    }

    /// Build a summary that is coherent with `store`
    pub fn from_store(store: &VoxelStore) -> Self {
        let mut occupancy = Self::new(store.dims());
        occupancy.rebuild_full(store);
        occupancy
    }

    /// Recompute every chunk bit. One worker per output word.
    pub fn rebuild_full(&mut self, store: &VoxelStore) {
        let chunk_count = self.dims.chunk_count();
        self.bits.par_iter_mut().enumerate().for_each(|(word, bits)| {
            let first = word * WORD_BITS as usize;
            let last = (first + WORD_BITS as usize).min(chunk_count);
            *bits = (first..last).fold(0u32, |acc, chunk| {
                if store.chunk_is_occupied(chunk) {
                    acc | 1 << (chunk - first)
                } else {
                    acc
                }
            });
        });
        debug!(
            "Occupancy full rebuild: {} of {} chunks occupied",
            self.occupied_count(),
            chunk_count
        );
    }

    /// Recompute the bits of every chunk overlapping `region`.
    ///
    /// Chunks are evaluated in parallel against the store, then committed on
    /// this thread since neighbouring chunks share output words.
    pub fn rebuild_window(&mut self, store: &VoxelStore, region: &Aabb) {
        let Some((min, max)) = self.dims.chunk_range(region) else {
            return;
        };
        let chunks: Vec<UVec3> = (min.z..max.z)
            .flat_map(|z| (min.y..max.y).map(move |y| (y, z)))
            .flat_map(|(y, z)| (min.x..max.x).map(move |x| UVec3::new(x, y, z)))
            .collect();

        let updates: Vec<(usize, bool)> = chunks
            .par_iter()
            .map(|&chunk| {
                let index = morton_index(chunk);
                (index, store.chunk_is_occupied(index))
            })
            .collect();

        for &(index, occupied) in &updates {
            self.set(index, occupied);
        }
        debug!("Occupancy window rebuild: {} chunks", updates.len());
    }

    fn set(&mut self, index: usize, occupied: bool) {
        let word = index / WORD_BITS as usize;
        let mask = 1u32 << (index % WORD_BITS as usize);
        if let Some(bits) = self.bits.get_mut(word) {
            if occupied {
                *bits |= mask;
            } else {
                *bits &= !mask;
            }
        }
    }

    /// Whether the chunk holds any non-air voxel. Chunks outside the world
    /// read as empty.
    pub fn query(&self, chunk: UVec3) -> bool {
        let per_axis = self.dims.chunks_per_axis();
        if chunk.x >= per_axis || chunk.y >= per_axis || chunk.z >= per_axis {
            return false;
        }
        crate::pack::prefix::is_set(&self.bits, morton_index(chunk))
    }

    /// Chunk containing voxel `p`
    pub fn chunk_of(&self, p: UVec3) -> UVec3 {
        p / self.dims.pass_res()
    }

    /// Chunk-level bit-cloud, one bit per chunk in Morton order
    pub fn bit_cloud(&self) -> &[u32] {
        &self.bits
    }

    /// Number of occupied chunks
    pub fn occupied_count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Prefix table over the chunk bit-cloud
    pub fn prefix_table(&self) -> PrefixTable {
        PrefixTable::build(&self.bits)
    }

    /// Dense slot of an occupied chunk among all occupied chunks, for
    /// per-chunk attribute arrays sized to the occupied count.
    pub fn dense_slot(&self, table: &PrefixTable, chunk: UVec3) -> Option<Result<u32>> {
        if !self.query(chunk) {
            return None;
        }
        Some(table.dense_index(&self.bits, morton_index(chunk)))
    }

    pub fn dims(&self) -> WorldDims {
        self.dims
    }
}
