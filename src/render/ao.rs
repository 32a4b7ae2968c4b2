//! Precomputed ambient-occlusion sample table.
//!
//! The table is handed to the shading stage as a sample count followed by
//! the samples themselves, each laid out as [`AoSample`] (four 32-bit
//! fields, 16 bytes). Samples are ordered nearest first so a consumer can
//! stop early.

use bytemuck::{Pod, Zeroable};
use log::warn;

/// Most samples the table holds
pub const AO_CAPACITY: usize = 4096;

/// Lattice steps per axis whose hemisphere already holds more than
/// [`AO_CAPACITY`] samples. Offsets further out can never be kept.
const MAX_RADIUS_STEPS: i64 = 16;

/// One hemisphere sample offset (must match the consumer's struct)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct AoSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Squared distance from the shaded voxel
    pub dist_sq: u32,
}

/// Hemisphere offsets above a shaded voxel (+Y is the surface normal)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AoTable {
    diameter: u32,
    stride: u32,
    samples: Vec<AoSample>,
}

impl AoTable {
    /// Enumerate lattice offsets inside the upper hemisphere of the given
    /// diameter, taking every `stride`-th offset per axis. A stride of zero
    /// is treated as one. Offsets whose squared distance does not fit the
    /// 32-bit field are left out.
    pub fn build(diameter: u32, stride: u32) -> Self {
        let stride = stride.max(1);
        let step = stride as i64;
        // Beyond this any squared distance overflows the sample field
        let reach = (diameter as i64 / 2).min(u16::MAX as i64);
        let mut limit = (diameter as i64 * diameter as i64 / 4).min(u32::MAX as i64);
        let mut steps = reach / step;
        if steps > MAX_RADIUS_STEPS {
            steps = MAX_RADIUS_STEPS;
            limit = limit.min((steps * step) * (steps * step));
        }

        let mut samples = Vec::new();
        for ky in 0..=steps {
            for kz in -steps..=steps {
                for kx in -steps..=steps {
                    let (x, y, z) = (kx * step, ky * step, kz * step);
                    let dist_sq = x * x + y * y + z * z;
                    if dist_sq == 0 || dist_sq > limit {
                        continue;
                    }
                    samples.push(AoSample {
                        x: x as i32,
                        y: y as i32,
                        z: z as i32,
                        dist_sq: dist_sq as u32,
                    });
                }
            }
        }
        // Stable, so ties keep enumeration order
        samples.sort_by_key(|s| s.dist_sq);
        if samples.len() > AO_CAPACITY {
            warn!(
                "AO table for diameter {} stride {} has {} samples, keeping nearest {}",
                diameter,
                stride,
                samples.len(),
                AO_CAPACITY
            );
            samples.truncate(AO_CAPACITY);
        }

        Self { diameter, stride, samples }
    }

    /// Rebuild if the parameters differ. Returns true if rebuilt.
    pub fn rebuild_if_changed(&mut self, diameter: u32, stride: u32) -> bool {
        if self.diameter == diameter && self.stride == stride.max(1) {
            return false;
        }
        *self = Self::build(diameter, stride);
        true
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of samples
    pub fn count(&self) -> u32 {
        self.samples.len() as u32
    }

    pub fn samples(&self) -> &[AoSample] {
        &self.samples
    }

    /// Samples as raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }
}
