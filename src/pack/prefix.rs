//! Word-granularity prefix sums over a bit-cloud.
//!
//! Entry `i` of the table is the number of set bits in terms `0..=i`. With
//! it, the rank of any set bit among all set bits is one table read plus one
//! masked popcount, which maps sparse occupied cells onto dense slots.

use rayon::prelude::*;

use super::codec::{PackedFields, WORD_BITS};
use crate::core::{Error, Result};

/// Bits needed to store any cumulative count over `terms` terms
pub fn required_width(terms: usize) -> u32 {
    width_for_value(terms as u64 * WORD_BITS as u64)
}

fn width_for_value(max: u64) -> u32 {
    (u64::BITS - max.leading_zeros()).max(1)
}

/// Running set-bit totals, one per term
fn cumulative_counts(bit_cloud: &[u32]) -> Vec<u32> {
    let counts: Vec<u32> = bit_cloud.par_iter().map(|term| term.count_ones()).collect();
    counts
        .into_iter()
        .scan(0u32, |total, count| {
            *total += count;
            Some(*total)
        })
        .collect()
}

/// Packed prefix table for one bit-cloud
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixTable {
    fields: PackedFields,
}

impl PrefixTable {
    /// Build with a field width wide enough for any bit-cloud of this length
    pub fn build(bit_cloud: &[u32]) -> Self {
        let counts = cumulative_counts(bit_cloud);
        Self {
            fields: PackedFields::pack_clamped(&counts, required_width(bit_cloud.len())),
        }
    }

    /// Build with an explicit field width. Fails instead of truncating when
    /// the total does not fit.
    pub fn build_with_width(bit_cloud: &[u32], width: u32) -> Result<Self> {
        let counts = cumulative_counts(bit_cloud);
        let total = counts.last().copied().unwrap_or(0);
        let required = width_for_value(total as u64);
        if width < required {
            return Err(Error::FieldTooNarrow { width, required });
        }
        Ok(Self {
            fields: PackedFields::pack(&counts, width)?,
        })
    }

    /// Cumulative count through term `i`
    pub fn get(&self, i: usize) -> Option<u32> {
        self.fields.get(i)
    }

    /// All cumulative counts
    pub fn unpack(&self) -> Vec<u32> {
        self.fields.unpack()
    }

    /// Set bits in the whole bit-cloud
    pub fn total(&self) -> u32 {
        self.fields
            .len()
            .checked_sub(1)
            .and_then(|last| self.fields.get(last))
            .unwrap_or(0)
    }

    /// Number of terms covered
    pub fn terms(&self) -> usize {
        self.fields.len()
    }

    /// Field width of the packed entries
    pub fn width(&self) -> u32 {
        self.fields.width()
    }

    /// Packed words, as handed to a consumer
    pub fn words(&self) -> &[u32] {
        self.fields.words()
    }

    /// Rank of bit `position` among the set bits of `bit_cloud`.
    ///
    /// For a set bit this is its 0-based dense slot. For a clear bit it is the
    /// slot the bit would take if it were set.
    pub fn dense_index(&self, bit_cloud: &[u32], position: usize) -> Result<u32> {
        let len = bit_cloud.len().min(self.terms()) * WORD_BITS as usize;
        if position >= len {
            return Err(Error::BitOutOfRange { position, len });
        }
        let term = position / WORD_BITS as usize;
        let offset = position % WORD_BITS as usize;

        let before = if term > 0 {
            self.get(term - 1).unwrap_or(0)
        } else {
            0
        };
        let below = (1u32 << offset) - 1;
        Ok(before + (bit_cloud[term] & below).count_ones())
    }
}

/// True if bit `position` of the bit-cloud is set
pub fn is_set(bit_cloud: &[u32], position: usize) -> bool {
    bit_cloud
        .get(position / WORD_BITS as usize)
        .is_some_and(|term| term & (1 << (position % WORD_BITS as usize)) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prefix() {
        let cloud: [u32; 3] = [0x0000_0003, 0xFFFF_FFFF, 0x0000_0000];
        let table = PrefixTable::build(&cloud);
        assert_eq!(table.unpack(), vec![2, 34, 34]);
        assert_eq!(table.total(), 34);
    }

    #[test]
    fn test_monotonic_and_total() {
        let cloud: Vec<u32> = (0..257u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let table = PrefixTable::build(&cloud);
        let prefix = table.unpack();
        assert!(prefix.windows(2).all(|w| w[1] >= w[0]));
        let popcount: u32 = cloud.iter().map(|t| t.count_ones()).sum();
        assert_eq!(*prefix.last().unwrap(), popcount);
    }

    #[test]
    fn test_full_chunk_does_not_truncate() {
        // 32^3 voxels fully set: 32768 needs 16 bits, more than a 10-bit field
        let cloud = vec![u32::MAX; 1024];
        let table = PrefixTable::build(&cloud);
        assert_eq!(table.width(), 16);
        assert_eq!(table.total(), 32768);
        assert!(matches!(
            PrefixTable::build_with_width(&cloud, 10),
            Err(Error::FieldTooNarrow { width: 10, required: 16 })
        ));
    }

    #[test]
    fn test_dense_index() {
        let cloud: [u32; 1] = [0b101];
        let table = PrefixTable::build(&cloud);
        assert_eq!(table.dense_index(&cloud, 0).unwrap(), 0);
        assert_eq!(table.dense_index(&cloud, 2).unwrap(), 1);
    }

    #[test]
    fn test_dense_index_across_terms() {
        let cloud: [u32; 3] = [0x8000_0001, 0, 0b10];
        let table = PrefixTable::build(&cloud);
        assert_eq!(table.dense_index(&cloud, 0).unwrap(), 0);
        assert_eq!(table.dense_index(&cloud, 31).unwrap(), 1);
        assert_eq!(table.dense_index(&cloud, 65).unwrap(), 2);
    }

    #[test]
    fn test_dense_index_out_of_range() {
        let cloud: [u32; 2] = [1, 1];
        let table = PrefixTable::build(&cloud);
        assert!(matches!(
            table.dense_index(&cloud, 64),
            Err(Error::BitOutOfRange { position: 64, len: 64 })
        ));
    }

    #[test]
    fn test_dense_slots_are_a_bijection() {
        let cloud: [u32; 3] = [0xF0F0_1234, 0x0000_0000, 0x8421_8421];
        let table = PrefixTable::build(&cloud);
        let slots: Vec<u32> = (0..96)
            .filter(|&p| is_set(&cloud, p))
            .map(|p| table.dense_index(&cloud, p).unwrap())
            .collect();
        assert_eq!(slots, (0..table.total()).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_cloud() {
        let table = PrefixTable::build(&[]);
        assert_eq!(table.total(), 0);
        assert!(table.dense_index(&[], 0).is_err());
    }
}
