//! Fixed-width value packing over 32-bit words.
//!
//! Value `i` occupies bits `i * width .. (i + 1) * width` of a logical
//! bitstream laid over the words, least significant bit first. A value whose
//! range crosses a word boundary keeps its low bits in the current word and
//! spills the remaining high bits into the low bits of the next word.

use crate::core::{Error, Result};

/// Bits in one storage word
pub const WORD_BITS: u32 = 32;

/// Number of words needed to hold `len` values of `width` bits
pub fn packed_len(len: usize, width: u32) -> usize {
    (len * width as usize).div_ceil(WORD_BITS as usize)
}

fn check_width(width: u32) -> Result<()> {
    if width == 0 || width > WORD_BITS {
        return Err(Error::InvalidFieldWidth(width));
    }
    Ok(())
}

#[inline]
fn field_mask(width: u32) -> u64 {
    (1u64 << width) - 1
}

/// Pack `values` at `width` bits each. Values wider than `width` are
/// truncated to their low bits.
pub fn pack(values: &[u32], width: u32) -> Result<Vec<u32>> {
    check_width(width)?;
    Ok(pack_words(values, width))
}

fn pack_words(values: &[u32], width: u32) -> Vec<u32> {
    let mask = field_mask(width);
    let mut words = vec![0u32; packed_len(values.len(), width)];

    for (i, &value) in values.iter().enumerate() {
        let bit = i * width as usize;
        let word = bit / WORD_BITS as usize;
        let offset = (bit % WORD_BITS as usize) as u32;
        let shifted = (value as u64 & mask) << offset;

        words[word] |= shifted as u32;
        let spill = (shifted >> WORD_BITS) as u32;
        if spill != 0 {
            words[word + 1] |= spill;
        }
    }
    words
}

/// Read value `index` from a packed word array
pub fn get(words: &[u32], index: usize, width: u32) -> Option<u32> {
    if width == 0 || width > WORD_BITS {
        return None;
    }
    let bit = index * width as usize;
    let word = bit / WORD_BITS as usize;
    let offset = (bit % WORD_BITS as usize) as u32;

    let mut raw = (*words.get(word)? as u64) >> offset;
    if offset + width > WORD_BITS {
        raw |= (*words.get(word + 1)? as u64) << (WORD_BITS - offset);
    }
    Some((raw & field_mask(width)) as u32)
}

/// Overwrite value `index` in a packed word array, leaving its neighbours
/// untouched. Returns None if the field lies outside `words`.
pub fn set(words: &mut [u32], index: usize, width: u32, value: u32) -> Option<()> {
    if width == 0 || width > WORD_BITS {
        return None;
    }
    let bit = index * width as usize;
    let word = bit / WORD_BITS as usize;
    let offset = (bit % WORD_BITS as usize) as u32;
    let mask = field_mask(width) << offset;
    let shifted = (value as u64 & field_mask(width)) << offset;
    let spills = offset + width > WORD_BITS;
    if word >= words.len() || (spills && word + 1 >= words.len()) {
        return None;
    }

    words[word] = (words[word] & !(mask as u32)) | shifted as u32;
    if spills {
        let high_mask = (mask >> WORD_BITS) as u32;
        words[word + 1] = (words[word + 1] & !high_mask) | (shifted >> WORD_BITS) as u32;
    }
    Some(())
}

/// Unpack `len` values of `width` bits
pub fn unpack(words: &[u32], len: usize, width: u32) -> Result<Vec<u32>> {
    check_width(width)?;
    (0..len)
        .map(|i| {
            get(words, i, width).ok_or(Error::BitOutOfRange {
                position: (i + 1) * width as usize,
                len: words.len() * WORD_BITS as usize,
            })
        })
        .collect()
}

/// A packed array that remembers its length and field width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedFields {
    words: Vec<u32>,
    len: usize,
    width: u32,
}

impl PackedFields {
    /// Pack values at the given width
    pub fn pack(values: &[u32], width: u32) -> Result<Self> {
        Ok(Self {
            words: pack(values, width)?,
            len: values.len(),
            width,
        })
    }

    /// Pack values, clamping the width into `1..=32`
    pub fn pack_clamped(values: &[u32], width: u32) -> Self {
        let width = width.clamp(1, WORD_BITS);
        Self {
            words: pack_words(values, width),
            len: values.len(),
            width,
        }
    }

    /// Value at `index`, or None past the end
    pub fn get(&self, index: usize) -> Option<u32> {
        if index >= self.len {
            return None;
        }
        get(&self.words, index, self.width)
    }

    /// All values in order
    pub fn unpack(&self) -> Vec<u32> {
        (0..self.len).filter_map(|i| self.get(i)).collect()
    }

    /// Backing words, as handed to a consumer
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(3, 10), 1);
        assert_eq!(packed_len(4, 10), 2);
        assert_eq!(packed_len(1024, 10), 320);
        assert_eq!(packed_len(0, 7), 0);
    }

    #[test]
    fn test_spill_across_word_boundary() {
        // Fourth 10-bit value lives at bits 30..40: two bits low, eight spilled
        let values = [1, 2, 3, 0x3FF];
        let words = pack(&values, 10).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0] >> 30, 0b11);
        assert_eq!(words[1], 0xFF);
        assert_eq!(unpack(&words, 4, 10).unwrap(), values);
    }

    #[test]
    fn test_roundtrip_odd_widths() {
        for width in [1, 3, 7, 13, 17, 31, 32] {
            let max = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
            let values: Vec<u32> = (0..100u32)
                .map(|i| i.wrapping_mul(2654435761) & max)
                .collect();
            let words = pack(&values, width).unwrap();
            assert_eq!(words.len(), packed_len(values.len(), width));
            assert_eq!(unpack(&words, values.len(), width).unwrap(), values, "width {}", width);
        }
    }

    #[test]
    fn test_oversized_values_truncate() {
        let words = pack(&[1024, 1025], 10).unwrap();
        assert_eq!(unpack(&words, 2, 10).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_invalid_width() {
        assert!(matches!(pack(&[1], 0), Err(Error::InvalidFieldWidth(0))));
        assert!(matches!(pack(&[1], 33), Err(Error::InvalidFieldWidth(33))));
        assert!(get(&[0], 0, 0).is_none());
    }

    #[test]
    fn test_unpack_past_end_is_error() {
        let words = pack(&[5, 6], 16).unwrap();
        assert!(matches!(unpack(&words, 3, 16), Err(Error::BitOutOfRange { .. })));
    }

    #[test]
    fn test_set_preserves_neighbours() {
        let mut words = pack(&[0x3FF, 0x3FF, 0x3FF, 0x3FF], 10).unwrap();
        set(&mut words, 3, 10, 0x155).unwrap();
        set(&mut words, 1, 10, 0).unwrap();
        assert_eq!(unpack(&words, 4, 10).unwrap(), vec![0x3FF, 0, 0x3FF, 0x155]);
        assert!(set(&mut words, 7, 10, 1).is_none());
    }

    #[test]
    fn test_packed_fields() {
        let fields = PackedFields::pack(&[9, 8, 7], 5).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get(1), Some(8));
        assert_eq!(fields.get(3), None);
        assert_eq!(fields.unpack(), vec![9, 8, 7]);
    }
}
