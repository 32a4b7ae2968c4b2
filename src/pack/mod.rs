//! Bit packing and prefix-sum compaction indices.

pub mod codec;
pub mod prefix;

pub use codec::{pack, unpack, PackedFields};
pub use prefix::PrefixTable;
