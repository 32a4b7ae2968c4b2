//! Error types for the Pundus voxel core

use thiserror::Error;

/// Main error type for the voxel core
#[derive(Debug, Error)]
pub enum Error {
    #[error("voxel ({x}, {y}, {z}) is outside a world of axis {axis}")]
    OutOfRange { x: i64, y: i64, z: i64, axis: u32 },

    #[error("bit position {position} is outside a bit-cloud of {len} bits")]
    BitOutOfRange { position: usize, len: usize },

    #[error("field width {0} is not in 1..=32")]
    InvalidFieldWidth(u32),

    #[error("field width {width} cannot hold prefix totals needing {required} bits")]
    FieldTooNarrow { width: u32, required: u32 },

    #[error("invalid world dimensions: {0}")]
    InvalidDimensions(String),

    #[error("invalid value {value:?} for setting '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("cannot access worlds directory: {0}")]
    DirectoryAccess(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file error: {0}")]
    Settings(#[from] serde_json::Error),
}
