//! World files: a raw dump of the store's backing words.
//!
//! No header, version or checksum. The file length is fixed by the world
//! dimensions, so a file can only be read back into a store of the same
//! size.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};

use crate::core::{Error, Result};
use crate::voxel::{VoxelStore, WorldDims};

/// Directory worlds are kept in unless told otherwise
pub const DEFAULT_WORLDS_DIR: &str = "./Worlds";

/// World file extension
pub const WORLD_EXTENSION: &str = "pun";

/// How much of the store a load filled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Complete,
    /// The file was short; bytes past `read` kept their initial (air) value
    Truncated { read: usize, expected: usize },
}

/// Get the file path for a named world
pub fn world_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, WORLD_EXTENSION))
}

/// Check if a named world exists on disk
pub fn world_exists(dir: &Path, name: &str) -> bool {
    world_path(dir, name).is_file()
}

/// Write the store to `path`, creating the parent directory if needed
pub fn save(path: &Path, store: &VoxelStore) -> Result<()> {
    let start = Instant::now();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(store.as_bytes())?;
    file.flush()?;
    info!(
        "Saved world to {} ({} bytes in {:.2?})",
        path.display(),
        store.as_bytes().len(),
        start.elapsed()
    );
    Ok(())
}

/// Read a world file into a fresh store of the given dimensions.
///
/// Reads at most the store's byte length. A shorter file is not an error:
/// the rest of the store stays air and the outcome reports the shortfall.
pub fn load(path: &Path, dims: WorldDims) -> Result<(VoxelStore, LoadOutcome)> {
    let start = Instant::now();
    let mut store = VoxelStore::new(dims);
    let mut file = File::open(path)?;

    let buf = store.as_bytes_mut();
    let expected = buf.len();
    let mut read = 0;
    while read < expected {
        match file.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let outcome = if read < expected {
        warn!(
            "World file {} is truncated: {} of {} bytes, remainder left empty",
            path.display(),
            read,
            expected
        );
        LoadOutcome::Truncated { read, expected }
    } else {
        LoadOutcome::Complete
    };
    info!("Loaded world from {} in {:.2?}", path.display(), start.elapsed());
    Ok((store, outcome))
}

/// Names of the worlds in `dir`, sorted
pub fn try_list_worlds(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(Error::DirectoryAccess)? {
        let entry = entry.map_err(Error::DirectoryAccess)?;
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file || path.extension().and_then(|e| e.to_str()) != Some(WORLD_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Names of the worlds in `dir`, or none if the directory cannot be read
pub fn list_worlds(dir: &Path) -> Vec<String> {
    match try_list_worlds(dir) {
        Ok(names) => names,
        Err(e) => {
            warn!("Listing worlds in {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
