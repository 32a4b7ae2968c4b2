//! World persistence

pub mod world_file;

pub use world_file::{
    list_worlds, load, save, try_list_worlds, world_exists, world_path, LoadOutcome,
    DEFAULT_WORLDS_DIR, WORLD_EXTENSION,
};
