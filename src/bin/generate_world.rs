//! World generator binary: generates a terrain world and writes its `.pun` file.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --name <NAME>     World name (default: "terrain")
//!   --dir <DIR>       Worlds directory (default: "./Worlds")
//!   --size <VOXELS>   World axis size, power of two (default: 1024)
//!   --chunk <VOXELS>  Occupancy chunk size, power of two (default: 8)
//!   --seed <SEED>     Random seed (default: 12345)
//!   --scale <SCALE>   Terrain noise scale (default: scaled to the world)
//!   --height <H>      Terrain height range (default: scaled to the world)
//!   --sea <Y>         Sea level (default: scaled to the world)
//!   --jobs <N>        Worker threads (default: all cores)

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use pundus::core::WorldConfig;
use pundus::persist;
use pundus::terrain::{TerrainGenerator, TerrainParams};
use pundus::voxel::{OccupancyHierarchy, VoxelStore, WorldDims};

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let defaults = WorldConfig::default();
    let name = parse_str_arg(&args, "--name").unwrap_or_else(|| "terrain".to_string());
    let dir = parse_str_arg(&args, "--dir").unwrap_or_else(|| persist::DEFAULT_WORLDS_DIR.to_string());
    let axis = parse_u32_arg(&args, "--size").unwrap_or(defaults.axis_size);
    let pass_res = parse_u32_arg(&args, "--chunk").unwrap_or(defaults.pass_res);

    let mut params = TerrainParams::for_axis(axis);
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        params.seed = seed;
    }
    if let Some(scale) = parse_f32_arg(&args, "--scale") {
        params.scale = scale;
    }
    if let Some(height) = parse_f32_arg(&args, "--height") {
        params.height_scale = height;
    }
    if let Some(sea) = parse_u32_arg(&args, "--sea") {
        params.sea_level = sea;
    }

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
            log::warn!("Could not limit worker threads to {}: {}", jobs, e);
        }
    }

    let dims = match WorldDims::new(axis, pass_res) {
        Ok(dims) => dims,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let path = persist::world_path(&PathBuf::from(dir), &name);

    println!("=== Pundus World Generator ===");
    println!("World:  {}", name);
    println!("Size:   {}³ voxels, {}³ chunks", axis, pass_res);
    println!("Seed:   {}", params.seed);
    println!("Scale:  {}, Height: {}, Sea: {}", params.scale, params.height_scale, params.sea_level);
    println!("Output: {} ({} bytes)", path.display(), dims.byte_len());
    println!();

    let start = Instant::now();
    let mut store = VoxelStore::new(dims);
    TerrainGenerator::new(params).generate(&mut store);
    let occupancy = OccupancyHierarchy::from_store(&store);
    println!(
        "Generated in {:.2?}: {} solid voxels, {} of {} chunks occupied",
        start.elapsed(),
        store.occupied_count(),
        occupancy.occupied_count(),
        dims.chunk_count()
    );

    match persist::save(&path, &store) {
        Ok(()) => {
            println!("Saved {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to save {}: {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
