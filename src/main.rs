//! Pundus - headless voxel world driver
//!
//! Runs the startup menu on the terminal, opens or generates the chosen
//! world, steps the frame loop with the observer hovering over the world
//! centre, and saves the world on exit.
//!
//! Usage: cargo run --release -- [--frames N] [--size VOXELS] [--chunk VOXELS]

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use pundus::core::input::InputState;
use pundus::core::types::Vec3;
use pundus::core::{logging, Settings, WorldConfig};
use pundus::math::Ray;
use pundus::persist::DEFAULT_WORLDS_DIR;
use pundus::session::{Menu, Session};

const SETTINGS_PATH: &str = "settings.json";

fn main() -> ExitCode {
    logging::init();
    log::info!("Pundus starting...");

    let args: Vec<String> = std::env::args().collect();
    let frames = parse_u64_arg(&args, "--frames").unwrap_or(60);
    let defaults = WorldConfig::default();
    let world = WorldConfig {
        axis_size: parse_u32_arg(&args, "--size").unwrap_or(defaults.axis_size),
        pass_res: parse_u32_arg(&args, "--chunk").unwrap_or(defaults.pass_res),
    };

    let settings_path = Path::new(SETTINGS_PATH);
    let mut settings = Settings::load_or_default(settings_path);

    let menu = Menu::new(DEFAULT_WORLDS_DIR);
    let stdin = io::stdin();
    let outcome = match menu.run(&mut stdin.lock(), &mut io::stdout(), &mut settings) {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            log::info!("No world chosen");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            log::error!("Menu failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = settings.save(settings_path) {
        log::warn!("Could not save settings: {}", e);
    }

    let mut session = match Session::open(
        menu.worlds_dir(),
        &outcome.world_name,
        outcome.new_world,
        &world,
        settings,
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Could not open world '{}': {}", outcome.world_name, e);
            return ExitCode::FAILURE;
        }
    };

    let axis = session.store().dims().axis() as f32;
    let observer = Vec3::new(axis * 0.5, axis * 0.75, axis * 0.5);
    let look = Ray::new(observer, Vec3::new(0.3, -1.0, 0.2));
    let mut input = InputState::default();

    let start = Instant::now();
    let mut last_frame = start;
    let mut frame_time = 0.0;
    for _ in 0..frames {
        let report = session.frame(&input, observer, &look);
        input.end_frame();
        let now = Instant::now();
        frame_time = (now - last_frame).as_secs_f64();
        last_frame = now;
        log::debug!("Passes: {:?}", report.passes);
    }
    if frames > 0 {
        log::info!(
            "{} frames in {:.2?}, last frame {:.1} FPS",
            frames,
            start.elapsed(),
            1.0 / frame_time.max(f64::EPSILON)
        );
    }

    if session.close() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
