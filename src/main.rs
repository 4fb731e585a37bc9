//! zapbird entry point.
//!
//! A flappy-style arcade game on a small 2D runtime:
//! - **bevy_ecs** stores entity state
//! - a priority frame bus drives update and render phases
//! - **raylib** draws the recorded frames (feature `window`)
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features window
//! cargo run --release -- --headless --autopilot --frames 7200
//! ```

// Do not create console on Windows
#![cfg_attr(all(target_os = "windows", feature = "window"), windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;

use zapbird::host::headless::{Autopilot, run_headless};
use zapbird::host::{build_stage, launch, open_scoreboard};
use zapbird::resources::gameconfig::GameConfig;
use zapbird::resources::presentation::LogPresentation;
use zapbird::resources::texturestore::NullLoader;

/// zapbird
#[derive(Parser)]
#[command(version, about = "Flap between the pipes. Do not touch the wires.")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Simulate without a window and print a JSON summary.
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Let the built-in autopilot play (headless mode).
    #[arg(long)]
    autopilot: bool,

    /// Fixed RNG seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw entity bounds and origins.
    #[arg(long)]
    debug: bool,

    /// Write the effective configuration back to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::load_or_default(&cli.config);
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.debug {
        config.show_bounds = true;
        config.show_origin = true;
    }

    if cli.write_config {
        match config.save_to_file() {
            Ok(()) => println!("configuration written to {}", config.config_path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.headless {
        let mut stage = build_stage(&config, Box::new(NullLoader::default()));
        let scores = open_scoreboard(&config);
        launch(&mut stage, &config, scores, Box::new(LogPresentation));
        let pilot = cli.autopilot.then(Autopilot::default);
        let summary = run_headless(&mut stage, cli.frames, pilot);
        zapbird::game::teardown(&mut stage);
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    run_windowed(&config);
}

#[cfg(feature = "window")]
fn run_windowed(config: &GameConfig) {
    if let Err(e) = zapbird::host::window::run_window(config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "window"))]
fn run_windowed(_config: &GameConfig) {
    eprintln!("built without the `window` feature; use --headless or rebuild with --features window");
    std::process::exit(2);
}
