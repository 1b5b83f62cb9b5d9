//! Tunnel Runner headless entry point
//!
//! Runs the simulation without a renderer: the autopilot plays, events are
//! printed as JSON lines, and the final snapshot is written to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tunnel_runner::config::SessionConfig;
use tunnel_runner::consts::FRAME_DT;
use tunnel_runner::sim::{GameEvent, GamePhase, GameSession, TickInput, tick};

#[derive(Debug, Parser)]
#[command(version, about = "Run the tunnel runner simulation headless")]
struct Args {
    /// JSON config file (tunnel, physics, seed)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Layout seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,
    /// Frame time in seconds (rotation easing only)
    #[arg(long, default_value_t = FRAME_DT)]
    dt: f32,
    /// Print every event as a JSON line
    #[arg(long)]
    events: bool,
    /// Play again after losing instead of stopping
    #[arg(long)]
    endless: bool,
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match SessionConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SessionConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut session = match GameSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Tunnel Runner (headless) starting, {} frames", args.ticks);

    let mut runs = 1u32;
    let mut best_score = 0u64;
    for frame in 0..args.ticks {
        let input = TickInput {
            play: frame == 0 || (args.endless && session.phase == GamePhase::Lost),
            idle_mode: true,
            ..Default::default()
        };
        let was_lost = session.phase == GamePhase::Lost;
        tick(&mut session, &input, args.dt);
        if was_lost && session.phase == GamePhase::Playing {
            runs += 1;
        }

        for event in session.drain_events() {
            if let GameEvent::Lost { final_score } = event {
                best_score = best_score.max(final_score);
            }
            if args.events {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => log::warn!("Could not serialize event: {}", e),
                }
            }
        }

        if session.phase == GamePhase::Lost && !args.endless {
            break;
        }
    }

    best_score = best_score.max(session.score);
    log::info!("Finished after {} run(s), best score {}", runs, best_score);

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Could not serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
