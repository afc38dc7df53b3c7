//! Bounce Sim entry point
//!
//! Loads settings and tracks, simulates one ball per track and writes the
//! trajectories as JSON for a renderer to play back.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use bounce_sim::settings::SimSettings;
use bounce_sim::tracks::{TrackSim, TrackSims, load_tracks, simulate_tracks};
use bounce_sim::{Planner, Result};

#[derive(Parser)]
#[command(name = "bounce-sim")]
#[command(about = "Simulate balls bouncing to the beat of instrument tracks", long_about = None)]
struct Cli {
    /// Settings JSON file (defaults are used if it doesn't exist)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Track JSON file: an array of {name, instrument, notes: [{time}]}
    #[arg(long)]
    tracks: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run the built-in demo schedule instead of tracks
    #[arg(long, default_value = "false")]
    demo: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => SimSettings::load_or_default(path)?,
        None => SimSettings::default(),
    };
    settings.validate()?;

    let sims = match (&cli.tracks, cli.demo) {
        (Some(path), false) => {
            let tracks = load_tracks(path)?;
            simulate_tracks(&tracks, &settings)?
        }
        _ => {
            log::info!("Running demo schedule");
            let trajectory = Planner::with_settings(&settings)
                .simulate(&settings.ball, &SimSettings::demo_schedule())?;
            let mut sims = TrackSims::new();
            sims.insert(
                "Demo".to_string(),
                TrackSim {
                    ball: settings.ball,
                    trajectory,
                },
            );
            sims
        }
    };

    let json = serde_json::to_string_pretty(&sims)?;
    match &cli.out {
        Some(path) => {
            fs::write(path, json)?;
            log::info!("Wrote {} trajectories to {}", sims.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Bounce Sim starting...");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_input_error() => {
            log::error!("Simulation failed: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("Failed to read input: {}", e);
            ExitCode::FAILURE
        }
    }
}
