//! Rourn Duo Catch headless runner
//!
//! Plays one autopilot-vs-autopilot match at a fixed frame rate and prints
//! the result as JSON. Useful for balance passes on a tuning file.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use rourn_duo_catch::Tuning;
use rourn_duo_catch::autopilot::intent_for;
use rourn_duo_catch::sim::{GameEvent, MatchPhase, MatchState, PlayerSlot, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "rourn-duo-catch")]
#[command(about = "Run a headless autopilot match and print the result as JSON")]
struct Cli {
    /// Match seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON tuning file; omitted fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Frames per second of simulated play
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = Tuning::from_json(&json).with_context(|| format!("invalid tuning in {}", path.display()))?;
    log::info!("Loaded tuning from {}", path.display());
    Ok(tuning)
}

/// Fixed frame step for `fps` frames per second
fn frame_dt(fps: u32) -> Result<f32> {
    if fps == 0 {
        bail!("--fps must be positive");
    }
    Ok(1.0 / fps as f32)
}

fn run(cli: &Cli) -> Result<()> {
    let dt = frame_dt(cli.fps)?;
    let tuning = load_tuning(cli.tuning.as_ref())?;

    let mut state = MatchState::new(cli.seed, tuning);
    state.start();

    let mut frames: u64 = 0;
    while state.phase == MatchPhase::Playing {
        let input = TickInput::with_players(
            intent_for(&state, PlayerSlot::One),
            intent_for(&state, PlayerSlot::Two),
        );
        tick(&mut state, &input, dt);
        frames += 1;

        for event in &state.events {
            match event {
                GameEvent::Transformed { player, form } => {
                    log::debug!("[{:>6.2}s] {:?} -> {:?}", state.elapsed, player, form)
                }
                GameEvent::DifficultyUp { spawn_rate, .. } => {
                    log::debug!("[{:>6.2}s] spawn rate {:.2}/s", state.elapsed, spawn_rate)
                }
                _ => {}
            }
        }
    }
    log::info!("Simulated {} frames", frames);

    let summary = state.summary();
    let out = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dt_follows_fps() {
        assert_eq!(frame_dt(60).unwrap(), 1.0 / 60.0);
        assert_eq!(frame_dt(30).unwrap(), 1.0 / 30.0);
        assert_eq!(frame_dt(1).unwrap(), 1.0);
        assert!(frame_dt(0).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["rourn-duo-catch"]);
        assert_eq!(cli.seed, 1);
        assert_eq!(cli.fps, 60);
        assert!(cli.tuning.is_none());
        assert!(!cli.pretty);
        assert_eq!(frame_dt(cli.fps).unwrap(), 1.0 / 60.0);
    }
}
