#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays grid snake rounds from scripted input.

mod script;
mod session;
mod text_backend;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake_core::{Event, GameConfig};
use grid_snake_rendering::{Palette, RenderingBackend};
use log::{info, warn};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use crate::{
    script::InputScript,
    session::{RoundSummary, Session},
    text_backend::TextBackend,
};

/// Command-line arguments accepted by the grid snake binary.
#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Deterministic grid snake simulation")]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input script describing key presses, touches and camera changes per frame.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Simulated duration of a single frame in milliseconds.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,

    /// Seed for food placement, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop once this many rounds have ended.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: u32,

    /// Draw every frame as text on standard output.
    #[arg(long)]
    render: bool,

    /// Color rendered frames with ANSI escape sequences.
    #[arg(long, requires = "render")]
    color: bool,

    /// Sleep for the frame duration between rendered frames.
    #[arg(long, requires = "render")]
    pace: bool,

    /// Verbosity of diagnostics written to standard error.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

/// Diagnostic verbosity selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Disable diagnostics.
    Off,
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Round lifecycle messages.
    Info,
    /// Entity lifetimes and food placement.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Entry point for the grid snake command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.log_level.into(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|error| anyhow!("failed to install logger: {error}"))?;

    let summaries = run(&args)?;

    let mut stdout = io::stdout().lock();
    for summary in &summaries {
        writeln!(
            stdout,
            "round {}: {:?} after {} ticks, length {}",
            summary.round, summary.reason, summary.ticks, summary.length
        )?;
    }
    if summaries.is_empty() {
        writeln!(stdout, "no round ended within {} frames", args.frames)?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<Vec<RoundSummary>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.food_seed = seed;
    }
    config.validate().context("invalid configuration")?;

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => InputScript::default(),
    };
    if let Some(last) = script.last_frame() {
        if last >= args.frames {
            warn!(
                "script input after frame {} is never delivered (last scripted frame {last})",
                args.frames
            );
        }
    }

    let dt = Duration::from_millis(args.frame_ms);
    let mut session = Session::new(config);
    let mut backend = TextBackend::new(io::stdout(), Palette::default(), args.color);
    if args.render {
        backend.observe(session.opening_events())?;
        backend.present(&session.scene()?)?;
    }

    let mut summaries = Vec::new();
    let mut eaten = 0_usize;
    for frame in 0..args.frames {
        if let Some(viewport) = script.viewport_for(frame) {
            info!("camera resized at frame {frame}: {viewport:?}");
            session.set_viewport(viewport);
        }

        let report = session.frame(dt, &script.input_for(frame));
        eaten += report
            .events
            .iter()
            .filter(|event| matches!(event, Event::FoodConsumed { .. }))
            .count();

        if args.render {
            backend.observe(&report.events)?;
            backend.present(&session.scene()?)?;
            if args.pace {
                thread::sleep(dt);
            }
        }

        if report.restarted {
            info!("round {} begins", session.round_index() + 1);
        }
        if let Some(summary) = report.finished {
            summaries.push(summary);
            if summaries.len() >= args.rounds as usize {
                break;
            }
        }
    }

    info!(
        "simulation finished: {} rounds ended, {eaten} food items eaten",
        summaries.len()
    );
    Ok(summaries)
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&source)
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

fn load_script(path: &Path) -> Result<InputScript> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read input script {}", path.display()))?;
    InputScript::parse(&source)
        .with_context(|| format!("failed to parse input script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_run_a_single_round() {
        let args = Args::parse_from(["grid-snake"]);
        assert_eq!(args.frames, 600);
        assert_eq!(args.frame_ms, 16);
        assert_eq!(args.rounds, 1);
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.render);
    }

    #[test]
    fn color_requires_rendering() {
        assert!(Args::try_parse_from(["grid-snake", "--color"]).is_err());
        assert!(Args::try_parse_from(["grid-snake", "--render", "--color"]).is_ok());
        assert!(Args::try_parse_from(["grid-snake", "--frame-ms", "0"]).is_err());
    }

    #[test]
    fn unattended_run_ends_at_the_top_edge() {
        let args = Args::parse_from(["grid-snake", "--frames", "400", "--seed", "7"]);
        let summaries = run(&args).expect("simulation runs");

        assert_eq!(summaries.len(), 1);
        let summary = summaries[0];
        assert_eq!(summary.round, 1);
        assert_eq!(summary.reason, grid_snake_core::GameOverReason::OutOfBounds);
        assert!(summary.length >= 4);
    }
}
