mod commands;
mod input;
mod shutdown;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hourglass_core::{CONFIG_FILE, Config, Difficulty};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hourglass")]
#[command(about = "Encounter timer driven by screen capture")]
struct Args {
    #[arg(short, long, default_value = CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log per-frame detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze captured frames in order, sharing locked displays
    Analyze {
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Print one JSON reading per line
        #[arg(long)]
        json: bool,
    },
    /// Replay a directory of captured frames as a live feed
    Replay {
        dir: PathBuf,

        /// Frames offered per second
        #[arg(long, default_value_t = 10)]
        fps: u32,

        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Estimate the next event from a confirmed one
    Predict {
        /// Countdown (seconds) when the event happened
        #[arg(short, long)]
        time: u32,

        /// HP (%) when the event happened
        #[arg(long)]
        hp: f64,

        /// Countdown shown now; defaults to the event countdown
        #[arg(short, long)]
        now: Option<u32>,

        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("hourglass={level}").parse()?),
        )
        .init();

    let config = Config::load_or_default(&args.config)?;

    match args.command {
        Command::Analyze { images, json } => commands::analyze::run(&images, json),
        Command::Replay {
            dir,
            fps,
            difficulty,
        } => commands::replay::run(&dir, fps, difficulty.unwrap_or(config.difficulty), &config),
        Command::Predict {
            time,
            hp,
            now,
            difficulty,
        } => commands::predict::run(time, hp, now, difficulty.unwrap_or(config.difficulty)),
    }
}
