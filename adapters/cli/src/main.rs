#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that stages and runs a Follower Brawl battle.

mod roster;
mod settings;
mod trace;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use brawl_core::Preset;
use brawl_simulation::{RunSummary, Simulation};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::{
    roster::Roster,
    settings::Overrides,
    trace::TraceWriter,
};

/// Command-line arguments for a battle run.
#[derive(Debug, Parser)]
#[command(name = "brawl", version, about = "Battle-royale simulation between followers")]
struct Cli {
    /// Number of participants; also caps a roster file.
    #[arg(long)]
    participants: Option<usize>,
    /// File with one participant identifier per line.
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,
    /// Named battle size (quick, normal, epic, ultra).
    #[arg(long)]
    preset: Option<Preset>,
    /// TOML file with battle parameters; missing keys take defaults.
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    config: Option<PathBuf>,
    /// Starting hit points of every agent.
    #[arg(long)]
    hp_default: Option<f32>,
    /// Base contact damage.
    #[arg(long)]
    damage_base: Option<f32>,
    /// Frames per simulated second.
    #[arg(long)]
    fps: Option<u32>,
    /// Battle length in simulated seconds.
    #[arg(long)]
    duration: Option<u32>,
    /// Explicit frame budget, overriding fps times duration.
    #[arg(long)]
    max_frames: Option<u32>,
    /// Seed for staging the arena.
    #[arg(long)]
    seed: Option<u64>,
    /// Streams every frame to FILE as JSON lines.
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,
    /// Prints the outcome as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            hp_default: self.hp_default,
            damage_base: self.damage_base,
            fps: self.fps,
            duration: self.duration,
            max_frames: self.max_frames,
            seed: self.seed,
        }
    }
}

/// Outcome printed by `--json`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    winner_name: Option<&'a str>,
    #[serde(flatten)]
    summary: RunSummary,
}

/// Entry point for the Follower Brawl command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = settings::resolve(cli.preset, cli.config.as_deref(), cli.overrides())?;
    let cap = settings::participant_cap(cli.participants, cli.preset);
    let roster = match cli.roster.as_deref() {
        Some(path) => Roster::load(path, cap)?,
        None => Roster::demo(cap),
    };
    tracing::info!(
        participants = roster.len(),
        preset = ?cli.preset,
        seed = config.seed,
        "roster ready"
    );

    let mut simulation =
        Simulation::new(roster.len(), config).context("failed to stage the battle")?;

    match cli.trace.as_deref() {
        Some(path) => {
            let mut writer = TraceWriter::create(path)?;
            simulation.try_run_with(|snapshot| writer.write(&snapshot))?;
            let frames = writer.finish()?;
            tracing::info!(frames, path = %path.display(), "trace written");
        }
        None => simulation.run_with(|_| {}),
    }

    let summary = simulation.summary();
    let winner_name = summary.winner.and_then(|winner| roster.name(winner.agent));

    if cli.json {
        let report = Report {
            winner_name,
            summary,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
        return Ok(());
    }

    print_summary(&summary, winner_name);
    Ok(())
}

fn print_summary(summary: &RunSummary, winner_name: Option<&str>) {
    println!("Battle finished after {} frames", summary.frames);
    println!(
        "Participants: {}  Survivors: {}  Eliminations: {} ({} credited)",
        summary.participants, summary.survivors, summary.eliminations, summary.credited_kills
    );
    println!("Growth pulses: {}", summary.growth_pulses);

    match summary.winner {
        Some(winner) => println!(
            "Winner: {} (#{}) with {} kills, radius {:.1} ({:.1}x)",
            winner_name.unwrap_or("unknown"),
            winner.agent.get(),
            winner.kills,
            winner.final_radius,
            winner.size_multiplier
        ),
        None => println!("No participants, no winner"),
    }
}
