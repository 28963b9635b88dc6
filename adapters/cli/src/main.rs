#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Node Defense session.

mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use node_defense_core::{
    EngineConfig, MapView, Phase, ResultTag, Resources, TileKind, TileView, WaveNumber,
};
use node_defense_system_phase_control::{PhaseController, Response, WaveReport};
use node_defense_world::query;
use serde::Serialize;

use crate::script::Script;

#[derive(Parser, Debug)]
#[command(name = "node-defense")]
#[command(author, version, about = "Runs a scripted Node Defense session", long_about = None)]
struct Cli {
    /// Session seed; the same seed and script replay the same session.
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Engine configuration file (TOML); defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player command script (TOML); starts every wave when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the session report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    seed: u64,
    phase: Phase,
    wave: WaveNumber,
    core_hp: u32,
    resources: Resources,
    responses: Vec<Response>,
    waves: Vec<WaveReport>,
    map: MapView,
}

/// Entry point for the Node Defense command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let script = match &cli.script {
        Some(path) => Script::load(path)?,
        None => Script::waves_only(config.waves.final_wave),
    };

    let controller = PhaseController::new(&config, cli.seed)
        .with_context(|| format!("failed to generate a map for seed {}", cli.seed))?;
    let report = play(controller, script, cli.seed);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Feeds the whole script and fights every wave it starts.
fn play(mut controller: PhaseController, script: Script, seed: u64) -> SessionReport {
    info!("{}", query::welcome_banner(controller.world()));
    for command in script.commands {
        controller.submit(command);
    }

    let mut responses = Vec::new();
    let mut waves = Vec::new();
    loop {
        responses.extend(controller.pump());
        match controller.run_wave() {
            Some(report) => waves.push(report),
            None => break,
        }
    }

    let world = controller.world();
    SessionReport {
        seed,
        phase: controller.phase(),
        wave: query::wave(world),
        core_hp: query::core_hp(world),
        resources: query::resources(world),
        responses,
        waves,
        map: query::map_view(world),
    }
}

fn print_summary(report: &SessionReport) {
    println!("{}", node_defense_core::WELCOME_BANNER);
    for row in report.map.rows() {
        println!("{}", row.iter().map(tile_symbol).collect::<String>());
    }
    for response in &report.responses {
        if let Response::Rejected { command, tag } = response {
            println!("rejected {command:?}: {tag:?}");
        }
    }
    for wave in &report.waves {
        println!(
            "wave {:>2}: {:?} after {} ticks, {} destroyed, {} breached, core {}",
            wave.wave.get(),
            wave.outcome,
            wave.ticks,
            wave.destroyed,
            wave.breaches,
            wave.core_hp,
        );
    }
    let rejected = report
        .responses
        .iter()
        .filter(|response| response.tag() != ResultTag::Success)
        .count();
    println!(
        "{:?} at wave {} (seed {}): core {}, {}, {rejected} rejected commands",
        report.phase,
        report.wave.get(),
        report.seed,
        report.core_hp,
        report.resources,
    );
}

/// Legend character for a tile: enemies over towers over terrain.
fn tile_symbol(tile: &TileView) -> char {
    if let Some(enemy) = tile.enemy {
        return enemy.symbol();
    }
    if let Some((tower, _)) = tile.tower {
        return tower.symbol();
    }
    match tile.kind {
        TileKind::Empty => '.',
        TileKind::Path => '=',
        TileKind::Blocked => '#',
        TileKind::Spawn => 'S',
        TileKind::Core => 'C',
    }
}
