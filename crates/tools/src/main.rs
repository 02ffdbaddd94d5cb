use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::{
    CellKind, CharacterRoster, Dungeon, DungeonConfig, Grid, GridPos, TemplateRepository,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dungeon seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Generation settings TOML; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Room template TOML; built-in templates when omitted
    #[arg(short, long)]
    templates: Option<PathBuf>,
    /// Enemy roster JSON; built-in roster when omitted
    #[arg(long)]
    characters: Option<PathBuf>,
    /// Overrides the configured difficulty
    #[arg(short, long)]
    difficulty: Option<u32>,
    /// Print a JSON room summary instead of the ASCII map
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RoomSummary {
    id: usize,
    pos: GridPos,
    template: String,
    biome: u8,
    doors: Vec<&'static str>,
    contents: usize,
    enemies: Vec<String>,
}

#[derive(Serialize)]
struct DungeonSummary {
    seed: u64,
    fingerprint: String,
    attempts: u32,
    satisfied: bool,
    rooms: Vec<RoomSummary>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }

    let templates = match &args.templates {
        Some(path) => TemplateRepository::load(path, config.difficulty)
            .with_context(|| format!("Failed to load templates: {}", path.display()))?,
        None => TemplateRepository::builtin(config.difficulty)
            .context("Built-in templates failed to load")?,
    };
    let characters = match &args.characters {
        Some(path) => CharacterRoster::load(path)
            .with_context(|| format!("Failed to load characters: {}", path.display()))?,
        None => CharacterRoster::build_default(),
    };

    let dungeon = Dungeon::generate(&config, &templates, &characters, args.seed)
        .with_context(|| format!("Failed to generate dungeon for seed {}", args.seed))?;
    info!(seed = args.seed, "generation finished");

    if args.json {
        let summary = summarize(&dungeon);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    print!("{}", render_map(dungeon.grid()));
    println!();
    for room in dungeon.rooms().iter() {
        let doors: Vec<_> = room.doors().iter().map(|door| door.direction.label()).collect();
        println!(
            "{:<9} {:<9} {:<28} biome {} doors [{}] contents {}",
            room.id().to_string(),
            room.grid_pos().to_string(),
            room.template(),
            room.biome().number(),
            doors.join(","),
            room.content_count()
        );
    }
    let report = dungeon.report();
    println!();
    println!("Attempts: {} (satisfied: {})", report.attempts, report.satisfied);
    println!("Density: total {} inner {}", report.density.total_sum, report.density.inner_sum);
    println!("Fingerprint: {:016x}", dungeon.fingerprint());

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
}

fn summarize(dungeon: &Dungeon) -> DungeonSummary {
    let rooms = dungeon
        .rooms()
        .iter()
        .map(|room| RoomSummary {
            id: room.id().0,
            pos: room.grid_pos(),
            template: room.template().to_string(),
            biome: room.biome().number(),
            doors: room.doors().iter().map(|door| door.direction.label()).collect(),
            contents: room.content_count(),
            enemies: room.enemies().map(|enemy| enemy.name.clone()).collect(),
        })
        .collect();
    DungeonSummary {
        seed: dungeon.seed(),
        fingerprint: format!("{:016x}", dungeon.fingerprint()),
        attempts: dungeon.report().attempts,
        satisfied: dungeon.report().satisfied,
        rooms,
    }
}

fn render_map(grid: &Grid) -> String {
    let mut text = String::new();
    for pos in grid.positions() {
        let value = grid.value(pos);
        let glyph = if pos.is_room() {
            match CellKind::from_code(value) {
                Some(CellKind::Start) => 'S',
                Some(CellKind::End) => 'E',
                Some(CellKind::Pillar(_)) => 'P',
                Some(CellKind::BreakableWall) => 'B',
                Some(CellKind::Branch(index)) => char::from(b'1' + index),
                Some(CellKind::Generic) => 'o',
                None => ' ',
            }
        } else if grid.is_hallway(pos) {
            if pos.row % 2 == 1 { '|' } else { '-' }
        } else {
            ' '
        };
        text.push(glyph);
        if pos.col + 1 == grid.size() {
            text.push('\n');
        }
    }
    text
}
