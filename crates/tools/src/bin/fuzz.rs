use std::collections::BTreeSet;
use std::io;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use dungeon_core::{
    Biome, CharacterRoster, Direction, Dungeon, DungeonConfig, RoomId, TemplateRepository,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to generate
    #[arg(short, long, default_value_t = 200)]
    count: u64,
    #[arg(short, long, default_value_t = 1)]
    difficulty: u32,
    /// Random room transitions walked per dungeon
    #[arg(short, long, default_value_t = 60)]
    walk: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    println!(
        "Fuzzing {} seeds from {} at difficulty {} ({} moves each)...",
        args.count, args.seed, args.difficulty, args.walk
    );
    let config = DungeonConfig { difficulty: args.difficulty, ..DungeonConfig::default() };
    let templates = TemplateRepository::builtin(config.difficulty)?;
    let characters = CharacterRoster::build_default();

    let mut unsatisfied = 0;
    for seed in args.seed..args.seed.saturating_add(args.count) {
        let mut dungeon = Dungeon::generate(&config, &templates, &characters, seed)
            .with_context(|| format!("seed {seed} failed to generate"))?;
        if !dungeon.report().satisfied {
            unsatisfied += 1;
        }
        check_layout(&dungeon).with_context(|| format!("layout invariant broken on seed {seed}"))?;
        walk_rooms(&mut dungeon, args.walk)
            .with_context(|| format!("visibility invariant broken on seed {seed}"))?;
        debug!(seed, fingerprint = dungeon.fingerprint(), "seed checked");
    }

    info!(unsatisfied, "sweep finished");
    println!("Fuzzing completed successfully ({unsatisfied} fell back to a best attempt).");
    Ok(())
}

fn check_layout(dungeon: &Dungeon) -> Result<()> {
    let grid = dungeon.grid();
    let start = dungeon.carved().start;
    let reached = grid.reachable_rooms(start);
    for room in grid.room_positions() {
        ensure!(reached.contains(&room), "room {room} is unreachable from {start}");
    }

    let report = dungeon.report();
    if report.satisfied {
        ensure!(report.limits.accepts(report.density), "accepted grid breaks density limits");
    }

    for room in dungeon.rooms().iter() {
        for door in room.doors() {
            let target = dungeon.rooms().get(door.target).context("door targets no room")?;
            let back = target.door_toward(door.direction.opposite());
            ensure!(
                back.is_some_and(|back| back.target == room.id()),
                "{} -> {} has no matching return door",
                room.id(),
                door.target
            );
            ensure!(
                room.walls().iter().all(|wall| !wall.bounds.intersects(&door.bounds)),
                "{} has a wall inside its {:?} door",
                room.id(),
                door.direction
            );
        }

        let lair = room.biome() == Biome::Lair;
        for enemy in room.enemies() {
            ensure!(
                enemy.is_dragon() == lair,
                "{} in {} breaks the biome rule",
                enemy.name,
                room.id()
            );
        }
    }
    Ok(())
}

fn walk_rooms(dungeon: &mut Dungeon, moves: u32) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(dungeon.seed());
    let mut visited: BTreeSet<RoomId> = dungeon.visibility().visited().clone();

    for _ in 0..moves {
        let doors: Vec<Direction> = dungeon
            .current_room()
            .map(|room| room.doors().iter().map(|door| door.direction).collect())
            .unwrap_or_default();
        if doors.is_empty() {
            break;
        }
        let direction = doors[rng.next_u64() as usize % doors.len()];
        let current = dungeon.travel(direction)?;

        let visibility = dungeon.visibility();
        ensure!(visibility.visited().is_superset(&visited), "visited set shrank");
        ensure!(visibility.visible().contains(&current), "current room is not visible");
        ensure!(visibility.visited().contains(&current), "current room is not visited");
        visited = visibility.visited().clone();
    }
    Ok(())
}
