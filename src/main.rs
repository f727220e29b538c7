//! # Thicket Headless Driver
//!
//! Builds a world, walks a player through it at random, and prints what
//! happened: an ASCII view around the final position and the inventory.

use clap::Parser;
use log::{info, warn, LevelFilter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use thicket::{
    collect_gem, interact_with_chest, interact_with_portal, move_player, resolve_thief, trigger_trap,
    ActionStatus, Direction, GenerationConfig, InventoryStore, MimicChoice, MoveOutcome, Player,
    ThicketError, ThicketResult, ThiefChoice, ThiefDemand, ThiefOutcome, WorldMap,
};

/// Per-step chance that a thief shows up.
const THIEF_CHANCE: f64 = 0.005;
/// Per-step chance of stepping on a trap.
const TRAP_CHANCE: f64 = 0.005;

/// Command line arguments for the Thicket driver.
#[derive(Parser, Debug)]
#[command(name = "thicket")]
#[command(about = "Explores an endless forest maze without a screen")]
#[command(version)]
struct Args {
    /// Random seed for world generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Chunk side length (even values are rounded up to odd)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// JSON file with a generation config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of random steps to take
    #[arg(long, default_value_t = 200)]
    steps: u32,

    /// Inventory save file, loaded before and written after the walk
    #[arg(long)]
    save: Option<PathBuf>,

    /// Radius of the printed ASCII view
    #[arg(long, default_value_t = 10)]
    view_radius: i32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ThicketResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Thicket v{}", thicket::VERSION);

    let config = build_config(&args)?;
    let mut map = WorldMap::new(config)?;
    let spawn = map.spawn_position();
    map.ensure_area(spawn.x, spawn.y);
    let mut player = Player::new(spawn);

    let store = args.save.as_ref().map(InventoryStore::new);
    if let Some(store) = &store {
        if store.has_saved_inventory() {
            if let Err(err) = store.load(&mut player.inventory) {
                warn!("Starting with an empty inventory: {}", err);
            }
        }
    }

    let walk_seed = map.config().seed.wrapping_add(1);
    let mut walker = StdRng::seed_from_u64(walk_seed);
    let finished = explore(&mut map, &mut player, args.steps, &mut walker);

    println!("{}", map.render_ascii(player.position, args.view_radius.max(0)));
    println!(
        "Position ({}, {}), {} chunks generated",
        player.position.x,
        player.position.y,
        map.generated_chunk_count()
    );
    println!("{}", player.inventory.summary());
    if finished {
        println!("The portal is open. You escaped the forest!");
    } else if !player.is_alive() {
        println!("You died in the forest.");
    }

    if let Some(store) = &store {
        store.save(&player.inventory)?;
    }
    Ok(())
}

/// Initializes `env_logger` from the requested level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

fn build_config(args: &Args) -> ThicketResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::new(args.seed.unwrap_or_else(rand::random)),
    };
    if args.config.is_some() {
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    config.validate()?;
    Ok(config)
}

/// Random walk. Returns `true` once a portal has been activated.
fn explore(map: &mut WorldMap, player: &mut Player, steps: u32, walker: &mut StdRng) -> bool {
    for step in 0..steps {
        if !player.is_alive() {
            info!("Player died after {} steps", step);
            return false;
        }

        let Some(direction) = Direction::all().choose(walker).copied() else {
            continue;
        };
        let delta = direction.to_delta();
        if let MoveOutcome::Moved(_) = move_player(map, player, delta.x, delta.y) {
            if let Some(power) = collect_gem(map, player) {
                info!("Collected gem of power {}", power);
            }
        }

        if let Err(err) = handle_chest(map, player) {
            warn!("{}", err);
        }

        let portal = interact_with_portal(map, player);
        if portal.is_success() {
            info!("{}", portal.message);
            return true;
        }

        random_events(map, player, walker);
    }
    false
}

fn handle_chest(map: &mut WorldMap, player: &mut Player) -> ThicketResult<()> {
    let Some((at, outcome)) = interact_with_chest(map, player) else {
        return Ok(());
    };
    info!("{}", outcome.message);
    if outcome.status != ActionStatus::MimicDecisionPending {
        return Ok(());
    }

    let can_pay = map
        .get_chest(at.x, at.y)
        .is_some_and(|chest| thicket::ChestLike::can_open(chest, &player.inventory, true));
    let choice = if can_pay { MimicChoice::Pay } else { MimicChoice::Fight };
    let resolved = map
        .resolve_mimic(at.x, at.y, player, choice)
        .ok_or_else(|| ThicketError::InvalidState(format!("Mimic at ({}, {}) vanished", at.x, at.y)))?;
    info!("{}", resolved.message);
    Ok(())
}

fn random_events(map: &mut WorldMap, player: &mut Player, walker: &mut StdRng) {
    if walker.gen::<f64>() < THIEF_CHANCE {
        let demand = ThiefDemand::roll(walker);
        info!("{}", demand.describe());
        let death_chance = map.config().thief_fight_death_chance;
        match resolve_thief(demand, player, ThiefChoice::default(), death_chance, map.rng_mut()) {
            ThiefOutcome::Paid(entry) => info!("The thief took {} × {}", entry.name, entry.quantity),
            ThiefOutcome::FightWon => info!("You fought off the thief"),
            ThiefOutcome::Killed => info!("The thief killed you"),
        }
    }

    if walker.gen::<f64>() < TRAP_CHANCE {
        if let Some(lost) = trigger_trap(&mut player.inventory, map.rng_mut()) {
            info!("A trap took {} × {}", lost.name, lost.quantity);
        }
    }
}
