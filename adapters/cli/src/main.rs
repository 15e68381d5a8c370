#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted Rol session.

mod script;

use std::{fs, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rol_core::{Event, TurnPhase};
use rol_rendering::{RenderingBackend, TextCanvas, WriterBackend};
use rol_system_bootstrap::Bootstrap;
use rol_world::{self as world, query, GameConfig, World};

use script::KeyScript;

/// Run a headless Rol session driven by a key script.
#[derive(Parser, Debug)]
#[command(name = "rol", version)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of phase steps to simulate
    #[arg(short, long, default_value = "200")]
    ticks: u32,

    /// Keys per player turn, e.g. `right,right,down+fire`
    #[arg(short, long, default_value = "")]
    keys: KeyScript,

    /// Overrides the configured spawn seed
    #[arg(long)]
    seed: Option<u64>,

    /// When frames are printed
    #[arg(long, value_enum, default_value_t = FrameMode::Turn)]
    frames: FrameMode,
}

/// Frame printing cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FrameMode {
    /// Every time the player is asked for input.
    Turn,
    /// After every phase step.
    Tick,
    /// Once, when the run ends.
    Final,
}

/// Entry point for the Rol command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }

    let bootstrap = Bootstrap::new(config);
    let mut events = Vec::new();
    let mut world = bootstrap
        .build(&mut events)
        .context("failed to set up the session")?;
    println!("{}", bootstrap.welcome_banner(&world));

    let mut backend = WriterBackend::new(io::stdout());
    let ticks = run(&mut world, cli.ticks, cli.keys, cli.frames, &mut backend)?;

    let elapsed = bootstrap.config().loop_timeout() * ticks;
    present(&world, &format!("final after {ticks} ticks"), &mut backend)?;
    println!("{}", summary(&world, ticks, elapsed));
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    GameConfig::from_toml_str(&source)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Steps the session until the tick budget, the script or the player runs
/// out, returning the number of steps taken.
fn run(
    world: &mut World,
    ticks: u32,
    mut script: KeyScript,
    frames: FrameMode,
    backend: &mut impl RenderingBackend,
) -> Result<u32> {
    let mut events = Vec::new();
    for tick in 0..ticks {
        if query::turn_phase(world) == TurnPhase::PlayerStart {
            if frames == FrameMode::Turn {
                present(world, &format!("turn at tick {tick}"), backend)?;
            }
            let Some(keys) = script.next_turn() else {
                tracing::info!("Key script exhausted at tick {}", tick);
                return Ok(tick);
            };
            for key in keys {
                world.key_down(key.code());
            }
        }

        events.clear();
        world::update(world, &mut events);
        log_events(&events);

        if frames == FrameMode::Tick {
            present(world, &format!("tick {tick}"), backend)?;
        }
        if query::is_game_over(world) {
            tracing::info!("Hero fell at tick {}", tick);
            return Ok(tick + 1);
        }
    }
    Ok(ticks)
}

fn present(world: &World, caption: &str, backend: &mut impl RenderingBackend) -> Result<()> {
    let (columns, rows) = query::grid(world).dimensions();
    let mut canvas = TextCanvas::new(columns, rows);
    world::draw(world, &mut canvas);
    backend.present(caption, &canvas.frame())
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::ActorDamaged { .. } | Event::SpawnFailed { .. } => {
                tracing::info!("{:?}", event);
            }
            _ => tracing::debug!("{:?}", event),
        }
    }
}

fn summary(world: &World, ticks: u32, elapsed: Duration) -> String {
    let hero = match query::player(world) {
        Some(player) => format!("hero at {} with {}/{} hp", player.cell, player.live_now, player.live),
        None => String::from("hero defeated"),
    };
    format!(
        "{ticks} ticks ({} ms simulated), {hero}, {} enemies, phase {:?}",
        elapsed.as_millis(),
        query::enemy_view(world).len(),
        query::turn_phase(world)
    )
}
