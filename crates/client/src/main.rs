//! Dungeon terminal client.
//!
//! Builds a level, drives it through the runtime for a number of ticks while
//! logging what happens, and prints the map as the player knows it.
//!
//! # Examples
//!
//! ```bash
//! # list the built-in levels
//! cargo run -p dungeon-client -- --list
//!
//! # walk east three times through the default level
//! cargo run -p dungeon-client -- --seed 7 --walk e e e
//!
//! # run a custom template from a data directory
//! cargo run -p dungeon-client -- --data ./my-data --level arena --ticks 20
//! ```

mod direction;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use direction::Direction;
use game_content::{ConfigLoader, ContentFactory, level_names};
use game_core::{Action, Event, GameRng};
use runtime::{Runtime, RuntimeConfig, RuntimeHandle};

/// Run the dungeon simulation in the terminal
#[derive(Parser, Debug)]
#[command(name = "dungeon")]
#[command(about = "Run the dungeon simulation in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Level to build (see --list); overrides DUNGEON_LEVEL
    #[arg(long)]
    level: Option<String>,

    /// Random seed; overrides DUNGEON_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to run; defaults to one per --walk step, at least one
    #[arg(long)]
    ticks: Option<usize>,

    /// Print the registered level names and exit
    #[arg(long)]
    list: bool,

    /// Player steps, one per tick (n, ne, e, se, s, sw, w, nw)
    #[arg(long, num_args = 1.., value_enum)]
    walk: Vec<Direction>,

    /// TOML file with simulation rules
    #[arg(long, conflicts_with = "data")]
    config: Option<PathBuf>,

    /// Data directory holding config.toml and levels/<name>.txt
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for DUNGEON_* and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in level_names() {
            println!("{name}");
        }
        return Ok(());
    }

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = RuntimeConfig::from_env()?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(level) = &cli.level {
        config.level = level.clone();
    }
    if let Some(path) = &cli.config {
        config.game_config = ConfigLoader::load(path)?;
    }

    let runtime = start(&cli, config).await?;
    let handle = runtime.handle();

    let ticks = cli.ticks.unwrap_or(cli.walk.len().max(1));
    for tick in 0..ticks {
        if let Some(&direction) = cli.walk.get(tick) {
            walk(&handle, direction).await?;
        }

        let summary = handle.step().await?;
        for event in &summary.events {
            info!(turn = summary.turn, kind = %event.kind(), ?event, "event");
            if matches!(event, Event::Death { entity, .. } if entity.is_player()) {
                warn!(turn = summary.turn, "the player has died");
            }
        }
        if !summary.moves.deadlocked.is_empty() {
            info!(turn = summary.turn, entities = ?summary.moves.deadlocked, "deadlocked movers");
        }
    }

    let state = handle.query_state().await?;
    let fov = handle.query_fov().await?;
    print!("{}", render::render_map(&state, &fov));
    info!(
        turn = state.turn(),
        hit_points = state.player().hit_points,
        position = %state.player().pos,
        "done"
    );

    runtime.shutdown().await?;
    Ok(())
}

async fn start(cli: &Cli, config: RuntimeConfig) -> Result<Runtime> {
    let Some(data) = &cli.data else {
        return Ok(Runtime::builder().config(config).build().await?);
    };

    let factory = ContentFactory::new(data.clone());
    let game_config = factory
        .load_config()
        .with_context(|| format!("loading rules from {}", data.display()))?;
    let mut rng = GameRng::new(config.seed);
    let state = factory.build_level(&config.level, &game_config, &mut rng)?;
    info!(level = %config.level, data = %data.display(), "built custom level");

    Ok(Runtime::builder()
        .config(config)
        .game_config(game_config)
        .initial_state(state)
        .rng(rng)
        .build()
        .await?)
}

async fn walk(handle: &RuntimeHandle, direction: Direction) -> Result<()> {
    let start = handle.query_state().await?.player().pos;
    let Some(end) = direction.step(start) else {
        warn!(?direction, %start, "step leaves the grid");
        return Ok(());
    };
    if let Err(error) = handle
        .submit_player_action(Action::Move { start, end })
        .await
    {
        if error.severity().is_internal() {
            return Err(error.into());
        }
        warn!(?direction, %error, "step refused");
    }
    Ok(())
}
