//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the simulation.

use std::env;
use std::str::FromStr;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use game_content::{DEFAULT_LEVEL, find_level};
use game_core::{GameConfig, GameRng, GameState};

use crate::api::{Result, RuntimeError, RuntimeHandle, TickSummary};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Seed of the random stream used to build the level and run every tick.
    pub seed: u64,
    /// Registered level built when no initial state is provided.
    pub level: String,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: 0,
            level: DEFAULT_LEVEL.to_owned(),
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    pub const SEED_VAR: &'static str = "DUNGEON_SEED";
    pub const LEVEL_VAR: &'static str = "DUNGEON_LEVEL";
    pub const EVENT_BUFFER_VAR: &'static str = "DUNGEON_EVENT_BUFFER";

    /// Defaults overridden by `DUNGEON_SEED`, `DUNGEON_LEVEL` and
    /// `DUNGEON_EVENT_BUFFER` where they are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(seed) = parse_var(&lookup, Self::SEED_VAR)? {
            config.seed = seed;
        }
        if let Some(level) = lookup(Self::LEVEL_VAR) {
            config.level = level;
        }
        if let Some(size) = parse_var(&lookup, Self::EVENT_BUFFER_VAR)? {
            config.event_buffer_size = size;
        }
        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| RuntimeError::InvalidEnv { key, value })
}

/// Main runtime that orchestrates game simulation
///
/// Runtime owns the worker task; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Build and start a registered level.
    pub async fn from_level(name: &str, config: RuntimeConfig) -> Result<Self> {
        Self::builder()
            .config(RuntimeConfig {
                level: name.to_owned(),
                ..config
            })
            .build()
            .await
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events of one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Run a single tick
    pub async fn step(&self) -> Result<TickSummary> {
        self.handle.step().await
    }

    /// Shutdown the runtime gracefully
    ///
    /// Commands already queued are answered first; handles still held by
    /// clients fail with [`RuntimeError::CommandChannelClosed`] afterwards.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await?;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    rng: Option<GameRng>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            rng: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the simulation rules
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    /// Provide initial game state instead of building `config.level`
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Continue an existing random stream instead of seeding a new one
    pub fn rng(mut self, rng: GameRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let RuntimeBuilder { config, state, rng } = self;
        let mut rng = rng.unwrap_or_else(|| GameRng::new(config.seed));

        let initial_state = match state {
            Some(state) => state,
            None => {
                let level = find_level(&config.level).ok_or_else(|| RuntimeError::UnknownLevel {
                    name: config.level.clone(),
                })?;
                tracing::info!(level = level.name, seed = config.seed, "building level");
                (level.build)(&config.game_config, &mut rng)
            }
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            initial_state,
            config.game_config,
            rng,
            command_rx,
            event_bus,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}
