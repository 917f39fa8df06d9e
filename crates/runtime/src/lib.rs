//! Runtime orchestration for the dungeon simulation.
//!
//! The simulation core is synchronous and borrows everything it touches. This
//! crate gives it an owner: a background [`workers::SimulationWorker`] holds
//! the world, configuration and random stream, and clients talk to it through
//! a cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, its builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, TickSummary};
pub use events::{Event, EventBus, GameStateEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
