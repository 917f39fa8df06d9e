//! Deterministic dungeon simulation core.
//!
//! `game-core` owns the rules of the world: the 256×256 tile grid, field of
//! vision, distance fields for pathfinding, the entity store with its
//! controllers and message handlers, and the turn engine that turns
//! controller proposals into committed moves and events. It draws nothing and
//! performs no I/O; the runtime and offline tools drive it through
//! [`engine::GameEngine`] and the types re-exported here.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod fov;
pub mod grid;
pub mod pathfinding;
pub mod rng;
pub mod state;

pub use action::{Action, ActionKind, ProposedAction};
pub use config::{CaveConfig, CombatConfig, CreatureConfig, GameConfig};
pub use engine::{
    Delay, DelayResolution, GameEngine, MoveReport, TickOutcome, TurnPhase, resolve_delays,
};
pub use error::{ActionError, ErrorContext, ErrorSeverity, GameError};
pub use event::{Event, EventKind};
pub use fov::{FieldOfVision, FovState, Rational, calculate_fov};
pub use grid::{BoolGrid, GRID_SIZE, MapCache, Pos};
pub use pathfinding::DijkstraMap;
pub use rng::GameRng;
pub use state::{
    Appearance, BlockMask, Card, CardId, CardState, Controller, ControllerId, ControllerKind,
    DefaultAction, Entity, EntityFlags, EntityId, GameState, HandlerId, HandlerKind,
    MessageHandler, MessageMask, SkeletonIds, SpiderKind, Tile, TileKind, TileMap,
};
