//! Turn engine.
//!
//! One call to [`GameEngine::tick`] runs a full turn:
//!
//! 1. **Collecting**: every controller is polled once, in registration order.
//!    Move proposals are classified on the spot: free destinations are claimed
//!    immediately, destinations held by another controlled entity become
//!    delayed moves, everything else is blocked.
//! 2. **Resolving**: delayed moves are settled by [`resolve_delays`].
//! 3. **Committed**: moves are applied (immediate ones first, then promotions
//!    in resolution order) with their enter/exit messages, the remaining
//!    actions run in collection order, and the field of vision is refreshed.
//!
//! Nothing inside a tick is an error. Blocked movers and deadlocks are
//! reported through [`TickOutcome`] and the event list.

mod ai;
mod collect;
mod commit;
mod input;
mod messages;
mod resolve;

pub use resolve::{Delay, DelayResolution, resolve_delays};

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::event::Event;
use crate::grid::Pos;
use crate::rng::GameRng;
use crate::state::{EntityId, GameState};

/// Phase of the tick currently executing.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    #[default]
    Collecting,
    Resolving,
    Committed,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Which movers did what during a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveReport {
    /// Moved straight away, collection order.
    pub moved: Vec<EntityId>,
    /// Waited on another mover and then moved, resolution order.
    pub promoted: Vec<EntityId>,
    /// Rejected during collection: wall, claimed cell, uncontrolled blocker, web.
    pub blocked: Vec<EntityId>,
    /// Waited on someone who stayed put, or lost the cell.
    pub cannot_move: Vec<EntityId>,
    /// Waited in a cycle.
    pub deadlocked: Vec<EntityId>,
}

impl MoveReport {
    pub fn all_moved(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.moved.iter().chain(self.promoted.iter()).copied()
    }

    pub fn all_stayed(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.blocked
            .iter()
            .chain(self.cannot_move.iter())
            .chain(self.deadlocked.iter())
            .copied()
    }
}

/// Everything a tick produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub turn: u64,
    pub phase: TurnPhase,
    pub events: Vec<Event>,
    pub moves: MoveReport,
}

/// Runs ticks against a borrowed state.
///
/// The engine owns nothing: state, configuration and the random generator are
/// lent by whoever drives the simulation.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
    rng: &'a mut GameRng,
    phase: TurnPhase,
    events: Vec<Event>,
    /// Entities whose death is already being processed this tick.
    dying: BTreeSet<EntityId>,
    /// Destinations of this tick's settled moves. Spawns never land on them.
    reserved: BTreeSet<Pos>,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState, config: &'a GameConfig, rng: &'a mut GameRng) -> Self {
        Self {
            state,
            config,
            rng,
            phase: TurnPhase::Collecting,
            events: Vec::new(),
            dying: BTreeSet::new(),
            reserved: BTreeSet::new(),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    fn enter(&mut self, phase: TurnPhase) {
        tracing::trace!(from = %self.phase, to = %phase, "turn phase");
        self.phase = phase;
    }

    /// Runs one full Collecting → Resolving → Committed pass.
    pub fn tick(mut self) -> TickOutcome {
        let turn = self.state.advance_turn();
        let span = tracing::debug_span!("tick", turn);
        let _guard = span.enter();

        self.enter(TurnPhase::Collecting);
        let mut collected = self.collect();

        self.enter(TurnPhase::Resolving);
        let delays = std::mem::take(&mut collected.delays);
        let resolution = resolve_delays(delays, &mut collected.moved, &mut collected.claimed);
        if !resolution.deadlocked.is_empty() {
            tracing::debug!(
                count = resolution.deadlocked.len(),
                probes = resolution.probes,
                "delayed moves deadlocked"
            );
        }

        self.enter(TurnPhase::Committed);
        let moves = self.commit(collected, resolution);

        tracing::debug!(
            moved = moves.moved.len(),
            promoted = moves.promoted.len(),
            stayed = moves.all_stayed().count(),
            events = self.events.len(),
            "tick committed"
        );

        TickOutcome {
            turn,
            phase: self.phase,
            events: self.events,
            moves,
        }
    }

    pub(crate) fn emit(&mut self, event: Event) {
        tracing::trace!(kind = %event.kind(), "event");
        self.events.push(event);
    }
}
