//! Event types for different topics.

use serde::{Deserialize, Serialize};

use game_core::{Action, MoveReport, TurnPhase};

/// Events related to the world: player input and what each tick changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// The player's action was accepted and will run on the next tick.
    ActionQueued { turn: u64, action: Action },

    /// The player's action was refused before reaching the world.
    ActionRejected {
        turn: u64,
        action: Action,
        code: String,
        error: String,
    },

    /// A change committed during `turn`, in commit order.
    Applied { turn: u64, event: game_core::Event },
}

/// Published once per tick after every [`GameStateEvent::Applied`] of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: u64,
    pub phase: TurnPhase,
    pub moves: MoveReport,
    pub player_alive: bool,
}
