//! Per-tick action proposals.
//!
//! Actions are produced by controllers during the collecting phase and
//! consumed by the same tick; they are never stored across ticks except as a
//! player's pending input.

use crate::grid::Pos;
use crate::state::{CardId, EntityId};

/// Something an entity wants to do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ActionKind))]
#[strum_discriminants(derive(Hash, strum::Display, strum::AsRefStr))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    None,
    Move {
        start: Pos,
        end: Pos,
    },
    /// Move into a cell held by `wait_for`, provided it leaves this tick.
    DelayMove {
        start: Pos,
        end: Pos,
        wait_for: EntityId,
    },
    BumpAttack {
        target: EntityId,
    },
    /// Bump attack that also slips a poison card into the player's discard pile.
    BumpAttackPoison {
        target: EntityId,
    },
    OpenDoor {
        door: EntityId,
    },
    Heal {
        target: EntityId,
        amount: i32,
    },
    ShootWeb {
        target: Pos,
    },
    PlayCard {
        card: CardId,
    },
    /// Fade out of (or back into) sight.
    SetInvisible {
        invisible: bool,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        self.into()
    }

    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. } | Self::DelayMove { .. })
    }
}

/// An action tagged with the entity performing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProposedAction {
    pub entity: EntityId,
    pub action: Action,
}

impl ProposedAction {
    pub const fn new(entity: EntityId, action: Action) -> Self {
        Self { entity, action }
    }
}
