//! Ordered record of what a tick changed.
//!
//! Events are produced during the committed phase in the order the changes
//! happened and are handed to the caller once; the core keeps no copy.

use crate::grid::Pos;
use crate::state::{Appearance, CardId, EntityId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumDiscriminants)]
#[strum_discriminants(name(EventKind))]
#[strum_discriminants(derive(Hash, strum::Display, strum::AsRefStr))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Move {
        entity: EntityId,
        start: Pos,
        end: Pos,
    },
    MoveBlocked {
        entity: EntityId,
        start: Pos,
        end: Pos,
    },
    /// Held in place by something at its own cell (a web).
    Stuck {
        entity: EntityId,
        pos: Pos,
    },
    BumpAttack {
        attacker: EntityId,
        target: EntityId,
    },
    Damaged {
        entity: EntityId,
        amount: i32,
        source: EntityId,
    },
    Poisoned {
        entity: EntityId,
    },
    Death {
        entity: EntityId,
        pos: Pos,
    },
    DoorOpened {
        door: EntityId,
        by: EntityId,
    },
    TileDropped {
        pos: Pos,
    },
    FireballHit {
        pos: Pos,
        target: EntityId,
    },
    SlimeSplit {
        original: EntityId,
        spawned: EntityId,
        pos: Pos,
    },
    Heal {
        healer: EntityId,
        target: EntityId,
        amount: i32,
    },
    ShootWeb {
        shooter: EntityId,
        target: Pos,
    },
    CreatureDropIn {
        entity: EntityId,
        pos: Pos,
    },
    TurnInvisible {
        entity: EntityId,
    },
    TurnVisible {
        entity: EntityId,
    },
    AddCardToDiscard {
        card: CardId,
        appearance: Appearance,
    },
    DrawCard {
        card: CardId,
    },
    ShuffleDiscardToDeck,
    DiscardHand {
        count: usize,
    },
    PlayCard {
        card: CardId,
    },
    FieldOfVisionChanged,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.into()
    }

    /// The entity most directly concerned by the event, if any.
    pub fn subject(&self) -> Option<EntityId> {
        match *self {
            Self::Move { entity, .. }
            | Self::MoveBlocked { entity, .. }
            | Self::Stuck { entity, .. }
            | Self::Damaged { entity, .. }
            | Self::Poisoned { entity }
            | Self::Death { entity, .. }
            | Self::CreatureDropIn { entity, .. }
            | Self::TurnInvisible { entity }
            | Self::TurnVisible { entity } => Some(entity),
            Self::BumpAttack { attacker, .. } => Some(attacker),
            Self::DoorOpened { door, .. } => Some(door),
            Self::FireballHit { target, .. } | Self::Heal { target, .. } => Some(target),
            Self::SlimeSplit { original, .. } => Some(original),
            Self::ShootWeb { shooter, .. } => Some(shooter),
            Self::TileDropped { .. }
            | Self::AddCardToDiscard { .. }
            | Self::DrawCard { .. }
            | Self::ShuffleDiscardToDeck
            | Self::DiscardHand { .. }
            | Self::PlayCard { .. }
            | Self::FieldOfVisionChanged => None,
        }
    }
}
