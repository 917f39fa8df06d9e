use bitflags::bitflags;

use super::{ControllerId, EntityId};
use crate::grid::Pos;

/// Registration-order handle of a message handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerId(pub u32);

bitflags! {
    /// Messages a handler subscribes to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MessageMask: u8 {
        const MOVE_PRE_EXIT = 1 << 0;
        const MOVE_POST_EXIT = 1 << 1;
        const MOVE_PRE_ENTER = 1 << 2;
        const MOVE_POST_ENTER = 1 << 3;
        const DAMAGE = 1 << 4;
        const PRE_DEATH = 1 << 5;
        const POST_DEATH = 1 << 6;
    }
}

/// Reactive rule attached to the world, usually owned by an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHandler {
    pub id: HandlerId,
    /// Owner-less handlers live until they remove themselves.
    pub owner: Option<EntityId>,
    pub mask: MessageMask,
    pub kind: HandlerKind,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum HandlerKind {
    /// Anything trying to leave `pos` is held in place (spider web).
    PreventExit { pos: Pos },
    /// Nothing may enter `pos`.
    PreventEnter { pos: Pos },
    /// The floor at `pos` falls away once its occupant steps off.
    DropTile { pos: Pos },
    /// Burns whatever steps onto `pos`.
    TrapFireball { pos: Pos },
    /// The owning slime splits when damaged.
    SlimeSplit,
    /// The owning lich takes its skeletons with it.
    LichDeath { controller: ControllerId },
    /// Drops spiders around `center` once the player comes within `radius`.
    TrapSpiderCave { center: Pos, radius: u32 },
}

impl HandlerKind {
    /// Message mask this kind of handler listens on.
    pub fn default_mask(&self) -> MessageMask {
        match self {
            Self::PreventExit { .. } => MessageMask::MOVE_PRE_EXIT,
            Self::PreventEnter { .. } => MessageMask::MOVE_PRE_ENTER,
            Self::DropTile { .. } => MessageMask::MOVE_POST_EXIT,
            Self::TrapFireball { .. } | Self::TrapSpiderCave { .. } => {
                MessageMask::MOVE_POST_ENTER
            }
            Self::SlimeSplit => MessageMask::DAMAGE,
            Self::LichDeath { .. } => MessageMask::PRE_DEATH,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}
