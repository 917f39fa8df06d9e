use core::fmt;

use bitflags::bitflags;

use super::Appearance;
use crate::grid::Pos;

/// Stable entity identifier. Never reused within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// "No entity".
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1);
    /// Reserved for level geometry acting as an attacker or blocker.
    pub const WALLS: Self = Self(2);
    /// First id handed out by the allocator.
    pub const FIRST_DYNAMIC: u32 = 3;

    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Terrain categories, used both as movement capability and as what an
    /// entity blocks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BlockMask: u8 {
        const WALK = 1 << 0;
        const SWIM = 1 << 1;
        const FLY = 1 << 2;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EntityFlags: u8 {
        const BLOCKS_VISION = 1 << 0;
        const INVISIBLE = 1 << 1;
        /// Not held by spider webs.
        const WEB_WALKER = 1 << 2;
    }
}

/// What happens when another entity moves into this one.
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
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultAction {
    /// The move is simply blocked.
    #[default]
    None,
    BumpAttack,
    OpenDoor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub pos: Pos,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub appearance: Appearance,
    /// Movers whose movement intersects this mask cannot share the cell.
    pub block_mask: BlockMask,
    pub movement_type: BlockMask,
    pub flags: EntityFlags,
    pub default_action: DefaultAction,
}

impl Entity {
    pub fn new(id: EntityId, pos: Pos) -> Self {
        Self {
            id,
            pos,
            hit_points: 1,
            max_hit_points: 1,
            appearance: Appearance::None,
            block_mask: BlockMask::empty(),
            movement_type: BlockMask::WALK,
            flags: EntityFlags::empty(),
            default_action: DefaultAction::None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    pub fn blocks(&self, movement: BlockMask) -> bool {
        self.block_mask.intersects(movement)
    }

    pub fn blocks_vision(&self) -> bool {
        self.flags.contains(EntityFlags::BLOCKS_VISION)
    }

    pub fn is_invisible(&self) -> bool {
        self.flags.contains(EntityFlags::INVISIBLE)
    }

    // chainable setters used by level authoring

    /// Sets current and maximum hit points.
    pub fn hit_points(&mut self, hit_points: i32) -> &mut Self {
        self.hit_points = hit_points;
        self.max_hit_points = hit_points;
        self
    }

    pub fn appearance(&mut self, appearance: Appearance) -> &mut Self {
        self.appearance = appearance;
        self
    }

    pub fn flags(&mut self, flags: EntityFlags) -> &mut Self {
        self.flags |= flags;
        self
    }

    pub fn default_action(&mut self, action: DefaultAction) -> &mut Self {
        self.default_action = action;
        self
    }

    /// Creature defaults: blocks all movement types and can be bump-attacked.
    pub fn creature(&mut self, movement_type: BlockMask) -> &mut Self {
        self.block_mask = BlockMask::all();
        self.movement_type = movement_type;
        self.default_action = DefaultAction::BumpAttack;
        self
    }
}
