use arrayvec::ArrayVec;

use super::EntityId;
use crate::action::Action;
use crate::config::GameConfig;

/// Registration-order handle of a controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerId(pub u32);

pub type SkeletonIds = ArrayVec<EntityId, { GameConfig::MAX_LICH_SKELETONS }>;

/// Driven-entity list of a single controller (lich plus its skeletons at most).
pub type DrivenEntities = ArrayVec<EntityId, { GameConfig::MAX_LICH_SKELETONS + 1 }>;

/// Decision maker for one or more entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controller {
    pub id: ControllerId,
    pub kind: ControllerKind,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ControllerKind {
    /// Acts on whatever action was submitted from outside since the last tick.
    Player {
        entity: EntityId,
        pending: Option<Action>,
    },
    /// Wanders one random step per tick, bites the player when adjacent.
    RandomMove { entity: EntityId },
    Dragon { entity: EntityId },
    Slime {
        entity: EntityId,
        split_cooldown: u32,
    },
    /// Commands a group of skeletons and keeps them patched up.
    ///
    /// The lich itself may be gone while skeletons remain.
    Lich {
        lich: Option<EntityId>,
        skeletons: SkeletonIds,
        heal_cooldown: u32,
    },
    SpiderNormal { entity: EntityId },
    SpiderWeb {
        entity: EntityId,
        web_cooldown: u32,
    },
    SpiderPoison { entity: EntityId },
    SpiderShadow { entity: EntityId },
}

impl ControllerKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Every live entity this controller decides for, lich first.
    pub fn entities(&self) -> DrivenEntities {
        let mut out = DrivenEntities::new();
        match self {
            Self::Player { entity, .. }
            | Self::RandomMove { entity }
            | Self::Dragon { entity }
            | Self::Slime { entity, .. }
            | Self::SpiderNormal { entity }
            | Self::SpiderWeb { entity, .. }
            | Self::SpiderPoison { entity }
            | Self::SpiderShadow { entity } => out.push(*entity),
            Self::Lich {
                lich, skeletons, ..
            } => {
                if let Some(lich) = lich {
                    out.push(*lich);
                }
                out.extend(skeletons.iter().copied());
            }
        }
        out
    }

    pub fn drives(&self, id: EntityId) -> bool {
        self.entities().contains(&id)
    }

    /// Drops `id` from this controller. Returns true when nothing is left to
    /// drive and the controller should be removed.
    pub fn forget(&mut self, id: EntityId) -> bool {
        match self {
            Self::Lich {
                lich, skeletons, ..
            } => {
                if *lich == Some(id) {
                    *lich = None;
                }
                skeletons.retain(|s| *s != id);
                lich.is_none() && skeletons.is_empty()
            }
            other => other.drives(id),
        }
    }
}
