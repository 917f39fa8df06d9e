//! Creature and object factories.
//!
//! Level builders and in-tick effects (slime splits, spider drops) create
//! entities through these so a creature always comes with its controller and
//! handlers attached.

use super::{
    Appearance, BlockMask, ControllerId, ControllerKind, DefaultAction, EntityFlags, EntityId,
    GameState, HandlerKind, SkeletonIds,
};
use crate::config::GameConfig;
use crate::grid::Pos;
use crate::rng::GameRng;

/// The four spider breeds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpiderKind {
    Normal,
    Web,
    Poison,
    Shadow,
}

impl SpiderKind {
    pub const ALL: [SpiderKind; 4] = [Self::Normal, Self::Web, Self::Poison, Self::Shadow];

    fn appearance(self) -> Appearance {
        match self {
            Self::Normal => Appearance::SpiderNormal,
            Self::Web => Appearance::SpiderWeb,
            Self::Poison => Appearance::SpiderPoison,
            Self::Shadow => Appearance::SpiderShadow,
        }
    }

    fn hit_points(self) -> i32 {
        match self {
            Self::Shadow => 2,
            _ => 3,
        }
    }
}

impl GameState {
    /// A spider web: anything but a spider trying to leave its cell is held.
    pub fn spawn_web(&mut self, pos: Pos, rng: &mut GameRng) -> EntityId {
        let appearance = rng
            .choose(&Appearance::WEBS)
            .copied()
            .unwrap_or(Appearance::Web1);
        let id = self.add_entity(pos).hit_points(1).appearance(appearance).id;
        self.add_handler(Some(id), HandlerKind::PreventExit { pos });
        id
    }

    pub fn spawn_slime(&mut self, pos: Pos, hit_points: i32, config: &GameConfig) -> EntityId {
        const SLIME_MAX_HIT_POINTS: i32 = 5;
        let entity = self
            .add_entity(pos)
            .hit_points(SLIME_MAX_HIT_POINTS)
            .appearance(Appearance::Slime)
            .creature(BlockMask::WALK);
        entity.hit_points = hit_points.min(SLIME_MAX_HIT_POINTS);
        let id = entity.id;
        self.add_controller(ControllerKind::Slime {
            entity: id,
            split_cooldown: config.creatures.slime_split_cooldown,
        });
        self.add_handler(Some(id), HandlerKind::SlimeSplit);
        id
    }

    /// A lich commanding `skeletons`; dies taking them along.
    pub fn spawn_lich(&mut self, pos: Pos, skeletons: SkeletonIds) -> (EntityId, ControllerId) {
        let id = self
            .add_entity(pos)
            .hit_points(10)
            .appearance(Appearance::Lich)
            .creature(BlockMask::WALK)
            .id;
        let controller = self.add_controller(ControllerKind::Lich {
            lich: Some(id),
            skeletons,
            heal_cooldown: 0,
        });
        self.add_handler(Some(id), HandlerKind::LichDeath { controller });
        (id, controller)
    }

    /// A skeleton without a master. Attach it with [`GameState::assign_skeleton`].
    pub fn spawn_skeleton(&mut self, pos: Pos) -> EntityId {
        self.add_entity(pos)
            .hit_points(10)
            .appearance(Appearance::Skeleton)
            .creature(BlockMask::WALK)
            .id
    }

    /// Puts a skeleton under a lich controller. Fails when the controller is
    /// not a lich or already commands the maximum number of skeletons.
    pub fn assign_skeleton(&mut self, controller: ControllerId, skeleton: EntityId) -> bool {
        match self.controller_mut(controller).map(|c| &mut c.kind) {
            Some(ControllerKind::Lich { skeletons, .. }) => skeletons.try_push(skeleton).is_ok(),
            _ => false,
        }
    }

    pub fn spawn_dragon(&mut self, pos: Pos) -> EntityId {
        let id = self
            .add_entity(pos)
            .hit_points(100)
            .appearance(Appearance::RedDragon)
            .creature(BlockMask::WALK)
            .id;
        self.add_controller(ControllerKind::Dragon { entity: id });
        id
    }

    pub fn spawn_bat(&mut self, pos: Pos) -> EntityId {
        let id = self
            .add_entity(pos)
            .hit_points(5)
            .appearance(Appearance::Bat)
            .creature(BlockMask::FLY)
            .id;
        self.add_controller(ControllerKind::RandomMove { entity: id });
        id
    }

    pub fn spawn_spider(&mut self, pos: Pos, kind: SpiderKind, config: &GameConfig) -> EntityId {
        let id = self
            .add_entity(pos)
            .hit_points(kind.hit_points())
            .appearance(kind.appearance())
            .creature(BlockMask::WALK)
            .flags(EntityFlags::WEB_WALKER)
            .id;
        let controller = match kind {
            SpiderKind::Normal => ControllerKind::SpiderNormal { entity: id },
            SpiderKind::Web => ControllerKind::SpiderWeb {
                entity: id,
                web_cooldown: config.creatures.spider_web_cooldown,
            },
            SpiderKind::Poison => ControllerKind::SpiderPoison { entity: id },
            SpiderKind::Shadow => ControllerKind::SpiderShadow { entity: id },
        };
        self.add_controller(controller);
        id
    }

    /// A closed wooden door: blocks movement and sight until opened.
    pub fn spawn_door(&mut self, pos: Pos) -> EntityId {
        let entity = self
            .add_entity(pos)
            .hit_points(5)
            .appearance(Appearance::DoorClosed)
            .flags(EntityFlags::BLOCKS_VISION)
            .default_action(DefaultAction::OpenDoor);
        entity.block_mask = BlockMask::all();
        entity.id
    }

    /// A hex trap that burns whatever steps on it.
    pub fn spawn_fireball_trap(&mut self, pos: Pos) -> EntityId {
        let id = self
            .add_entity(pos)
            .hit_points(1)
            .appearance(Appearance::TrapHex)
            .id;
        self.add_handler(Some(id), HandlerKind::TrapFireball { pos });
        id
    }
}
