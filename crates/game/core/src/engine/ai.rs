//! Controller decision making.
//!
//! Every controller turns the current (pre-move) state into at most one
//! action per driven entity. Creatures only react to the player when their
//! cell is currently in the player's field of vision.

use std::collections::BTreeMap;

use super::GameEngine;
use crate::action::{Action, ProposedAction};
use crate::grid::{NEIGHBOURS_8, Pos};
use crate::pathfinding::DijkstraMap;
use crate::state::{BlockMask, ControllerKind, DefaultAction, Entity, EntityId, HandlerKind};

/// Distance fields toward the player, one per movement type, built lazily
/// and shared by every controller within a tick.
#[derive(Default)]
pub(super) struct PathCache {
    maps: BTreeMap<u8, DijkstraMap>,
}

impl PathCache {
    fn toward_player(&mut self, engine: &GameEngine<'_>, movement: BlockMask) -> &DijkstraMap {
        self.maps.entry(movement.bits()).or_insert_with(|| {
            let grid = engine.state.passability_grid(movement);
            DijkstraMap::calculate(&grid, engine.state.player().pos)
        })
    }
}

type Attack = fn(EntityId) -> Action;

fn bump(target: EntityId) -> Action {
    Action::BumpAttack { target }
}

fn bump_poison(target: EntityId) -> Action {
    Action::BumpAttackPoison { target }
}

impl GameEngine<'_> {
    /// Runs one controller. Returns the controller with its cooldowns and
    /// pending input updated, plus its proposals.
    pub(super) fn propose(
        &mut self,
        kind: ControllerKind,
        paths: &mut PathCache,
    ) -> (ControllerKind, Vec<ProposedAction>) {
        let mut proposals = Vec::new();
        let kind = match kind {
            ControllerKind::Player { entity, pending } => {
                if let Some(action) = pending {
                    if self.state.player_alive() {
                        let action = self.player_intent(action);
                        proposals.push(ProposedAction::new(entity, action));
                    }
                }
                ControllerKind::Player {
                    entity,
                    pending: None,
                }
            }
            ControllerKind::RandomMove { entity } => {
                if let Some(me) = self.living(entity) {
                    let action = self.wander(&me);
                    proposals.push(ProposedAction::new(entity, action));
                }
                ControllerKind::RandomMove { entity }
            }
            ControllerKind::Dragon { entity } => {
                self.chase_into(entity, bump, paths, &mut proposals);
                ControllerKind::Dragon { entity }
            }
            ControllerKind::Slime {
                entity,
                split_cooldown,
            } => {
                self.chase_into(entity, bump, paths, &mut proposals);
                ControllerKind::Slime {
                    entity,
                    split_cooldown: split_cooldown.saturating_sub(1),
                }
            }
            ControllerKind::Lich {
                lich,
                skeletons,
                heal_cooldown,
            } => {
                let mut heal_cooldown = heal_cooldown.saturating_sub(1);
                if let Some(me) = lich.and_then(|id| self.living(id)) {
                    let wounded = skeletons
                        .iter()
                        .filter_map(|id| self.living(*id))
                        .filter(|s| s.hit_points < s.max_hit_points)
                        .min_by_key(|s| s.hit_points - s.max_hit_points);
                    let action = match wounded {
                        Some(target) if heal_cooldown == 0 => {
                            heal_cooldown = self.config.creatures.lich_heal_cooldown;
                            Action::Heal {
                                target: target.id,
                                amount: self.config.combat.heal_amount,
                            }
                        }
                        _ => self.attack_if_adjacent(&me, bump),
                    };
                    proposals.push(ProposedAction::new(me.id, action));
                }
                for skeleton in &skeletons {
                    self.chase_into(*skeleton, bump, paths, &mut proposals);
                }
                ControllerKind::Lich {
                    lich,
                    skeletons,
                    heal_cooldown,
                }
            }
            ControllerKind::SpiderNormal { entity } => {
                self.chase_into(entity, bump, paths, &mut proposals);
                ControllerKind::SpiderNormal { entity }
            }
            ControllerKind::SpiderWeb {
                entity,
                web_cooldown,
            } => {
                let mut web_cooldown = web_cooldown.saturating_sub(1);
                if let Some(me) = self.living(entity) {
                    let action = match self.visible_player(&me) {
                        Some(target)
                            if web_cooldown == 0
                                && !me.pos.is_adjacent(target)
                                && me.pos.chebyshev(target)
                                    <= self.config.creatures.spider_web_range
                                && !self.has_web(target) =>
                        {
                            web_cooldown = self.config.creatures.spider_web_cooldown;
                            Action::ShootWeb { target }
                        }
                        _ => self.chase(&me, bump, paths),
                    };
                    proposals.push(ProposedAction::new(entity, action));
                }
                ControllerKind::SpiderWeb {
                    entity,
                    web_cooldown,
                }
            }
            ControllerKind::SpiderPoison { entity } => {
                self.chase_into(entity, bump_poison, paths, &mut proposals);
                ControllerKind::SpiderPoison { entity }
            }
            ControllerKind::SpiderShadow { entity } => {
                if let Some(me) = self.living(entity) {
                    let action = self.lurk(&me, paths);
                    proposals.push(ProposedAction::new(entity, action));
                }
                ControllerKind::SpiderShadow { entity }
            }
        };
        (kind, proposals)
    }

    fn living(&self, id: EntityId) -> Option<Entity> {
        self.state.entity(id).filter(|e| e.is_alive()).cloned()
    }

    /// The player's position, if the player is alive and can see `me`.
    fn visible_player(&self, me: &Entity) -> Option<Pos> {
        let player = self.state.player();
        (player.is_alive() && self.state.field_of_vision().is_visible(me.pos)).then_some(player.pos)
    }

    fn has_web(&self, pos: Pos) -> bool {
        self.state
            .handlers()
            .iter()
            .any(|h| matches!(h.kind, HandlerKind::PreventExit { pos: p } if p == pos))
    }

    /// Moving the player into something usually means acting on it.
    fn player_intent(&self, action: Action) -> Action {
        let Action::Move { end, .. } = action else {
            return action;
        };
        let target = self
            .state
            .entities_at(end)
            .find(|e| e.id != EntityId::PLAYER && e.default_action != DefaultAction::None);
        match target.map(|t| (t.id, t.default_action)) {
            Some((target, DefaultAction::BumpAttack)) => Action::BumpAttack { target },
            Some((door, DefaultAction::OpenDoor)) => Action::OpenDoor { door },
            Some((_, DefaultAction::None)) | None => action,
        }
    }

    fn attack_if_adjacent(&self, me: &Entity, attack: Attack) -> Action {
        match self.visible_player(me) {
            Some(target) if me.pos.is_adjacent(target) => attack(EntityId::PLAYER),
            _ => Action::None,
        }
    }

    fn chase_into(
        &mut self,
        entity: EntityId,
        attack: Attack,
        paths: &mut PathCache,
        proposals: &mut Vec<ProposedAction>,
    ) {
        if let Some(me) = self.living(entity) {
            let action = self.chase(&me, attack, paths);
            proposals.push(ProposedAction::new(entity, action));
        }
    }

    /// Attack when adjacent, otherwise step down the distance field.
    fn chase(&self, me: &Entity, attack: Attack, paths: &mut PathCache) -> Action {
        let Some(target) = self.visible_player(me) else {
            return Action::None;
        };
        if me.pos.is_adjacent(target) {
            return attack(EntityId::PLAYER);
        }
        match paths.toward_player(self, me.movement_type).downhill(me.pos) {
            Some(end) => Action::Move { start: me.pos, end },
            None => Action::None,
        }
    }

    fn wander(&mut self, me: &Entity) -> Action {
        if let Action::BumpAttack { target } = self.attack_if_adjacent(me, bump) {
            return Action::BumpAttack { target };
        }
        let (dx, dy) = NEIGHBOURS_8[self.rng.below(NEIGHBOURS_8.len() as u32) as usize];
        match me.pos.offset(dx, dy) {
            Some(end) => Action::Move { start: me.pos, end },
            None => Action::None,
        }
    }

    /// Shadow spiders fade out while approaching and show themselves to strike.
    fn lurk(&self, me: &Entity, paths: &mut PathCache) -> Action {
        let Some(target) = self.visible_player(me) else {
            return Action::None;
        };
        match (me.pos.is_adjacent(target), me.is_invisible()) {
            (true, true) => Action::SetInvisible { invisible: false },
            (true, false) => bump(EntityId::PLAYER),
            (false, false) => Action::SetInvisible { invisible: true },
            (false, true) => self.chase(me, bump, paths),
        }
    }
}
