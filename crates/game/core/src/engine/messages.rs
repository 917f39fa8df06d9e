//! Message dispatch: movement triggers, damage and death.

use super::GameEngine;
use super::collect::PlannedMove;
use crate::event::Event;
use crate::grid::Pos;
use crate::state::{
    BlockMask, ControllerKind, EntityId, HandlerKind, MessageMask, SpiderKind, Tile, TileKind,
};

impl GameEngine<'_> {
    /// Applies a single step, then notifies exit and enter listeners.
    /// Returns false if the mover died or vanished earlier in the tick.
    pub(super) fn apply_move(&mut self, mv: PlannedMove) -> bool {
        let Some(entity) = self.state.entity_mut(mv.entity) else {
            return false;
        };
        if !entity.is_alive() {
            return false;
        }
        entity.pos = mv.end;
        let flies = entity.movement_type.contains(BlockMask::FLY);
        self.emit(Event::Move {
            entity: mv.entity,
            start: mv.start,
            end: mv.end,
        });

        self.send_move_post_exit(mv);
        self.send_move_post_enter(mv);

        if !flies && self.state.tile_at(mv.end).kind == TileKind::Empty {
            self.kill(mv.entity);
        }
        true
    }

    fn send_move_post_exit(&mut self, mv: PlannedMove) {
        for id in self.state.handlers_matching(MessageMask::MOVE_POST_EXIT) {
            let Some(handler) = self.state.handler(id).cloned() else {
                continue;
            };
            if let HandlerKind::DropTile { pos } = handler.kind {
                if pos == mv.start {
                    self.state.remove_handler(id);
                    self.drop_tile(pos);
                }
            }
        }
    }

    fn send_move_post_enter(&mut self, mv: PlannedMove) {
        for id in self.state.handlers_matching(MessageMask::MOVE_POST_ENTER) {
            let Some(handler) = self.state.handler(id).cloned() else {
                continue;
            };
            if self.state.entity(mv.entity).is_none() {
                return;
            }
            match handler.kind {
                HandlerKind::TrapFireball { pos } if pos == mv.end => {
                    self.emit(Event::FireballHit {
                        pos,
                        target: mv.entity,
                    });
                    let source = handler.owner.unwrap_or(EntityId::NONE);
                    self.damage(mv.entity, self.config.combat.trap_fireball_damage, source);
                }
                HandlerKind::TrapSpiderCave { center, radius }
                    if mv.entity.is_player() && mv.end.distance_squared(center) <= radius * radius =>
                {
                    self.state.remove_handler(id);
                    self.drop_in_spiders(center);
                }
                _ => {}
            }
        }
    }

    /// The floor falls away. Anything left on it that cannot fly goes with it.
    fn drop_tile(&mut self, pos: Pos) {
        self.state.tiles.set(pos, Tile::EMPTY);
        self.emit(Event::TileDropped { pos });
        let fallen: Vec<EntityId> = self
            .state
            .entities_at(pos)
            .filter(|e| !e.movement_type.contains(BlockMask::FLY))
            .map(|e| e.id)
            .collect();
        for id in fallen {
            self.kill(id);
        }
    }

    /// One spider of each breed lands on free floor closest to `center`.
    fn drop_in_spiders(&mut self, center: Pos) {
        for kind in SpiderKind::ALL {
            let Some(pos) = self.free_cell_near(center, BlockMask::WALK) else {
                tracing::debug!(%center, "no room left for spiders");
                return;
            };
            let id = self.state.spawn_spider(pos, kind, self.config);
            self.emit(Event::CreatureDropIn { entity: id, pos });
        }
    }

    /// Nearest free cell by ring distance, raster order within a ring.
    fn free_cell_near(&self, center: Pos, movement: BlockMask) -> Option<Pos> {
        const SEARCH_RADIUS: i32 = 4;
        let player = self.state.player().pos;
        for ring in 0..=SEARCH_RADIUS {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    let Some(pos) = center.offset(dx, dy) else {
                        continue;
                    };
                    if pos != player && self.is_free(pos, movement) {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    /// Passable now and not the destination of a move still to be applied.
    fn is_free(&self, pos: Pos, movement: BlockMask) -> bool {
        !self.reserved.contains(&pos) && self.state.is_pos_passable(pos, movement)
    }

    /// Deals damage, lets the victim's damage listeners react, and kills it
    /// if its hit points run out.
    pub(super) fn damage(&mut self, target: EntityId, amount: i32, source: EntityId) {
        let Some(entity) = self.state.entity_mut(target) else {
            return;
        };
        if !entity.is_alive() {
            return;
        }
        entity.hit_points -= amount;
        let remaining = entity.hit_points;
        self.emit(Event::Damaged {
            entity: target,
            amount,
            source,
        });

        for id in self.state.handlers_owned_by(target).to_vec() {
            let Some(handler) = self.state.handler(id).cloned() else {
                continue;
            };
            if handler.mask.contains(MessageMask::DAMAGE)
                && matches!(handler.kind, HandlerKind::SlimeSplit)
                && remaining > 1
            {
                self.split_slime(target);
            }
        }

        if remaining <= 0 {
            self.kill(target);
        }
    }

    /// Runs pre-death listeners, reports the death and removes the entity.
    /// The player is only marked dead.
    pub(super) fn kill(&mut self, target: EntityId) {
        if !self.dying.insert(target) {
            return;
        }
        let Some(entity) = self.state.entity_mut(target) else {
            return;
        };
        entity.hit_points = entity.hit_points.min(0);
        let pos = entity.pos;

        for id in self.state.handlers_owned_by(target).to_vec() {
            let Some(handler) = self.state.handler(id).cloned() else {
                continue;
            };
            if !handler.mask.contains(MessageMask::PRE_DEATH) {
                continue;
            }
            if let HandlerKind::LichDeath { controller } = handler.kind {
                let skeletons = match self.state.controller(controller).map(|c| &c.kind) {
                    Some(ControllerKind::Lich { skeletons, .. }) => skeletons.clone(),
                    _ => continue,
                };
                for skeleton in skeletons {
                    self.kill(skeleton);
                }
            }
        }

        self.emit(Event::Death { entity: target, pos });
        if target.is_player() {
            tracing::info!(turn = self.state.turn(), "player died");
        } else {
            self.state.remove_entity(target);
        }
    }

    /// Half of a slime's hit points bud off into a new slime next to it.
    fn split_slime(&mut self, original: EntityId) {
        let ready = self.state.controllers().iter().any(|c| {
            matches!(c.kind, ControllerKind::Slime { entity, split_cooldown: 0 } if entity == original)
        });
        if !ready {
            return;
        }
        let Some(slime) = self.state.entity(original).cloned() else {
            return;
        };
        let free: Vec<Pos> = slime
            .pos
            .neighbours()
            .filter(|&p| self.is_free(p, slime.movement_type))
            .collect();
        let Some(&pos) = self.rng.choose(&free) else {
            return;
        };

        let budded = slime.hit_points / 2;
        if let Some(entity) = self.state.entity_mut(original) {
            entity.hit_points -= budded;
        }
        let spawned = self.state.spawn_slime(pos, budded, self.config);
        let cooldown = self.config.creatures.slime_split_cooldown;
        for controller in self.state.controllers_mut() {
            if let ControllerKind::Slime {
                entity,
                split_cooldown,
            } = &mut controller.kind
            {
                if *entity == original {
                    *split_cooldown = cooldown;
                }
            }
        }

        self.emit(Event::SlimeSplit {
            original,
            spawned,
            pos,
        });
    }
}
