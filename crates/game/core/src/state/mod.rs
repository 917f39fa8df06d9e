//! Authoritative simulation state.
//!
//! `GameState` owns the terrain, the entity store, controllers, message
//! handlers, the player's cards and the field-of-vision memory. Entities live
//! in a dense vector kept in insertion order; lookups go through an
//! `EntityId -> index` map, so no caller may rely on an entity's index
//! surviving a removal.

mod card;
mod controller;
mod entity;
mod handler;
mod spawn;
mod tile;

use std::collections::BTreeMap;

pub use card::{Card, CardId, CardState, Draw};
pub use controller::{Controller, ControllerId, ControllerKind, DrivenEntities, SkeletonIds};
pub use entity::{BlockMask, DefaultAction, Entity, EntityFlags, EntityId};
pub use handler::{HandlerId, HandlerKind, MessageHandler, MessageMask};
pub use spawn::SpiderKind;
pub use tile::{Appearance, Tile, TileKind, TileMap};

use crate::config::GameConfig;
use crate::fov::{FieldOfVision, calculate_fov};
use crate::grid::{BoolGrid, Pos};

#[derive(Clone, Debug)]
pub struct GameState {
    pub tiles: TileMap,
    pub cards: CardState,
    entities: Vec<Entity>,
    index: BTreeMap<EntityId, usize>,
    controllers: Vec<Controller>,
    handlers: Vec<MessageHandler>,
    handler_owners: BTreeMap<EntityId, Vec<HandlerId>>,
    fov: FieldOfVision,
    turn: u64,
    next_entity_id: u32,
    next_controller_id: u32,
    next_handler_id: u32,
}

impl GameState {
    /// Creates an empty world holding only the player and its controller.
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            tiles: TileMap::new(),
            cards: CardState::new(),
            entities: Vec::new(),
            index: BTreeMap::new(),
            controllers: Vec::new(),
            handlers: Vec::new(),
            handler_owners: BTreeMap::new(),
            fov: FieldOfVision::new(),
            turn: 0,
            next_entity_id: EntityId::FIRST_DYNAMIC,
            next_controller_id: 0,
            next_handler_id: 0,
        };

        let mut player = Entity::new(EntityId::PLAYER, Pos::ORIGIN);
        player
            .hit_points(config.player_hit_points)
            .appearance(Appearance::Player)
            .creature(BlockMask::WALK);
        state.push_entity(player);
        state.add_controller(ControllerKind::Player {
            entity: EntityId::PLAYER,
            pending: None,
        });
        state
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub(crate) fn advance_turn(&mut self) -> u64 {
        self.turn += 1;
        self.turn
    }

    // ===== entities =====

    /// Spawns an entity at `pos` with a fresh id and default stats.
    pub fn add_entity(&mut self, pos: Pos) -> &mut Entity {
        let id = self.allocate_entity_id();
        let index = self.push_entity(Entity::new(id, pos));
        &mut self.entities[index]
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    fn push_entity(&mut self, entity: Entity) -> usize {
        let index = self.entities.len();
        self.index.insert(entity.id, index);
        self.entities.push(entity);
        index
    }

    /// Removes an entity together with everything that belongs to it: its
    /// slot in controllers and every message handler it owns. The player is
    /// never removed.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        if id == EntityId::PLAYER {
            return None;
        }
        let index = self.index.remove(&id)?;
        let entity = self.entities.remove(index);
        for (slot, e) in self.entities.iter().enumerate().skip(index) {
            self.index.insert(e.id, slot);
        }

        self.controllers.retain_mut(|c| !c.kind.forget(id));

        if let Some(owned) = self.handler_owners.remove(&id) {
            self.handlers.retain(|h| !owned.contains(&h.id));
        }

        tracing::trace!(entity = %id, "removed entity");
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = *self.index.get(&id)?;
        Some(&mut self.entities[index])
    }

    pub fn player(&self) -> &Entity {
        // The player is inserted first and can never be removed.
        &self.entities[0]
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.entities[0]
    }

    pub fn player_alive(&self) -> bool {
        self.player().is_alive()
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_at(&self, pos: Pos) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |e| e.pos == pos)
    }

    /// First entity at `pos` whose block mask stops `movement`.
    pub fn blocker_at(&self, pos: Pos, movement: BlockMask) -> Option<&Entity> {
        self.entities_at(pos).find(|e| e.blocks(movement))
    }

    // ===== terrain queries =====

    pub fn tile_at(&self, pos: Pos) -> Tile {
        self.tiles.get(pos)
    }

    /// Walls and vision-blocking entities are opaque.
    pub fn is_opaque(&self, pos: Pos) -> bool {
        self.tiles.get(pos).is_opaque() || self.entities_at(pos).any(Entity::blocks_vision)
    }

    /// Whether a mover with `movement` could step onto `pos` right now.
    pub fn is_pos_passable(&self, pos: Pos, movement: BlockMask) -> bool {
        self.tiles.get(pos).is_passable(movement) && self.blocker_at(pos, movement).is_none()
    }

    pub fn opacity_grid(&self) -> BoolGrid {
        let mut grid = BoolGrid::new();
        for (pos, tile) in self.tiles.iter() {
            if tile.is_opaque() {
                grid.set(pos);
            }
        }
        for entity in self.entities.iter().filter(|e| e.blocks_vision()) {
            grid.set(entity.pos);
        }
        grid
    }

    /// Terrain passability for `movement`, ignoring entities.
    pub fn passability_grid(&self, movement: BlockMask) -> BoolGrid {
        let mut grid = BoolGrid::new();
        for (pos, tile) in self.tiles.iter() {
            if tile.is_passable(movement) {
                grid.set(pos);
            }
        }
        grid
    }

    // ===== field of vision =====

    pub fn field_of_vision(&self) -> &FieldOfVision {
        &self.fov
    }

    /// Recomputes what the player sees and folds it into the memory.
    /// Returns whether any cell changed state.
    pub fn update_fov(&mut self) -> bool {
        let can_see = calculate_fov(&self.opacity_grid(), self.player().pos);
        self.fov.update(&can_see)
    }

    // ===== controllers =====

    pub fn add_controller(&mut self, kind: ControllerKind) -> ControllerId {
        let id = ControllerId(self.next_controller_id);
        self.next_controller_id += 1;
        self.controllers.push(Controller { id, kind });
        id
    }

    /// Controllers in registration order.
    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub(crate) fn controllers_mut(&mut self) -> &mut [Controller] {
        &mut self.controllers
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.id == id)
    }

    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.iter_mut().find(|c| c.id == id)
    }

    pub fn controller_of(&self, entity: EntityId) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.kind.drives(entity))
    }

    pub fn is_controlled(&self, entity: EntityId) -> bool {
        self.controller_of(entity).is_some()
    }

    /// Stores the next action of the player controller driving `entity`.
    pub(crate) fn set_pending_action(&mut self, entity: EntityId, action: crate::action::Action) {
        for controller in &mut self.controllers {
            if let ControllerKind::Player {
                entity: driven,
                pending,
            } = &mut controller.kind
            {
                if *driven == entity {
                    *pending = Some(action);
                }
            }
        }
    }

    // ===== message handlers =====

    /// Registers a handler listening on its kind's default mask.
    pub fn add_handler(&mut self, owner: Option<EntityId>, kind: HandlerKind) -> HandlerId {
        let mask = kind.default_mask();
        self.add_handler_with_mask(owner, mask, kind)
    }

    pub fn add_handler_with_mask(
        &mut self,
        owner: Option<EntityId>,
        mask: MessageMask,
        kind: HandlerKind,
    ) -> HandlerId {
        let id = HandlerId(self.next_handler_id);
        self.next_handler_id += 1;
        self.handlers.push(MessageHandler {
            id,
            owner,
            mask,
            kind,
        });
        if let Some(owner) = owner {
            self.handler_owners.entry(owner).or_default().push(id);
        }
        id
    }

    pub fn remove_handler(&mut self, id: HandlerId) -> Option<MessageHandler> {
        let index = self.handlers.iter().position(|h| h.id == id)?;
        let handler = self.handlers.remove(index);
        if let Some(owner) = handler.owner {
            if let Some(owned) = self.handler_owners.get_mut(&owner) {
                owned.retain(|h| *h != id);
                if owned.is_empty() {
                    self.handler_owners.remove(&owner);
                }
            }
        }
        Some(handler)
    }

    pub fn handlers(&self) -> &[MessageHandler] {
        &self.handlers
    }

    pub fn handler(&self, id: HandlerId) -> Option<&MessageHandler> {
        self.handlers.iter().find(|h| h.id == id)
    }

    /// Ids of handlers subscribed to any bit of `mask`, registration order.
    pub fn handlers_matching(&self, mask: MessageMask) -> Vec<HandlerId> {
        self.handlers
            .iter()
            .filter(|h| h.mask.intersects(mask))
            .map(|h| h.id)
            .collect()
    }

    pub fn handlers_owned_by(&self, owner: EntityId) -> &[HandlerId] {
        self.handler_owners
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(&GameConfig::default())
    }

    #[test]
    fn player_is_created_first_with_reserved_id() {
        let state = state();
        assert_eq!(state.player().id, EntityId::PLAYER);
        assert_eq!(state.player().hit_points, GameConfig::DEFAULT_PLAYER_HIT_POINTS);
        assert!(matches!(
            state.controllers()[0].kind,
            ControllerKind::Player { .. }
        ));
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut state = state();
        let a = state.add_entity(Pos::new(1, 1)).id;
        let b = state.add_entity(Pos::new(2, 1)).id;
        assert_eq!(a, EntityId(EntityId::FIRST_DYNAMIC));
        assert!(b > a);
        state.remove_entity(a);
        let c = state.add_entity(Pos::new(3, 1)).id;
        assert!(c > b);
    }

    #[test]
    fn removal_keeps_other_ids_and_lookups_valid() {
        let mut state = state();
        let ids: Vec<_> = (0..5)
            .map(|i| state.add_entity(Pos::new(i + 1, 1)).id)
            .collect();
        state.remove_entity(ids[1]);

        assert!(state.entity(ids[1]).is_none());
        for &id in [ids[0], ids[2], ids[3], ids[4]].iter() {
            assert_eq!(state.entity(id).map(|e| e.id), Some(id));
        }
        assert_eq!(state.entity(ids[3]).map(|e| e.pos), Some(Pos::new(4, 1)));
    }

    #[test]
    fn removal_cascades_to_handlers_and_controllers() {
        let mut state = state();
        let web = state.add_entity(Pos::new(3, 3)).id;
        let pos = Pos::new(3, 3);
        state.add_handler(Some(web), HandlerKind::PreventExit { pos });
        state.add_handler(Some(web), HandlerKind::PreventEnter { pos });
        let floor = state.add_handler(None, HandlerKind::DropTile { pos });
        let dragon = state.add_entity(Pos::new(5, 5)).id;
        state.add_controller(ControllerKind::Dragon { entity: dragon });

        state.remove_entity(web);
        assert_eq!(state.handlers().len(), 1);
        assert_eq!(state.handlers()[0].id, floor);
        assert!(state.handlers_owned_by(web).is_empty());

        assert!(state.is_controlled(dragon));
        state.remove_entity(dragon);
        assert!(!state.is_controlled(dragon));
        assert_eq!(state.controllers().len(), 1);
    }

    #[test]
    fn player_cannot_be_removed() {
        let mut state = state();
        assert!(state.remove_entity(EntityId::PLAYER).is_none());
        assert_eq!(state.player().id, EntityId::PLAYER);
    }

    #[test]
    fn vision_blocking_entities_are_opaque() {
        let mut state = state();
        let pos = Pos::new(4, 4);
        state.tiles.set(pos, Tile::floor(Appearance::FloorStone));
        assert!(!state.is_opaque(pos));
        state.add_entity(pos).flags(EntityFlags::BLOCKS_VISION);
        assert!(state.is_opaque(pos));
        assert!(state.opacity_grid().get(pos));
    }

    #[test]
    fn blocking_entity_makes_cell_impassable_for_matching_movers() {
        let mut state = state();
        let pos = Pos::new(4, 4);
        state.tiles.set(pos, Tile::floor(Appearance::FloorStone));
        assert!(state.is_pos_passable(pos, BlockMask::WALK));
        state.add_entity(pos).block_mask = BlockMask::WALK;
        assert!(!state.is_pos_passable(pos, BlockMask::WALK));
        assert!(state.is_pos_passable(pos, BlockMask::FLY));
    }
}
