use game_core::{
    Action, ActionError, Appearance, ControllerKind, EntityId, Event, EventKind, GameConfig,
    GameEngine, GameRng, GameState, HandlerKind, Pos, SkeletonIds, SpiderKind, Tile, TickOutcome,
};

/// Floor inside `(x0, y0)..=(x1, y1)`, walls on the rectangle's edge.
fn walled_room(state: &mut GameState, x0: u8, y0: u8, x1: u8, y1: u8) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            let tile = if x == x0 || x == x1 || y == y0 || y == y1 {
                Tile::wall(Appearance::WallBrownRock)
            } else {
                Tile::floor(Appearance::FloorStone)
            };
            state.tiles.set(Pos::new(x, y), tile);
        }
    }
}

/// A one-cell-high corridor from (1, 1) to (8, 1) with the player at `player`.
fn corridor(config: &GameConfig, player: Pos) -> GameState {
    let mut state = GameState::new(config);
    walled_room(&mut state, 0, 0, 9, 2);
    state.player_mut().pos = player;
    state.update_fov();
    state
}

fn tick(state: &mut GameState, config: &GameConfig, rng: &mut GameRng) -> TickOutcome {
    GameEngine::new(state, config, rng).tick()
}

fn walk(state: &mut GameState, to: Pos) {
    let from = state.player().pos;
    state
        .submit_action(EntityId::PLAYER, Action::Move { start: from, end: to })
        .expect("player move accepted");
}

fn kinds(outcome: &TickOutcome) -> Vec<EventKind> {
    outcome.events.iter().map(Event::kind).collect()
}

#[test]
fn follower_moves_into_the_cell_its_leader_vacates() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(7);
    let mut state = corridor(&config, Pos::new(5, 1));
    let a = state.spawn_dragon(Pos::new(1, 1));
    let b = state.spawn_dragon(Pos::new(2, 1));

    let outcome = tick(&mut state, &config, &mut rng);

    assert_eq!(outcome.moves.moved, vec![b]);
    assert_eq!(outcome.moves.promoted, vec![a]);
    assert_eq!(state.entity(a).map(|e| e.pos), Some(Pos::new(2, 1)));
    assert_eq!(state.entity(b).map(|e| e.pos), Some(Pos::new(3, 1)));

    let moves: Vec<EntityId> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Move { entity, .. } => Some(*entity),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![b, a]);
}

#[test]
fn ticks_are_numbered_and_end_committed() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));

    let first = tick(&mut state, &config, &mut rng);
    let second = tick(&mut state, &config, &mut rng);
    assert_eq!((first.turn, second.turn), (1, 2));
    assert_eq!(second.phase.as_str(), "committed");
    assert_eq!(state.turn(), 2);
}

#[test]
fn walking_into_a_wall_is_blocked() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));

    walk(&mut state, Pos::new(1, 2));
    let outcome = tick(&mut state, &config, &mut rng);

    assert_eq!(outcome.moves.blocked, vec![EntityId::PLAYER]);
    assert!(outcome.events.contains(&Event::MoveBlocked {
        entity: EntityId::PLAYER,
        start: Pos::new(1, 1),
        end: Pos::new(1, 2),
    }));
    assert_eq!(state.player().pos, Pos::new(1, 1));
}

#[test]
fn pending_input_is_consumed_by_one_tick() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));

    walk(&mut state, Pos::new(2, 1));
    tick(&mut state, &config, &mut rng);
    let idle = tick(&mut state, &config, &mut rng);

    assert_eq!(state.player().pos, Pos::new(2, 1));
    assert!(idle.moves.moved.is_empty());
}

#[test]
fn walking_into_a_door_opens_it() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let door = state.spawn_door(Pos::new(2, 1));
    state.update_fov();
    assert!(!state.field_of_vision().is_visible(Pos::new(4, 1)));

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::DoorOpened {
        door,
        by: EntityId::PLAYER
    }));
    assert!(kinds(&outcome).contains(&EventKind::FieldOfVisionChanged));
    assert_eq!(state.player().pos, Pos::new(1, 1));
    assert!(!state.is_opaque(Pos::new(2, 1)));
    assert!(state.field_of_vision().is_visible(Pos::new(4, 1)));
    assert_eq!(
        state.entity(door).map(|d| d.appearance),
        Some(Appearance::DoorOpen)
    );
}

#[test]
fn fireball_trap_burns_whoever_steps_on_it() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let trap = state.spawn_fireball_trap(Pos::new(2, 1));

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    assert_eq!(
        kinds(&outcome)[..3],
        [EventKind::Move, EventKind::FireballHit, EventKind::Damaged]
    );
    assert!(outcome.events.contains(&Event::Damaged {
        entity: EntityId::PLAYER,
        amount: config.combat.trap_fireball_damage,
        source: trap,
    }));
    assert_eq!(
        state.player().hit_points,
        GameConfig::DEFAULT_PLAYER_HIT_POINTS - config.combat.trap_fireball_damage
    );
}

#[test]
fn crumbling_floor_drops_after_it_is_left() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let start = Pos::new(1, 1);
    state.add_handler(None, HandlerKind::DropTile { pos: start });

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::TileDropped { pos: start }));
    assert_eq!(state.tile_at(start), Tile::EMPTY);
    assert!(state.handlers().is_empty());
    assert!(state.player_alive());

    // nothing can walk back onto the hole
    walk(&mut state, start);
    let outcome = tick(&mut state, &config, &mut rng);
    assert_eq!(outcome.moves.blocked, vec![EntityId::PLAYER]);
}

#[test]
fn web_holds_the_player_once_then_tears() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let web = state.spawn_web(Pos::new(1, 1), &mut rng);

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);
    assert!(outcome.events.contains(&Event::Stuck {
        entity: EntityId::PLAYER,
        pos: Pos::new(1, 1),
    }));
    assert_eq!(state.player().pos, Pos::new(1, 1));
    assert!(state.entity(web).is_none());
    assert!(state.handlers().is_empty());

    walk(&mut state, Pos::new(2, 1));
    tick(&mut state, &config, &mut rng);
    assert_eq!(state.player().pos, Pos::new(2, 1));
}

#[test]
fn hitting_a_slime_splits_it() {
    let mut config = GameConfig::default();
    config.creatures.slime_split_cooldown = 0;
    let mut rng = GameRng::new(3);
    let mut state = corridor(&config, Pos::new(1, 1));
    let slime = state.spawn_slime(Pos::new(2, 1), 5, &config);

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    let spawned = outcome
        .events
        .iter()
        .find_map(|e| match *e {
            Event::SlimeSplit {
                original,
                spawned,
                pos,
            } => {
                assert_eq!(original, slime);
                assert_eq!(pos, Pos::new(3, 1));
                Some(spawned)
            }
            _ => None,
        })
        .expect("slime split");
    assert_eq!(state.entity(slime).map(|e| e.hit_points), Some(2));
    assert_eq!(state.entity(spawned).map(|e| e.hit_points), Some(2));
    assert!(state.is_controlled(spawned));
}

#[test]
fn slime_on_cooldown_does_not_split() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(3);
    let mut state = corridor(&config, Pos::new(1, 1));
    state.spawn_slime(Pos::new(2, 1), 5, &config);

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    assert!(!kinds(&outcome).contains(&EventKind::SlimeSplit));
    assert!(kinds(&outcome).contains(&EventKind::BumpAttack));
}

#[test]
fn killing_a_lich_takes_its_skeletons_along() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let first = state.spawn_skeleton(Pos::new(5, 1));
    let second = state.spawn_skeleton(Pos::new(6, 1));
    let skeletons: SkeletonIds = [first, second].into_iter().collect();
    let (lich, _) = state.spawn_lich(Pos::new(2, 1), skeletons);
    if let Some(entity) = state.entity_mut(lich) {
        entity.hit_points = 1;
    }

    walk(&mut state, Pos::new(2, 1));
    let outcome = tick(&mut state, &config, &mut rng);

    let deaths: Vec<EntityId> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Death { entity, .. } => Some(*entity),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![first, second, lich]);
    for id in [lich, first, second] {
        assert!(state.entity(id).is_none());
    }
    assert_eq!(state.controllers().len(), 1);
    assert!(state.handlers().is_empty());
}

#[test]
fn lich_heals_its_most_wounded_skeleton() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(8, 1));
    let scratched = state.spawn_skeleton(Pos::new(3, 1));
    let wounded = state.spawn_skeleton(Pos::new(4, 1));
    if let Some(e) = state.entity_mut(scratched) {
        e.hit_points = 9;
    }
    if let Some(e) = state.entity_mut(wounded) {
        e.hit_points = 4;
    }
    let (lich, controller) = state.spawn_lich(Pos::new(1, 1), SkeletonIds::new());
    assert!(state.assign_skeleton(controller, scratched));
    assert!(state.assign_skeleton(controller, wounded));

    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::Heal {
        healer: lich,
        target: wounded,
        amount: config.combat.heal_amount,
    }));
    assert_eq!(
        state.entity(wounded).map(|e| e.hit_points),
        Some(4 + config.combat.heal_amount)
    );
    assert!(matches!(
        state.controller(controller).map(|c| &c.kind),
        Some(ControllerKind::Lich { heal_cooldown, .. })
            if *heal_cooldown == config.creatures.lich_heal_cooldown
    ));
}

#[test]
fn poison_spider_slips_a_card_into_the_discard_pile() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let spider = state.spawn_spider(Pos::new(2, 1), SpiderKind::Poison, &config);

    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::BumpAttack {
        attacker: spider,
        target: EntityId::PLAYER,
    }));
    assert!(outcome.events.contains(&Event::Poisoned {
        entity: EntityId::PLAYER
    }));
    assert_eq!(state.cards.total(), 1);
    assert_eq!(state.cards.discard[0].appearance, Appearance::CardPoison);
}

#[test]
fn web_spider_shoots_at_a_distant_player() {
    let mut config = GameConfig::default();
    config.creatures.spider_web_cooldown = 0;
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    let spider = state.spawn_spider(Pos::new(4, 1), SpiderKind::Web, &config);

    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::ShootWeb {
        shooter: spider,
        target: Pos::new(1, 1),
    }));
    assert!(
        state
            .handlers()
            .iter()
            .any(|h| h.kind == HandlerKind::PreventExit { pos: Pos::new(1, 1) })
    );

    // a web is already there, so the spider closes in instead
    let outcome = tick(&mut state, &config, &mut rng);
    assert!(!kinds(&outcome).contains(&EventKind::ShootWeb));
    assert_eq!(outcome.moves.moved, vec![spider]);
}

#[test]
fn spider_cave_springs_when_the_player_comes_close() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = GameState::new(&config);
    walled_room(&mut state, 0, 0, 12, 12);
    state.player_mut().pos = Pos::new(1, 1);
    state.update_fov();
    let center = Pos::new(6, 6);
    state.add_handler(
        None,
        HandlerKind::TrapSpiderCave {
            center,
            radius: config.creatures.spider_cave_radius,
        },
    );

    walk(&mut state, Pos::new(2, 2));
    let outcome = tick(&mut state, &config, &mut rng);

    let dropped: Vec<Pos> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Event::CreatureDropIn { pos, .. } => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(dropped.len(), SpiderKind::ALL.len());
    assert_eq!(dropped[0], center);
    assert!(state.handlers().is_empty());
    assert_eq!(state.controllers().len(), 1 + SpiderKind::ALL.len());
}

#[test]
fn spiders_never_land_where_a_creature_is_about_to_step() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = GameState::new(&config);
    walled_room(&mut state, 0, 0, 12, 12);
    state.player_mut().pos = Pos::new(1, 1);
    state.update_fov();
    let center = Pos::new(6, 6);
    state.add_handler(
        None,
        HandlerKind::TrapSpiderCave {
            center,
            radius: config.creatures.spider_cave_radius,
        },
    );
    // chases the player through (7, 5), which is also next to the cave
    let dragon = state.spawn_dragon(Pos::new(8, 6));

    walk(&mut state, Pos::new(2, 2));
    let outcome = tick(&mut state, &config, &mut rng);

    assert_eq!(outcome.moves.moved, vec![EntityId::PLAYER, dragon]);
    assert_eq!(state.entity(dragon).map(|e| e.pos), Some(Pos::new(7, 5)));
    let dropped: Vec<Pos> = outcome
        .events
        .iter()
        .filter_map(|e| match e {
            Event::CreatureDropIn { pos, .. } => Some(*pos),
            _ => None,
        })
        .collect();
    assert_eq!(
        dropped,
        vec![center, Pos::new(5, 5), Pos::new(6, 5), Pos::new(5, 6)]
    );

    let mut occupied = std::collections::BTreeSet::new();
    for entity in state.entities().iter().filter(|e| !e.block_mask.is_empty()) {
        assert!(occupied.insert(entity.pos), "two blockers on {}", entity.pos);
    }
}

#[test]
fn dead_player_stays_in_the_world_but_cannot_act() {
    let config = GameConfig::default().with_player_hit_points(1);
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    state.spawn_dragon(Pos::new(2, 1));

    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.events.contains(&Event::Death {
        entity: EntityId::PLAYER,
        pos: Pos::new(1, 1),
    }));
    assert!(!state.player_alive());
    assert_eq!(state.player().id, EntityId::PLAYER);

    let err = state
        .submit_action(
            EntityId::PLAYER,
            Action::Move {
                start: Pos::new(1, 1),
                end: Pos::new(1, 2),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::PlayerDead { .. }));

    // with the player gone, creatures have nothing to chase
    let quiet = tick(&mut state, &config, &mut rng);
    assert!(!kinds(&quiet).contains(&EventKind::BumpAttack));
}

#[test]
fn submissions_are_validated() {
    let config = GameConfig::default();
    let mut state = corridor(&config, Pos::new(1, 1));
    let dragon = state.spawn_dragon(Pos::new(6, 1));

    let far = Action::Move {
        start: Pos::new(1, 1),
        end: Pos::new(3, 1),
    };
    assert!(matches!(
        state.submit_action(EntityId::PLAYER, far),
        Err(ActionError::NotAdjacent { .. })
    ));
    let edge = Action::Move {
        start: Pos::new(1, 1),
        end: Pos::new(0, 0),
    };
    assert!(matches!(
        state.submit_action(EntityId::PLAYER, edge),
        Err(ActionError::OutOfBounds { .. })
    ));
    assert!(matches!(
        state.submit_action(EntityId(999), Action::None),
        Err(ActionError::UnknownEntity(EntityId(999)))
    ));
    assert!(matches!(
        state.submit_action(dragon, Action::None),
        Err(ActionError::NotPlayerControlled { actor }) if actor == dragon
    ));
}

#[test]
fn creatures_out_of_sight_stay_put() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = corridor(&config, Pos::new(1, 1));
    state.spawn_door(Pos::new(3, 1));
    let dragon = state.spawn_dragon(Pos::new(6, 1));
    state.update_fov();

    let outcome = tick(&mut state, &config, &mut rng);

    assert!(outcome.moves.moved.is_empty());
    assert_eq!(state.entity(dragon).map(|e| e.pos), Some(Pos::new(6, 1)));
}

#[test]
fn first_tick_reports_a_field_of_vision_change_only_when_it_changes() {
    let config = GameConfig::default();
    let mut rng = GameRng::new(1);
    let mut state = GameState::new(&config);
    walled_room(&mut state, 0, 0, 9, 2);
    state.player_mut().pos = Pos::new(1, 1);

    let first = tick(&mut state, &config, &mut rng);
    let second = tick(&mut state, &config, &mut rng);

    assert_eq!(first.events.last(), Some(&Event::FieldOfVisionChanged));
    assert!(!kinds(&second).contains(&EventKind::FieldOfVisionChanged));
}

#[test]
fn same_seed_same_story() {
    let config = GameConfig::default();
    let run = || {
        let mut rng = GameRng::new(42);
        let mut state = GameState::new(&config);
        walled_room(&mut state, 0, 0, 12, 12);
        state.player_mut().pos = Pos::new(6, 6);
        state.update_fov();
        for x in [2, 4, 8, 10] {
            state.spawn_bat(Pos::new(x, 2));
        }
        (0..20)
            .flat_map(|_| tick(&mut state, &config, &mut rng).events)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
