//! Registry of the built-in levels.

use game_core::{Appearance, BoolGrid, GameConfig, GameRng, GameState, HandlerKind, Pos, Tile};

use crate::cellular;
use crate::template::build_from_ascii;

/// Builds a complete world from a configuration and a random stream.
pub type BuildLevel = fn(&GameConfig, &mut GameRng) -> GameState;

#[derive(Clone, Copy)]
pub struct LevelDefinition {
    pub name: &'static str,
    pub build: BuildLevel,
}

impl std::fmt::Debug for LevelDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub const DEFAULT_LEVEL: &str = "default";

pub const LEVELS: &[LevelDefinition] = &[
    LevelDefinition {
        name: DEFAULT_LEVEL,
        build: default_level,
    },
    LevelDefinition {
        name: "anim_test",
        build: anim_test,
    },
    LevelDefinition {
        name: "slime_test",
        build: slime_test,
    },
    LevelDefinition {
        name: "lich_test",
        build: lich_test,
    },
    LevelDefinition {
        name: "field_of_vision_test",
        build: field_of_vision_test,
    },
    LevelDefinition {
        name: "spider_room",
        build: spider_room,
    },
];

pub fn find_level(name: &str) -> Option<&'static LevelDefinition> {
    LEVELS.iter().find(|level| level.name == name)
}

pub fn level_names() -> impl Iterator<Item = &'static str> {
    LEVELS.iter().map(|level| level.name)
}

fn default_level(config: &GameConfig, rng: &mut GameRng) -> GameState {
    build_from_ascii(config, rng, include_str!("../data/levels/default.txt"))
}

/// A row of bats over fireball traps.
fn anim_test(config: &GameConfig, rng: &mut GameRng) -> GameState {
    build_from_ascii(config, rng, include_str!("../data/levels/anim_test.txt"))
}

fn slime_test(config: &GameConfig, rng: &mut GameRng) -> GameState {
    build_from_ascii(config, rng, include_str!("../data/levels/slime_test.txt"))
}

fn lich_test(config: &GameConfig, rng: &mut GameRng) -> GameState {
    build_from_ascii(config, rng, include_str!("../data/levels/lich_test.txt"))
}

/// Scattered pillars for eyeballing shadows.
fn field_of_vision_test(config: &GameConfig, rng: &mut GameRng) -> GameState {
    build_from_ascii(
        config,
        rng,
        include_str!("../data/levels/field_of_vision_test.txt"),
    )
}

const SPIDER_ROOM_ORIGIN: Pos = Pos::new(10, 10);
const SPIDER_ROOM_SIZE: u32 = 40;

/// A cellular cave with a spider nest waiting at its heart.
fn spider_room(config: &GameConfig, rng: &mut GameRng) -> GameState {
    let mut state = GameState::new(config);
    let cave = cellular::generate(rng, &config.cave, SPIDER_ROOM_SIZE, SPIDER_ROOM_SIZE);

    let mut floors = BoolGrid::new();
    let mut player = SPIDER_ROOM_ORIGIN;
    let mut seen = 0;
    for y in 0..cave.height() {
        for x in 0..cave.width() {
            let local = Pos::new(x as u8, y as u8);
            let Some(pos) = SPIDER_ROOM_ORIGIN.offset(x as i32, y as i32) else {
                continue;
            };
            if cave.is_wall(local) {
                state.tiles.set(pos, Tile::wall(Appearance::WallBrownRock));
                continue;
            }
            state.tiles.set(pos, Tile::floor(Appearance::FloorRock));
            floors.set(pos);
            // reservoir sampling keeps every floor equally likely
            seen += 1;
            if rng.below(seen) == 0 {
                player = pos;
            }
        }
    }
    state.player_mut().pos = player;

    if let Some(center) = center_of_mass(&floors) {
        state.add_handler(
            None,
            HandlerKind::TrapSpiderCave {
                center,
                radius: config.creatures.spider_cave_radius,
            },
        );
    }

    state.update_fov();
    tracing::debug!(
        width = cave.width(),
        height = cave.height(),
        floors = seen,
        player = %player,
        "built spider room"
    );
    state
}

/// The floor cell closest to the mean floor position, first in raster order
/// among equals.
fn center_of_mass(floors: &BoolGrid) -> Option<Pos> {
    let (mut sx, mut sy, mut n) = (0u64, 0u64, 0u64);
    for pos in floors.iter() {
        sx += u64::from(pos.x);
        sy += u64::from(pos.y);
        n += 1;
    }
    if n == 0 {
        return None;
    }
    let mean = Pos::new((sx / n) as u8, (sy / n) as u8);
    floors.iter().min_by_key(|&pos| pos.distance_squared(mean))
}
