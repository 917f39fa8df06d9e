//! Levels drawn as ASCII art.
//!
//! The cursor starts at (1, 1). A newline returns it to column 1 of the next
//! row; every other character writes the cell under the cursor and advances
//! one column. Characters outside the symbol table only advance.
//!
//! | symbol | cell |
//! |--------|------|
//! | `#` `x` | wood / fancy wall |
//! | `.` | floor |
//! | `~` | water |
//! | `@` | floor, the player starts here |
//! | `w` | floor with a spider web |
//! | `s` | floor with a slime |
//! | `L` | floor with a lich |
//! | `S` | floor with a skeleton serving the latest lich |
//! | `d` | floor with a red dragon |
//! | `b` | floor with a bat |
//! | `^` | floor with a fireball trap |
//! | `v` | floor that drops away once left |
//! | `+` | floor with a closed door |
//! | `1`..`4` | floor with a normal, web, poison or shadow spider |

use game_core::{
    Appearance, ControllerId, GameConfig, GameRng, GameState, HandlerKind, Pos, SkeletonIds,
    SpiderKind, Tile,
};

const FLOOR: Tile = Tile::floor(Appearance::FloorRock);

/// Skeletons seen before any lich wait here and serve the first lich that
/// appears; later skeletons serve the most recent lich.
#[derive(Default)]
struct LichCommand {
    current: Option<ControllerId>,
    waiting: SkeletonIds,
}

/// Builds a fresh world from `text`.
pub fn build_from_ascii(config: &GameConfig, rng: &mut GameRng, text: &str) -> GameState {
    let mut state = GameState::new(config);
    let mut command = LichCommand::default();
    let (mut x, mut y) = (1i32, 1i32);

    for symbol in text.chars() {
        if symbol == '\n' {
            x = 1;
            y += 1;
            continue;
        }
        if let Some(pos) = Pos::try_new(x, y) {
            place(&mut state, config, rng, &mut command, symbol, pos);
        }
        x += 1;
    }

    if !command.waiting.is_empty() {
        tracing::warn!(
            skeletons = command.waiting.len(),
            "skeletons without a lich are left uncontrolled"
        );
    }

    state.update_fov();
    tracing::debug!(
        entities = state.entities().len(),
        controllers = state.controllers().len(),
        handlers = state.handlers().len(),
        player = %state.player().pos,
        "built level from template"
    );
    state
}

fn place(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut GameRng,
    command: &mut LichCommand,
    symbol: char,
    pos: Pos,
) {
    let tile = match symbol {
        '#' => Tile::wall(Appearance::WallWood),
        'x' => Tile::wall(Appearance::WallFancy),
        '~' => Tile::water(),
        '.' | '@' | 'w' | 's' | 'L' | 'S' | 'd' | 'b' | '^' | 'v' | '+' | '1'..='4' => FLOOR,
        _ => return,
    };
    state.tiles.set(pos, tile);

    match symbol {
        '@' => state.player_mut().pos = pos,
        'w' => {
            state.spawn_web(pos, rng);
        }
        's' => {
            state.spawn_slime(pos, 5, config);
        }
        'L' => {
            let (_, controller) = state.spawn_lich(pos, std::mem::take(&mut command.waiting));
            command.current = Some(controller);
        }
        'S' => {
            let skeleton = state.spawn_skeleton(pos);
            let joined = match command.current {
                Some(controller) => state.assign_skeleton(controller, skeleton),
                None => command.waiting.try_push(skeleton).is_ok(),
            };
            if !joined {
                tracing::warn!(%pos, "skeleton could not join a lich, too many skeletons");
            }
        }
        'd' => {
            state.spawn_dragon(pos);
        }
        'b' => {
            state.spawn_bat(pos);
        }
        '^' => {
            state.spawn_fireball_trap(pos);
        }
        'v' => {
            state.add_handler(None, HandlerKind::DropTile { pos });
        }
        '+' => {
            state.spawn_door(pos);
        }
        '1'..='4' => {
            let kind = SpiderKind::ALL[symbol as usize - '1' as usize];
            state.spawn_spider(pos, kind, config);
        }
        _ => {}
    }
}
