//! Plain-text map of what the player knows.
//!
//! Visible cells show terrain and everything standing on it. Remembered cells
//! show terrain and static objects only, with object letters in lower case.
//! Cells never seen stay blank.

use game_core::{Appearance, Entity, FieldOfVision, FovState, GameState, Pos, TileKind};

const DEAD_PLAYER: char = '%';

fn appearance_glyph(appearance: Appearance) -> Option<char> {
    let glyph = match appearance {
        Appearance::Player => '@',
        Appearance::Bat => 'B',
        Appearance::Slime => 'S',
        Appearance::Lich => 'L',
        Appearance::Skeleton => 'K',
        Appearance::RedDragon => 'D',
        Appearance::SpiderNormal
        | Appearance::SpiderWeb
        | Appearance::SpiderPoison
        | Appearance::SpiderShadow => 'A',
        Appearance::Web1 | Appearance::Web2 | Appearance::Web3 => 'W',
        Appearance::TrapHex => 'T',
        Appearance::DoorClosed => '+',
        Appearance::DoorOpen => '\'',
        _ => return None,
    };
    Some(glyph)
}

fn terrain_glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => ' ',
        TileKind::Floor => '.',
        TileKind::Wall => '#',
        TileKind::Water => '~',
    }
}

fn is_creature(state: &GameState, entity: &Entity) -> bool {
    entity.id.is_player() || state.is_controlled(entity.id)
}

fn visible_glyph(state: &GameState, pos: Pos) -> char {
    let mut object = None;
    for entity in state.entities_at(pos).filter(|e| !e.is_invisible()) {
        if entity.id.is_player() && !entity.is_alive() {
            return DEAD_PLAYER;
        }
        let Some(glyph) = appearance_glyph(entity.appearance) else {
            continue;
        };
        if is_creature(state, entity) {
            return glyph;
        }
        object.get_or_insert(glyph);
    }
    object.unwrap_or_else(|| terrain_glyph(state.tile_at(pos).kind))
}

fn remembered_glyph(state: &GameState, pos: Pos) -> char {
    state
        .entities_at(pos)
        .filter(|e| !is_creature(state, e) && !e.is_invisible())
        .find_map(|e| appearance_glyph(e.appearance))
        .map(|glyph| glyph.to_ascii_lowercase())
        .unwrap_or_else(|| terrain_glyph(state.tile_at(pos).kind))
}

pub fn glyph_at(state: &GameState, fov: &FieldOfVision, pos: Pos) -> char {
    match fov.get(pos) {
        FovState::NeverSeen => ' ',
        FovState::PreviouslySeen => remembered_glyph(state, pos),
        FovState::Visible => visible_glyph(state, pos),
    }
}

/// Renders the smallest rectangle holding every cell the player has seen.
pub fn render_map(state: &GameState, fov: &FieldOfVision) -> String {
    let seen: Vec<Pos> = (0..=u8::MAX)
        .flat_map(|y| (0..=u8::MAX).map(move |x| Pos::new(x, y)))
        .filter(|&pos| fov.get(pos) != FovState::NeverSeen)
        .collect();
    let Some(first) = seen.first() else {
        return String::new();
    };

    let (mut min_x, mut max_x) = (first.x, first.x);
    let (min_y, max_y) = (first.y, seen.last().map_or(first.y, |p| p.y));
    for pos in &seen {
        min_x = min_x.min(pos.x);
        max_x = max_x.max(pos.x);
    }

    let mut out = String::new();
    for y in min_y..=max_y {
        let row: String = (min_x..=max_x)
            .map(|x| glyph_at(state, fov, Pos::new(x, y)))
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use game_content::build_from_ascii;
    use game_core::{BoolGrid, GameConfig, GameRng};

    use super::*;

    fn build(text: &str) -> GameState {
        build_from_ascii(&GameConfig::default(), &mut GameRng::new(1), text)
    }

    #[test]
    fn visible_room_is_drawn_with_its_creatures() {
        let state = build("#####\n#@.b#\n#~..#\n#####");
        let map = render_map(&state, state.field_of_vision());
        // corners are hidden behind their neighbours
        assert_eq!(map, " ###\n#@.B#\n#~..#\n ###\n");
    }

    #[test]
    fn remembered_cells_hide_creatures_and_dim_objects() {
        let state = build("#######\n#@wb..#\n#######");
        let mut seen = BoolGrid::new();
        for x in 2..=5 {
            seen.set(Pos::new(x, 2));
        }
        let mut fov = FieldOfVision::new();
        fov.update(&seen);
        assert_eq!(glyph_at(&state, &fov, Pos::new(3, 2)), 'W');
        assert_eq!(glyph_at(&state, &fov, Pos::new(4, 2)), 'B');

        fov.update(&BoolGrid::new());
        assert_eq!(glyph_at(&state, &fov, Pos::new(2, 2)), '.');
        assert_eq!(glyph_at(&state, &fov, Pos::new(3, 2)), 'w');
        assert_eq!(glyph_at(&state, &fov, Pos::new(4, 2)), '.');
        assert_eq!(glyph_at(&state, &fov, Pos::new(6, 2)), ' ');
        assert_eq!(render_map(&state, &fov), ".w..\n");
    }

    #[test]
    fn nothing_seen_renders_nothing() {
        let state = GameState::new(&GameConfig::default());
        assert_eq!(render_map(&state, &FieldOfVision::new()), "");
    }
}
