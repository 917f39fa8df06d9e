use crate::grid::{MapCache, Pos};

use super::BlockMask;

/// Terrain category of a cell.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    /// Nothing: outside the level or a dropped-away floor.
    #[default]
    Empty,
    Floor,
    Wall,
    Water,
}

/// Visual identity of tiles, entities and cards.
///
/// The core never draws anything; appearances exist so collaborators can map
/// them to sprites or glyphs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Appearance {
    #[default]
    None,

    // terrain
    FloorStone,
    FloorRock,
    WallWood,
    WallFancy,
    WallBrownRock,
    Water,

    // creatures
    Player,
    Bat,
    Slime,
    Lich,
    Skeleton,
    RedDragon,
    SpiderNormal,
    SpiderWeb,
    SpiderPoison,
    SpiderShadow,

    // objects
    Web1,
    Web2,
    Web3,
    TrapHex,
    DoorClosed,
    DoorOpen,

    // cards
    CardStrike,
    CardBlink,
    CardHeal,
    CardPoison,
}

impl Appearance {
    /// Spider-web variants picked at random when a web is placed.
    pub const WEBS: [Appearance; 3] = [Self::Web1, Self::Web2, Self::Web3];
}

/// A single cell of terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub kind: TileKind,
    pub appearance: Appearance,
}

impl Tile {
    pub const EMPTY: Self = Self::new(TileKind::Empty, Appearance::None);

    pub const fn new(kind: TileKind, appearance: Appearance) -> Self {
        Self { kind, appearance }
    }

    pub const fn floor(appearance: Appearance) -> Self {
        Self::new(TileKind::Floor, appearance)
    }

    pub const fn wall(appearance: Appearance) -> Self {
        Self::new(TileKind::Wall, appearance)
    }

    pub const fn water() -> Self {
        Self::new(TileKind::Water, Appearance::Water)
    }

    pub const fn is_opaque(&self) -> bool {
        matches!(self.kind, TileKind::Wall)
    }

    /// Whether a mover with `movement` can stand on this terrain.
    ///
    /// Floor needs walking or flying, water needs swimming or flying. Walls
    /// and empty cells block everything.
    pub fn is_passable(&self, movement: BlockMask) -> bool {
        match self.kind {
            TileKind::Floor => movement.intersects(BlockMask::WALK | BlockMask::FLY),
            TileKind::Water => movement.intersects(BlockMask::SWIM | BlockMask::FLY),
            TileKind::Wall | TileKind::Empty => false,
        }
    }
}

/// Terrain for the whole grid. Untouched cells are [`Tile::EMPTY`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileMap {
    tiles: MapCache<Tile>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Pos) -> Tile {
        self.tiles[pos]
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        self.tiles[pos] = tile;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.tiles.iter().map(|(pos, tile)| (pos, *tile))
    }
}
