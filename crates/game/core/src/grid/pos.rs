use core::fmt;

/// Grid coordinate.
///
/// Ordering is row-major (`y` first, then `x`), matching the packed [`Pos::key`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

/// 8-connected offsets in raster order (row above first, left to right).
pub const NEIGHBOURS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Orthogonal offsets: up, left, right, down.
pub const ORTHOGONAL_4: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

impl Pos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Builds a position from signed coordinates, returning `None` off-grid.
    pub fn try_new(x: i32, y: i32) -> Option<Self> {
        let x = u8::try_from(x).ok()?;
        let y = u8::try_from(y).ok()?;
        Some(Self { x, y })
    }

    /// Packed cache index `y * 256 + x`.
    #[inline]
    pub const fn key(self) -> u16 {
        (self.y as u16) << 8 | self.x as u16
    }

    #[inline]
    pub const fn from_key(key: u16) -> Self {
        Self {
            x: (key & 0xff) as u8,
            y: (key >> 8) as u8,
        }
    }

    /// Shifts the position by a signed delta. Leaving the grid yields `None`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::try_new(self.x as i32 + dx, self.y as i32 + dy)
    }

    /// In-grid 8-connected neighbours, raster order.
    pub fn neighbours(self) -> impl Iterator<Item = Pos> {
        NEIGHBOURS_8
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Chebyshev distance (king moves).
    pub fn chebyshev(self, other: Pos) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx.max(dy)
    }

    pub fn distance_squared(self, other: Pos) -> u32 {
        let dx = self.x as i32 - other.x as i32;
        let dy = self.y as i32 - other.y as i32;
        (dx * dx + dy * dy) as u32
    }

    /// True when `other` is one king move away (not the same cell).
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.chebyshev(other) == 1
    }

    /// True when the cell is at least one step inside the grid edge.
    pub const fn is_interior(self) -> bool {
        self.x > 0 && self.x < u8::MAX && self.y > 0 && self.y < u8::MAX
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
