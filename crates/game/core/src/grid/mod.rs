//! Fixed 256×256 world grid.
//!
//! Every coordinate is a pair of `u8`, so any `Pos` is in bounds by
//! construction and maps to exactly one slot of a [`MapCache`] or [`BoolGrid`].
//! Neighbour arithmetic goes through [`Pos::offset`], which reports leaving the
//! grid instead of wrapping.

mod cache;
mod pos;

pub use cache::{BoolGrid, MapCache};
pub use pos::{NEIGHBOURS_8, ORTHOGONAL_4, Pos};

/// Width and height of the world grid.
pub const GRID_SIZE: usize = 256;

/// Total number of cells in the world grid.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;
