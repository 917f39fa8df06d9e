//! Field of vision.
//!
//! [`calculate_fov`] recomputes the boolean can-see grid from scratch for one
//! viewer. [`FieldOfVision`] keeps the three-state memory (never seen,
//! previously seen, visible) that rendering and AI consult between ticks.

mod rational;
mod shadowcast;

pub use rational::Rational;
pub use shadowcast::calculate_fov;

use crate::grid::{BoolGrid, GRID_CELLS, MapCache, Pos};

/// Visibility memory of a single cell. Ordered: a later state is "more seen".
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FovState {
    #[default]
    NeverSeen,
    PreviouslySeen,
    Visible,
}

/// Three-state visibility grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOfVision {
    cells: MapCache<FovState>,
}

impl FieldOfVision {
    pub fn new() -> Self {
        Self {
            cells: MapCache::filled(FovState::NeverSeen),
        }
    }

    pub fn get(&self, pos: Pos) -> FovState {
        self.cells[pos]
    }

    pub fn is_visible(&self, pos: Pos) -> bool {
        self.cells[pos] == FovState::Visible
    }

    /// Folds a fresh can-see grid into the memory.
    ///
    /// Cells in `can_see` become `Visible`; cells that were `Visible` and are no
    /// longer seen decay to `PreviouslySeen`. Nothing ever returns to
    /// `NeverSeen`. Returns whether any cell changed.
    pub fn update(&mut self, can_see: &BoolGrid) -> bool {
        let mut changed = false;
        for key in 0..GRID_CELLS {
            let pos = Pos::from_key(key as u16);
            let current = self.cells[pos];
            let next = if can_see.get(pos) {
                FovState::Visible
            } else if current == FovState::Visible {
                FovState::PreviouslySeen
            } else {
                current
            };
            if next != current {
                self.cells[pos] = next;
                changed = true;
            }
        }
        changed
    }

    pub fn count(&self, state: FovState) -> usize {
        self.cells.iter().filter(|(_, s)| **s == state).count()
    }
}

impl Default for FieldOfVision {
    fn default() -> Self {
        Self::new()
    }
}
