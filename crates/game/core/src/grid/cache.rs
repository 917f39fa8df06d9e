use core::ops::{Index, IndexMut};

use super::{GRID_CELLS, Pos};

/// Dense per-cell storage covering the whole grid.
///
/// Exactly one slot exists per coordinate; the slot for `pos` lives at
/// `pos.key()`.
#[derive(Clone, PartialEq, Eq)]
pub struct MapCache<T> {
    cells: Box<[T]>,
}

impl<T: Clone> MapCache<T> {
    /// Creates a cache with every slot set to `value`.
    pub fn filled(value: T) -> Self {
        Self {
            cells: vec![value; GRID_CELLS].into_boxed_slice(),
        }
    }

    /// Resets every slot to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> MapCache<T> {
    #[inline]
    pub fn get(&self, pos: Pos) -> &T {
        &self.cells[pos.key() as usize]
    }

    #[inline]
    pub fn set(&mut self, pos: Pos, value: T) {
        self.cells[pos.key() as usize] = value;
    }

    /// Iterates `(pos, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, v)| (Pos::from_key(i as u16), v))
    }
}

impl<T: Clone + Default> Default for MapCache<T> {
    fn default() -> Self {
        Self::filled(T::default())
    }
}

impl<T> Index<Pos> for MapCache<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &T {
        self.get(pos)
    }
}

impl<T> IndexMut<Pos> for MapCache<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut T {
        &mut self.cells[pos.key() as usize]
    }
}

impl<T> core::fmt::Debug for MapCache<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MapCache")
            .field("cells", &self.cells.len())
            .finish()
    }
}

const WORDS: usize = GRID_CELLS / 64;

/// One bit per grid cell, 64 cells per word.
#[derive(Clone, PartialEq, Eq)]
pub struct BoolGrid {
    words: Box<[u64; WORDS]>,
}

impl BoolGrid {
    pub fn new() -> Self {
        Self {
            words: Box::new([0; WORDS]),
        }
    }

    #[inline]
    fn split(pos: Pos) -> (usize, u64) {
        let key = pos.key() as usize;
        (key / 64, 1 << (key % 64))
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        let (word, bit) = Self::split(pos);
        self.words[word] & bit != 0
    }

    #[inline]
    pub fn set(&mut self, pos: Pos) {
        let (word, bit) = Self::split(pos);
        self.words[word] |= bit;
    }

    #[inline]
    pub fn unset(&mut self, pos: Pos) {
        let (word, bit) = Self::split(pos);
        self.words[word] &= !bit;
    }

    pub fn assign(&mut self, pos: Pos, value: bool) {
        if value {
            self.set(pos);
        } else {
            self.unset(pos);
        }
    }

    /// Clears every bit.
    pub fn reset(&mut self) {
        self.words.fill(0);
    }

    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Iterates set positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut remaining = word;
            core::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(Pos::from_key((i * 64 + bit) as u16))
            })
        })
    }
}

impl Default for BoolGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BoolGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoolGrid")
            .field("set", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_grid_set_unset_count() {
        let mut grid = BoolGrid::new();
        grid.set(Pos::new(0, 0));
        grid.set(Pos::new(63, 0));
        grid.set(Pos::new(64, 0));
        grid.set(Pos::new(255, 255));
        assert_eq!(grid.count(), 4);
        assert!(grid.get(Pos::new(63, 0)));
        grid.unset(Pos::new(63, 0));
        assert!(!grid.get(Pos::new(63, 0)));
        assert_eq!(
            grid.iter().collect::<Vec<_>>(),
            vec![Pos::new(0, 0), Pos::new(64, 0), Pos::new(255, 255)]
        );
        grid.reset();
        assert_eq!(grid.count(), 0);
    }

    #[test]
    fn map_cache_has_one_slot_per_cell() {
        let mut cache = MapCache::filled(0u32);
        cache[Pos::new(7, 9)] = 42;
        assert_eq!(*cache.get(Pos::new(7, 9)), 42);
        assert_eq!(cache.iter().filter(|(_, v)| **v == 42).count(), 1);
        assert_eq!(cache.iter().count(), GRID_CELLS);
    }
}
