//! Uniform-cost distance fields.
//!
//! A [`DijkstraMap`] holds, for every cell, the number of 8-connected steps to
//! the goal through passable cells. Diagonal and orthogonal steps cost the
//! same. Expansion is a FIFO flood from the goal with neighbours enumerated in
//! raster order (row above first, left to right), and that order is what
//! breaks ties between equal-cost routes.

use std::collections::VecDeque;

use crate::grid::{BoolGrid, MapCache, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DijkstraMap {
    costs: MapCache<u32>,
    goal: Pos,
}

impl DijkstraMap {
    /// Cost of cells the flood never reached.
    pub const UNREACHABLE: u32 = u32::MAX;

    /// Floods outward from `goal` through cells set in `can_pass`.
    ///
    /// The goal itself always gets cost 0, passable or not.
    pub fn calculate(can_pass: &BoolGrid, goal: Pos) -> Self {
        let mut costs = MapCache::filled(Self::UNREACHABLE);
        let mut visited = BoolGrid::new();
        let mut queue = VecDeque::new();

        costs[goal] = 0;
        visited.set(goal);
        queue.push_back(goal);

        while let Some(current) = queue.pop_front() {
            let next_cost = costs[current] + 1;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(next) = current.offset(dx, dy) else {
                        continue;
                    };
                    if next == current || visited.get(next) || !can_pass.get(next) {
                        continue;
                    }
                    visited.set(next);
                    costs[next] = next_cost;
                    queue.push_back(next);
                }
            }
        }

        Self { costs, goal }
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn cost(&self, pos: Pos) -> u32 {
        self.costs[pos]
    }

    pub fn is_reachable(&self, pos: Pos) -> bool {
        self.costs[pos] != Self::UNREACHABLE
    }

    /// The neighbour one step closer to the goal, first in raster order among
    /// equals. `None` at the goal or from an unreachable cell.
    pub fn downhill(&self, from: Pos) -> Option<Pos> {
        if !self.is_reachable(from) {
            return None;
        }
        let mut best: Option<(Pos, u32)> = None;
        for next in from.neighbours() {
            let cost = self.cost(next);
            if cost >= self.cost(from) {
                continue;
            }
            match best {
                Some((_, best_cost)) if cost >= best_cost => {}
                _ => best = Some((next, cost)),
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// The reachable neighbour furthest from the goal, first in raster order
    /// among equals. `None` when no neighbour is further away than `from`.
    pub fn uphill(&self, from: Pos) -> Option<Pos> {
        if !self.is_reachable(from) {
            return None;
        }
        let mut best: Option<(Pos, u32)> = None;
        for next in from.neighbours() {
            let cost = self.cost(next);
            if !self.is_reachable(next) || cost <= self.cost(from) {
                continue;
            }
            match best {
                Some((_, best_cost)) if cost <= best_cost => {}
                _ => best = Some((next, cost)),
            }
        }
        best.map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(x0: u8, y0: u8, x1: u8, y1: u8) -> BoolGrid {
        let mut grid = BoolGrid::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                grid.set(Pos::new(x, y));
            }
        }
        grid
    }

    #[test]
    fn diagonal_steps_cost_one() {
        let map = DijkstraMap::calculate(&open_room(1, 1, 10, 10), Pos::new(5, 5));
        assert_eq!(map.cost(Pos::new(5, 5)), 0);
        assert_eq!(map.cost(Pos::new(6, 5)), 1);
        assert_eq!(map.cost(Pos::new(7, 7)), 2);
        assert_eq!(map.cost(Pos::new(1, 1)), 4);
        assert_eq!(map.cost(Pos::new(20, 20)), DijkstraMap::UNREACHABLE);
    }

    #[test]
    fn walls_force_a_detour() {
        let mut grid = open_room(1, 1, 9, 9);
        for y in 1..=8 {
            grid.unset(Pos::new(5, y));
        }
        let map = DijkstraMap::calculate(&grid, Pos::new(3, 1));
        // around the bottom of the wall at x = 5
        assert_eq!(map.cost(Pos::new(7, 1)), 16);
        assert!(!map.is_reachable(Pos::new(5, 4)));
    }

    #[test]
    fn downhill_walks_to_the_goal() {
        let map = DijkstraMap::calculate(&open_room(1, 1, 10, 10), Pos::new(2, 2));
        let mut pos = Pos::new(9, 6);
        let mut steps = 0;
        while let Some(next) = map.downhill(pos) {
            assert_eq!(map.cost(next) + 1, map.cost(pos));
            pos = next;
            steps += 1;
        }
        assert_eq!(pos, Pos::new(2, 2));
        assert_eq!(steps, 7);
    }

    #[test]
    fn uphill_flees_into_the_far_corner() {
        let map = DijkstraMap::calculate(&open_room(1, 1, 10, 10), Pos::new(2, 2));
        // five neighbours cost 2; the first in raster order wins
        assert_eq!(map.uphill(Pos::new(3, 3)), Some(Pos::new(4, 2)));

        let mut pos = Pos::new(3, 3);
        while let Some(next) = map.uphill(pos) {
            assert_eq!(map.cost(next), map.cost(pos) + 1);
            pos = next;
        }
        assert_eq!(map.cost(pos), 8);
        assert_eq!(map.uphill(Pos::new(20, 20)), None);
    }

    #[test]
    fn uphill_stops_in_a_dead_end() {
        let mut grid = open_room(1, 1, 5, 1);
        grid.set(Pos::new(1, 2));
        let map = DijkstraMap::calculate(&grid, Pos::new(3, 1));
        assert_eq!(map.uphill(Pos::new(5, 1)), None);
        assert_eq!(map.uphill(Pos::new(2, 1)), Some(Pos::new(1, 1)));
        assert_eq!(map.uphill(Pos::new(1, 1)), None);
    }

    #[test]
    fn goal_at_grid_corner_is_safe() {
        let map = DijkstraMap::calculate(&open_room(0, 0, 3, 3), Pos::ORIGIN);
        assert_eq!(map.cost(Pos::new(3, 3)), 3);
    }
}
