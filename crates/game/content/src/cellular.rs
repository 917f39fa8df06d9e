//! Cellular-automata cave generation.
//!
//! A cave starts as random noise inside a solid border, is smoothed for a few
//! generations, and is then reduced to its largest connected floor region.
//! Attempts are repeated until the kept floor covers enough of the rectangle;
//! if none does, the roomiest attempt wins. The result is finally shifted so
//! its floor starts at (1, 1) and its size is shrunk to fit.

use game_core::{BoolGrid, CaveConfig, GRID_SIZE, GameRng, Pos};

/// A generated cave in local coordinates: `(0, 0)` is the top-left border
/// corner and every cell outside `width × height` counts as wall.
#[derive(Clone, PartialEq, Eq)]
pub struct CaveMap {
    walls: BoolGrid,
    width: u32,
    height: u32,
}

impl CaveMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        u32::from(pos.x) >= self.width || u32::from(pos.y) >= self.height || self.walls.get(pos)
    }

    /// Floor cells in raster order.
    pub fn floors(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .map(move |x| Pos::new(x as u8, y as u8))
                .filter(|&p| !self.is_wall(p))
        })
    }

    pub fn floor_count(&self) -> usize {
        self.floors().count()
    }
}

impl std::fmt::Debug for CaveMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CaveMap {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            let row: String = (0..self.width)
                .map(|x| {
                    if self.is_wall(Pos::new(x as u8, y as u8)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Generates a cave no larger than `width × height`.
///
/// Sizes are clamped to `3..=256` so there is always an interior.
pub fn generate(rng: &mut GameRng, config: &CaveConfig, width: u32, height: u32) -> CaveMap {
    let width = width.clamp(3, GRID_SIZE as u32);
    let height = height.clamp(3, GRID_SIZE as u32);
    let cells = (width * height) as f32;

    let mut best = attempt(rng, config, width, height);
    let mut best_area = best.1 as f32 / cells;
    let mut attempts = 1;
    while best_area < config.minimum_area && attempts < config.max_attempts {
        let candidate = attempt(rng, config, width, height);
        let area = candidate.1 as f32 / cells;
        attempts += 1;
        tracing::trace!(attempt = attempts, area, "cave attempt");
        if area > best_area {
            best = candidate;
            best_area = area;
        }
    }

    if best_area < config.minimum_area {
        tracing::debug!(
            attempts,
            area = best_area,
            minimum = config.minimum_area,
            "no cave met the minimum area, keeping the largest"
        );
    } else {
        tracing::debug!(attempts, area = best_area, "cave generated");
    }

    move_to_top_left(best.0, width, height)
}

/// One noise, smooth and prune pass. Returns the walls and the floor count.
fn attempt(rng: &mut GameRng, config: &CaveConfig, width: u32, height: u32) -> (BoolGrid, usize) {
    let mut walls = BoolGrid::new();
    for y in 0..height {
        for x in 0..width {
            let pos = Pos::new(x as u8, y as u8);
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if border || rng.next_f32() < config.fill_probability {
                walls.set(pos);
            }
        }
    }

    for _ in 0..config.generations {
        walls = smooth(&walls, config, width, height);
    }

    let floors = keep_largest_region(&mut walls, width, height);
    (walls, floors)
}

/// One automaton generation, reading only from the previous one.
fn smooth(current: &BoolGrid, config: &CaveConfig, width: u32, height: u32) -> BoolGrid {
    let mut next = current.clone();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let pos = Pos::new(x as u8, y as u8);
            let walls = pos.neighbours().filter(|&n| current.get(n)).count() as u32;
            if current.get(pos) {
                next.assign(pos, walls >= config.remain_wall_count);
            } else {
                next.assign(pos, walls >= config.become_wall_count);
            }
        }
    }
    next
}

/// Disjoint sets over component labels; label 0 is unused.
struct Labels {
    parent: Vec<u32>,
}

impl Labels {
    fn fresh(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grandparent = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grandparent;
            label = grandparent;
        }
        label
    }

    fn union(&mut self, a: u32, b: u32) -> u32 {
        let (a, b) = (self.find(a), self.find(b));
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        self.parent[high as usize] = low;
        low
    }
}

/// Fills every floor cell outside the largest 4-connected region and returns
/// the size of that region. Ties go to the region found first.
fn keep_largest_region(walls: &mut BoolGrid, width: u32, height: u32) -> usize {
    let mut labels = Labels { parent: vec![0] };
    let mut cell_label = vec![0u32; (width * height) as usize];
    let index = |x: u32, y: u32| (y * width + x) as usize;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if walls.get(Pos::new(x as u8, y as u8)) {
                continue;
            }
            let left = cell_label[index(x - 1, y)];
            let above = cell_label[index(x, y - 1)];
            cell_label[index(x, y)] = match (left, above) {
                (0, 0) => labels.fresh(),
                (l, 0) => l,
                (0, a) => a,
                (l, a) => labels.union(l, a),
            };
        }
    }

    let mut sizes = vec![0usize; labels.parent.len()];
    for label in cell_label.iter_mut().filter(|l| **l != 0) {
        *label = labels.find(*label);
        sizes[*label as usize] += 1;
    }

    let mut best_label = 0;
    let mut best_size = 0;
    for (label, &size) in sizes.iter().enumerate().skip(1) {
        if size > best_size {
            best_label = label as u32;
            best_size = size;
        }
    }
    tracing::trace!(
        regions = sizes.iter().filter(|&&s| s > 0).count(),
        largest = best_size,
        "floor regions"
    );

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if cell_label[index(x, y)] != best_label {
                walls.set(Pos::new(x as u8, y as u8));
            }
        }
    }
    best_size
}

/// Shifts the floor so its bounding box starts at (1, 1) and shrinks the
/// reported size to that box plus a one-cell border.
fn move_to_top_left(walls: BoolGrid, width: u32, height: u32) -> CaveMap {
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0, 0);
    for y in 0..height {
        for x in 0..width {
            if !walls.get(Pos::new(x as u8, y as u8)) {
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
        }
    }
    if min.0 == u32::MAX {
        return CaveMap {
            walls,
            width,
            height,
        };
    }

    let mut moved = BoolGrid::new();
    for y in 0..height {
        for x in 0..width {
            moved.set(Pos::new(x as u8, y as u8));
        }
    }
    for y in min.1..=max.1 {
        for x in min.0..=max.0 {
            if !walls.get(Pos::new(x as u8, y as u8)) {
                moved.unset(Pos::new((x - min.0 + 1) as u8, (y - min.1 + 1) as u8));
            }
        }
    }

    CaveMap {
        walls: moved,
        width: max.0 - min.0 + 3,
        height: max.1 - min.1 + 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> BoolGrid {
        let mut walls = BoolGrid::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    walls.set(Pos::new(x as u8, y as u8));
                }
            }
        }
        walls
    }

    #[test]
    fn only_the_largest_region_survives() {
        let mut walls = grid(&[
            "#######", //
            "#..#..#", //
            "#..#..#", //
            "####..#", //
            "#.....#", //
            "#######",
        ]);
        let kept = keep_largest_region(&mut walls, 7, 6);
        assert_eq!(kept, 11);
        assert!(walls.get(Pos::new(1, 1)));
        assert!(!walls.get(Pos::new(1, 4)));
        assert!(!walls.get(Pos::new(5, 1)));
    }

    #[test]
    fn regions_joined_late_are_merged() {
        // a U shape: the two arms only meet on the bottom row
        let mut walls = grid(&[
            "#######", //
            "#.#.#.#", //
            "#.#.#.#", //
            "#.....#", //
            "#######",
        ]);
        let kept = keep_largest_region(&mut walls, 7, 5);
        assert_eq!(kept, 11);
    }

    #[test]
    fn cave_is_moved_to_the_top_left() {
        let walls = grid(&[
            "########", //
            "########", //
            "########", //
            "###..###", //
            "####.###", //
            "########",
        ]);
        let cave = move_to_top_left(walls, 8, 6);
        assert_eq!((cave.width(), cave.height()), (4, 4));
        assert!(!cave.is_wall(Pos::new(1, 1)));
        assert!(!cave.is_wall(Pos::new(2, 1)));
        assert!(!cave.is_wall(Pos::new(2, 2)));
        assert!(cave.is_wall(Pos::new(1, 2)));
        assert!(cave.is_wall(Pos::new(3, 3)));
        assert_eq!(cave.floor_count(), 3);
    }

    #[test]
    fn generated_cave_is_bordered_and_connected() {
        let mut rng = GameRng::new(11);
        let cave = generate(&mut rng, &CaveConfig::SPIDER_ROOM, 40, 40);
        assert!(cave.width() <= 40 && cave.height() <= 40);
        assert!(cave.floor_count() > 0);

        for x in 0..cave.width() {
            assert!(cave.is_wall(Pos::new(x as u8, 0)));
            assert!(cave.is_wall(Pos::new(x as u8, (cave.height() - 1) as u8)));
        }
        for y in 0..cave.height() {
            assert!(cave.is_wall(Pos::new(0, y as u8)));
            assert!(cave.is_wall(Pos::new((cave.width() - 1) as u8, y as u8)));
        }

        // every floor is reachable from the first through orthogonal steps
        let floors: Vec<Pos> = cave.floors().collect();
        let mut seen = BoolGrid::new();
        let mut stack = vec![floors[0]];
        seen.set(floors[0]);
        while let Some(p) = stack.pop() {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if let Some(n) = p.offset(dx, dy) {
                    if !cave.is_wall(n) && !seen.get(n) {
                        seen.set(n);
                        stack.push(n);
                    }
                }
            }
        }
        assert_eq!(seen.count() as usize, floors.len());
    }

    #[test]
    fn same_seed_same_cave() {
        let config = CaveConfig::SPIDER_ROOM;
        let a = generate(&mut GameRng::new(5), &config, 30, 20);
        let b = generate(&mut GameRng::new(5), &config, 30, 20);
        assert_eq!(a, b);
    }

    /// Every attempt `generate` could make from `rng`, in order.
    fn replay(rng: &GameRng, config: &CaveConfig, size: u32, count: u32) -> Vec<(BoolGrid, usize)> {
        let mut rng = rng.clone();
        (0..count).map(|_| attempt(&mut rng, config, size, size)).collect()
    }

    #[test]
    fn impossible_area_keeps_the_best_attempt() {
        let config = CaveConfig {
            minimum_area: 2.0,
            max_attempts: 6,
            ..CaveConfig::SPIDER_ROOM
        };
        let rng = GameRng::new(9);
        let attempts = replay(&rng, &config, 20, config.max_attempts);
        let largest = attempts.iter().map(|a| a.1).max().unwrap();
        let first_largest = attempts.iter().position(|a| a.1 == largest).unwrap();

        let cave = generate(&mut rng.clone(), &config, 20, 20);
        assert_eq!(cave.floor_count(), largest);
        let (walls, _) = attempts[first_largest].clone();
        assert_eq!(cave, move_to_top_left(walls, 20, 20));
    }

    #[test]
    fn first_attempt_meeting_the_minimum_is_kept() {
        let mut config = CaveConfig {
            max_attempts: 6,
            ..CaveConfig::SPIDER_ROOM
        };
        let rng = GameRng::new(21);
        let attempts = replay(&rng, &config, 20, config.max_attempts);
        let largest = attempts.iter().map(|a| a.1).max().unwrap();
        let first_largest = attempts.iter().position(|a| a.1 == largest).unwrap();
        config.minimum_area = largest as f32 / 400.0;

        let mut generating = rng.clone();
        let cave = generate(&mut generating, &config, 20, 20);
        let (walls, _) = attempts[first_largest].clone();
        assert_eq!(cave, move_to_top_left(walls, 20, 20));

        // nothing is drawn past the attempt that met the minimum
        let mut stopped = rng.clone();
        for _ in 0..=first_largest {
            attempt(&mut stopped, &config, 20, 20);
        }
        assert_eq!(generating, stopped);
    }
}
