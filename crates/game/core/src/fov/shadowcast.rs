//! Rational-slope shadow casting.
//!
//! Each octant is scanned row by row outward from the viewer. A row is a set
//! of sectors, each an exact slope interval `[start, end]` in octant-local
//! coordinates where `x_iter` runs across and `y_iter` runs away from the viewer.
//! Cells are 4 units wide; wall faces count as seen when the sector crosses
//! the middle two thirds of the face.

use bitflags::bitflags;

use super::Rational;
use crate::grid::{BoolGrid, MapCache, Pos};

const CELL_SIZE: i32 = 4;
const HALF_CELL: i32 = CELL_SIZE / 2;
const CELL_MARGIN: i32 = 1;

bitflags! {
    /// Wall classification with beveled corners.
    ///
    /// A corner is beveled when both orthogonal neighbours touching it are
    /// clear, letting sight lines graze past convex wall corners.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    struct WallShape: u8 {
        const WALL = 1 << 0;
        const BEVEL_TOP_LEFT = 1 << 1;
        const BEVEL_TOP_RIGHT = 1 << 2;
        const BEVEL_BOTTOM_LEFT = 1 << 3;
        const BEVEL_BOTTOM_RIGHT = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug)]
struct Sector {
    start: Rational,
    end: Rational,
}

impl Sector {
    const FULL: Self = Self {
        start: Rational::ZERO,
        end: Rational::ONE,
    };

    /// Columns touched by this sector on row `y_iter`, inclusive.
    fn columns(&self, y_iter: i32) -> Option<(i32, i32)> {
        if self.start.is_infinite() || self.end.is_infinite() {
            return None;
        }
        let (sn, sd) = (self.start.numerator(), self.start.denominator());
        let (en, ed) = (self.end.numerator(), self.end.denominator());
        let first = ((y_iter * CELL_SIZE - HALF_CELL) * sn + sd * HALF_CELL) / (sd * CELL_SIZE);
        let last = ((y_iter * CELL_SIZE + HALF_CELL) * en + ed * HALF_CELL - 1) / (CELL_SIZE * ed);
        Some((first.max(0), last))
    }
}

/// Octant-local to grid transform plus which bevels face the sector's edges.
struct Octant {
    /// Bevel on the corner the sector's start edge sweeps past.
    leading: WallShape,
    /// Bevel on the corner the sector's end edge sweeps past.
    trailing: WallShape,
    /// `(x, y) = viewer + (xx * x_iter + xy * y_iter, yx * x_iter + yy * y_iter)`
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

/*
    \ 4  | 0  /
    5 \  |  / 1
        \|/
    -----+-----
        /|\
    7 /  |  \ 3
    / 6  |  2 \
*/
const OCTANTS: [Octant; 8] = [
    Octant::new(WallShape::BEVEL_TOP_LEFT, WallShape::BEVEL_BOTTOM_RIGHT, 1, 0, 0, -1),
    Octant::new(WallShape::BEVEL_BOTTOM_RIGHT, WallShape::BEVEL_TOP_LEFT, 0, 1, -1, 0),
    Octant::new(WallShape::BEVEL_BOTTOM_LEFT, WallShape::BEVEL_TOP_RIGHT, 1, 0, 0, 1),
    Octant::new(WallShape::BEVEL_TOP_RIGHT, WallShape::BEVEL_BOTTOM_LEFT, 0, 1, 1, 0),
    Octant::new(WallShape::BEVEL_TOP_RIGHT, WallShape::BEVEL_BOTTOM_LEFT, -1, 0, 0, -1),
    Octant::new(WallShape::BEVEL_BOTTOM_LEFT, WallShape::BEVEL_TOP_RIGHT, 0, -1, -1, 0),
    Octant::new(WallShape::BEVEL_BOTTOM_RIGHT, WallShape::BEVEL_TOP_LEFT, -1, 0, 0, 1),
    Octant::new(WallShape::BEVEL_TOP_LEFT, WallShape::BEVEL_BOTTOM_RIGHT, 0, -1, 1, 0),
];

impl Octant {
    const fn new(leading: WallShape, trailing: WallShape, xx: i32, xy: i32, yx: i32, yy: i32) -> Self {
        Self {
            leading,
            trailing,
            xx,
            xy,
            yx,
            yy,
        }
    }

    fn to_grid(&self, viewer: Pos, x_iter: i32, y_iter: i32) -> (i32, i32) {
        (
            viewer.x as i32 + self.xx * x_iter + self.xy * y_iter,
            viewer.y as i32 + self.yx * x_iter + self.yy * y_iter,
        )
    }
}

fn classify_walls(opaque: &BoolGrid) -> MapCache<WallShape> {
    let mut shapes = MapCache::filled(WallShape::empty());
    for y in 1..u8::MAX {
        for x in 1..u8::MAX {
            let pos = Pos::new(x, y);
            if !opaque.get(pos) {
                continue;
            }
            let above = opaque.get(Pos::new(x, y - 1));
            let left = opaque.get(Pos::new(x - 1, y));
            let right = opaque.get(Pos::new(x + 1, y));
            let below = opaque.get(Pos::new(x, y + 1));

            let mut shape = WallShape::WALL;
            shape.set(WallShape::BEVEL_TOP_LEFT, !above && !left);
            shape.set(WallShape::BEVEL_TOP_RIGHT, !above && !right);
            shape.set(WallShape::BEVEL_BOTTOM_LEFT, !below && !left);
            shape.set(WallShape::BEVEL_BOTTOM_RIGHT, !below && !right);
            shapes[pos] = shape;
        }
    }
    shapes
}

/// Computes every cell visible from `viewer` given an opacity grid.
///
/// The result is rebuilt from scratch on each call; the viewer's own cell is
/// always visible. Only cells in `[1, 254]` are classified as walls, so the
/// grid border never occludes.
pub fn calculate_fov(opaque: &BoolGrid, viewer: Pos) -> BoolGrid {
    let shapes = classify_walls(opaque);
    let mut visible = BoolGrid::new();
    visible.set(viewer);

    let mut front: Vec<Sector> = Vec::new();
    let mut back: Vec<Sector> = Vec::new();

    for octant in &OCTANTS {
        front.clear();
        front.push(Sector::FULL);
        cast_octant(octant, &shapes, viewer, &mut front, &mut back, &mut visible);
    }

    visible
}

fn cast_octant(
    octant: &Octant,
    shapes: &MapCache<WallShape>,
    viewer: Pos,
    front: &mut Vec<Sector>,
    back: &mut Vec<Sector>,
    visible: &mut BoolGrid,
) {
    let see_low = Rational::new(1, 6);
    let see_high = Rational::new(5, 6);

    let mut y_iter = 0;
    while !front.is_empty() {
        back.clear();

        for &sector in front.iter() {
            let Some((x_start, x_end)) = sector.columns(y_iter) else {
                continue;
            };
            let mut s = sector;
            let mut prev_was_clear = false;

            let mut x_iter = x_start;
            while x_iter <= x_end {
                let (x, y) = octant.to_grid(viewer, x_iter, y_iter);
                if !(0 < y && y < 255) {
                    return;
                }
                if !(0 < x && x < 255) {
                    // the border column passes light on but is never revealed
                    prev_was_clear = true;
                    break;
                }
                let Some(pos) = Pos::try_new(x, y) else {
                    break;
                };
                let shape = shapes[pos];

                if shape.contains(WallShape::WALL) {
                    let horiz_left = Rational::new(
                        s.start.numerator() * (y_iter * CELL_SIZE - HALF_CELL)
                            + s.start.denominator() * (HALF_CELL - x_iter * CELL_SIZE),
                        s.start.denominator() * CELL_SIZE,
                    );
                    let horiz_right = Rational::new(
                        s.end.numerator() * (y_iter * CELL_SIZE - HALF_CELL)
                            + s.end.denominator() * (HALF_CELL - x_iter * CELL_SIZE),
                        s.end.denominator() * CELL_SIZE,
                    );
                    let vert_left = Rational::new(
                        s.start.denominator() * (2 * x_iter - 1)
                            + s.start.numerator() * (1 - 2 * y_iter),
                        2 * s.start.numerator(),
                    );
                    let vert_right = Rational::new(
                        s.end.denominator() * (2 * x_iter - 1)
                            + s.end.numerator() * (1 - 2 * y_iter),
                        2 * s.end.numerator(),
                    );

                    let face_seen = horiz_left <= see_high && horiz_right >= see_low;
                    let side_seen =
                        prev_was_clear && vert_left >= see_low && vert_right <= see_high;
                    if face_seen || side_seen {
                        visible.set(pos);
                    }

                    let left_slope = if shape.contains(octant.leading) {
                        Rational::new(x_iter * CELL_SIZE - HALF_CELL, y_iter * CELL_SIZE)
                    } else {
                        Rational::new(
                            x_iter * CELL_SIZE - HALF_CELL,
                            y_iter * CELL_SIZE + HALF_CELL,
                        )
                    };
                    let right_slope = if shape.contains(octant.trailing) {
                        Rational::new(x_iter * CELL_SIZE + HALF_CELL, y_iter * CELL_SIZE)
                    } else {
                        Rational::new(
                            x_iter * CELL_SIZE + HALF_CELL,
                            y_iter * CELL_SIZE - HALF_CELL,
                        )
                    };

                    if prev_was_clear {
                        let mut split = s;
                        split.end = split.end.min(left_slope);
                        if split.end > split.start {
                            back.push(split);
                        }
                        prev_was_clear = false;
                    }
                    s.start = right_slope;
                } else {
                    let left_slope = Rational::new(
                        x_iter * CELL_SIZE + CELL_MARGIN - HALF_CELL,
                        y_iter * CELL_SIZE - CELL_MARGIN + HALF_CELL,
                    );
                    let right_slope = Rational::new(
                        x_iter * CELL_SIZE - CELL_MARGIN + HALF_CELL,
                        y_iter * CELL_SIZE + CELL_MARGIN - HALF_CELL,
                    );
                    if right_slope > s.start && left_slope < s.end {
                        visible.set(pos);
                    }
                    prev_was_clear = true;
                }

                x_iter += 1;
            }

            if prev_was_clear && s.end > s.start {
                back.push(s);
            }
        }

        core::mem::swap(front, back);
        y_iter += 1;
    }
}
