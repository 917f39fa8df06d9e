//! Compass directions accepted by `--walk`.

use clap::ValueEnum;
use game_core::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    #[value(alias = "north")]
    N,
    Ne,
    #[value(alias = "east")]
    E,
    Se,
    #[value(alias = "south")]
    S,
    Sw,
    #[value(alias = "west")]
    W,
    Nw,
}

impl Direction {
    /// Screen coordinates: north is up, so it decreases `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::N => (0, -1),
            Self::Ne => (1, -1),
            Self::E => (1, 0),
            Self::Se => (1, 1),
            Self::S => (0, 1),
            Self::Sw => (-1, 1),
            Self::W => (-1, 0),
            Self::Nw => (-1, -1),
        }
    }

    /// The neighbouring cell, if it is on the grid.
    pub fn step(self, from: Pos) -> Option<Pos> {
        let (dx, dy) = self.delta();
        from.offset(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_aliases_parse() {
        assert_eq!(Direction::from_str("ne", true), Ok(Direction::Ne));
        assert_eq!(Direction::from_str("north", true), Ok(Direction::N));
        assert!(Direction::from_str("up", true).is_err());
    }

    #[test]
    fn steps_stay_on_the_grid() {
        assert_eq!(Direction::Se.step(Pos::new(4, 4)), Some(Pos::new(5, 5)));
        assert_eq!(Direction::N.step(Pos::new(4, 0)), None);
        for direction in Direction::value_variants() {
            let (dx, dy) = direction.delta();
            assert_eq!(dx.abs().max(dy.abs()), 1);
        }
    }
}
