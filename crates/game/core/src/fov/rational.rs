use core::cmp::Ordering;
use core::fmt;

/// Exact fraction used for shadow-casting slopes.
///
/// Always reduced, with a non-negative denominator. A zero denominator
/// encodes ±∞ as `±1/0`, which compares above (or below) every finite value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i32,
    denominator: i32,
}

impl Rational {
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };
    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Builds `numerator / denominator` reduced to lowest terms.
    pub fn new(numerator: i32, denominator: i32) -> Self {
        if denominator == 0 {
            if numerator == 0 {
                return Self::ZERO;
            }
            return Self {
                numerator: numerator.signum(),
                denominator: 0,
            };
        }
        let sign = denominator.signum();
        let divisor = gcd(numerator, denominator).max(1);
        Self {
            numerator: sign * numerator / divisor,
            denominator: sign * denominator / divisor,
        }
    }

    pub const fn numerator(self) -> i32 {
        self.numerator
    }

    pub const fn denominator(self) -> i32 {
        self.denominator
    }

    pub const fn is_infinite(self) -> bool {
        self.denominator == 0
    }
}

fn gcd(a: i32, b: i32) -> i32 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a as i32
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_infinite() && other.is_infinite() {
            return self.numerator.cmp(&other.numerator);
        }
        let lhs = self.numerator as i64 * other.denominator as i64;
        let rhs = other.numerator as i64 * self.denominator as i64;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
