//! Distances with an explicit unreachable sentinel.
//!
//! Weighted algorithms return [`Distance`] values; unweighted BFS keeps the
//! classic `-1` hop-count sentinel and returns plain `i64` maps instead.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// A weighted distance, either a finite value or the unreachable sentinel.
///
/// `Unreachable` stands for "no path found"; in shortest-path contexts it
/// behaves like positive infinity and compares greater than every finite
/// distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Distance {
    Finite(i64),
    Unreachable,
}

/// Distances from a source (or between pairs) keyed by node.
pub type DistanceMap<N> = HashMap<N, Distance>;

impl Distance {
    pub fn is_finite(self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Returns the finite value, if any.
    pub fn finite(self) -> Option<i64> {
        match self {
            Distance::Finite(d) => Some(d),
            Distance::Unreachable => None,
        }
    }

    /// Extends this distance by one edge of weight `weight`. The sentinel
    /// absorbs: an unreachable node cannot relax its successors.
    pub fn step(self, weight: i64) -> Distance {
        match self {
            Distance::Finite(d) => Distance::Finite(d.saturating_add(weight)),
            Distance::Unreachable => Distance::Unreachable,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Distance::Finite(a), Distance::Finite(b)) => a.cmp(b),
            (Distance::Finite(_), Distance::Unreachable) => Ordering::Less,
            (Distance::Unreachable, Distance::Finite(_)) => Ordering::Greater,
            (Distance::Unreachable, Distance::Unreachable) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{d}"),
            Distance::Unreachable => write!(f, "x"),
        }
    }
}

impl From<i64> for Distance {
    fn from(d: i64) -> Self {
        Distance::Finite(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_is_greatest() {
        assert!(Distance::Finite(i64::MAX) < Distance::Unreachable);
        assert!(Distance::Finite(-3) < Distance::Finite(0));
        assert_eq!(
            Distance::Unreachable.cmp(&Distance::Unreachable),
            Ordering::Equal
        );
    }

    #[test]
    fn step_absorbs_sentinel() {
        assert_eq!(Distance::Finite(2).step(-5), Distance::Finite(-3));
        assert_eq!(Distance::Unreachable.step(7), Distance::Unreachable);
    }

    #[test]
    fn step_saturates() {
        assert_eq!(
            Distance::Finite(i64::MAX).step(1),
            Distance::Finite(i64::MAX)
        );
    }
}
