//! Type aliases for objective and constraint values, and the plain Pareto
//! dominance relation over them.

use std::cmp::Ordering;

/// An alias for a single objective or constraint value.
///
/// All objectives are minimized. If a criterion should be maximized, the
/// problem negates it before storing it.
pub type Score = f64;

/// An alias for a slice of objective values.
pub type Scores = [Score];

/// Describes Pareto dominance for slices of `Score`s.
pub trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `self` dominates `other` if no
  /// `self` value is greater than the respective `other` value and at least
  /// one is less.
  ///
  /// Values are compared pairwise up to the length of the shorter slice.
  /// A pair involving `NaN` favours neither side.
  fn dominance(&self, other: &Self) -> Ordering;
}

impl ParetoDominance for [Score] {
  fn dominance(&self, other: &Self) -> Ordering {
    let (mut better, mut worse) = (false, false);
    for (a, b) in self.iter().zip(other) {
      match a.partial_cmp(b) {
        Some(Ordering::Less) => better = true,
        Some(Ordering::Greater) => worse = true,
        _ => {}
      }
      if better && worse {
        return Ordering::Equal;
      }
    }
    match (better, worse) {
      (true, false) => Ordering::Less,
      (false, true) => Ordering::Greater,
      _ => Ordering::Equal,
    }
  }
}
