//! Helpers for decision variable encodings.
//!
//! Most encodings need nothing beyond the variable type itself. Real and
//! integer encodings carry per-variable [`Bounds`]. Composite index-list
//! encodings, where a solution selects a subset of rows and columns of some
//! matrix, store each list as `Vec<Gene>`.

use std::{cmp::Ordering, collections::HashSet};

use rand::{seq::SliceRandom, Rng, RngCore};

/// Inclusive bounds of a decision variable.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds<T> {
  /// Lower bound.
  pub lower: T,
  /// Upper bound.
  pub upper: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
  /// Creates new bounds. Returns `None` if `lower > upper`.
  pub fn new(lower: T, upper: T) -> Option<Self> {
    (lower <= upper).then_some(Self { lower, upper })
  }

  /// Clamps `value` into bounds. A value not comparable to the bounds, such
  /// as `NaN`, becomes the lower bound.
  pub fn clamp(&self, value: T) -> T {
    match value.partial_cmp(&self.lower) {
      None | Some(Ordering::Less) => self.lower,
      _ if value > self.upper => self.upper,
      _ => value,
    }
  }
}

/// An entry of an index list.
///
/// Ordering places selected indices first, ascending, followed by unselected
/// entries, so a sorted list reads as the selected set plus padding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Gene {
  /// The entry selects the row or column at this index.
  Selected(usize),
  /// The entry selects nothing.
  Unselected,
}

impl Gene {
  /// Returns the selected index, if any.
  pub fn index(self) -> Option<usize> {
    match self {
      Gene::Selected(i) => Some(i),
      Gene::Unselected => None,
    }
  }
}

/// Returns selected indices of `genes` in list order.
pub fn selected(genes: &[Gene]) -> impl Iterator<Item = usize> + '_ {
  genes.iter().filter_map(|g| g.index())
}

/// Returns a random index in `0..universe` that `genes` does not select, or
/// `None` if every index is already selected.
pub fn missing_index(
  genes: &[Gene],
  universe: usize,
  rng: &mut dyn RngCore,
) -> Option<usize> {
  let present: HashSet<usize> = selected(genes).collect();
  let missing: Vec<usize> =
    (0..universe).filter(|i| !present.contains(i)).collect();
  missing.choose(rng).copied()
}

/// Replaces repeated selected indices of `genes`, returning a sorted list of
/// the same length with no selected index occurring twice.
///
/// The first occurrence of each index is kept. Each later occurrence becomes
/// [`Gene::Unselected`] with probability `unselect_probability`, otherwise it
/// is replaced by a random index from `0..universe` missing from the list,
/// falling back to [`Gene::Unselected`] if there is none.
pub fn resolve_duplicates(
  genes: &[Gene],
  universe: usize,
  unselect_probability: f64,
  rng: &mut dyn RngCore,
) -> Vec<Gene> {
  let mut seen = HashSet::with_capacity(genes.len());
  let mut resolved: Vec<Gene> = genes
    .iter()
    .map(|&g| match g {
      Gene::Selected(i) if !seen.insert(i) => Gene::Unselected,
      g => g,
    })
    .collect();
  let duplicates: Vec<usize> = genes
    .iter()
    .zip(&resolved)
    .enumerate()
    .filter(|(_, (orig, res))| orig != res)
    .map(|(pos, _)| pos)
    .collect();
  for pos in duplicates {
    if rng.gen::<f64>() < unselect_probability {
      continue;
    }
    if let Some(i) = missing_index(&resolved, universe, rng) {
      resolved[pos] = Gene::Selected(i);
    }
  }
  resolved.sort_unstable();
  resolved
}

/// Returns `true` if no selected index occurs twice in `genes`.
pub fn has_unique_selection(genes: &[Gene]) -> bool {
  let mut seen = HashSet::new();
  selected(genes).all(|i| seen.insert(i))
}
