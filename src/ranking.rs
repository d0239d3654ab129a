//! Fast non-dominated ranking.

use std::cmp::Ordering;

use crate::{
  dominance,
  error::Error,
  solution::{Rank, Solution},
};

type SolutionIndex = usize;

/// Indices of solutions sharing the same dominance rank.
pub type Front = Vec<SolutionIndex>;

/// Partition of a population into dominance fronts.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Ranking {
  fronts: Vec<Front>,
  ranks: Vec<Rank>,
}

impl Ranking {
  /// Ranks `solutions`, returning fronts ordered from the best one.
  ///
  /// Every index of `solutions` lands in exactly one front. Within a front,
  /// indices are ordered by the order in which they were discovered, which is
  /// deterministic for a given input order.
  ///
  /// Runs `O(N^2 * M)` dominance comparisons for `N` solutions with `M`
  /// objectives. Returns an error if objective vectors have different lengths.
  pub fn compute<V, S: AsRef<Solution<V>>>(
    solutions: &[S],
  ) -> Result<Self, Error> {
    let n = solutions.len();
    // indices each solution dominates
    let mut dominated: Vec<Vec<SolutionIndex>> = vec![Vec::new(); n];
    // how many solutions dominate each one
    let mut dominators: Vec<usize> = vec![0; n];

    for p in 0..n {
      let a = solutions[p].as_ref();
      for q in p + 1..n {
        match dominance::compare(a, solutions[q].as_ref())? {
          Ordering::Less => {
            dominated[p].push(q);
            dominators[q] += 1;
          }
          Ordering::Greater => {
            dominated[q].push(p);
            dominators[p] += 1;
          }
          Ordering::Equal => {}
        }
      }
    }

    let mut ranks = vec![Rank::MAX; n];
    let mut fronts = Vec::new();
    let mut front: Front =
      (0..n).filter(|&i| dominators[i] == 0).collect();
    while !front.is_empty() {
      let mut released = Vec::new();
      for &p in &front {
        ranks[p] = fronts.len();
        // release each solution `q` dominated by `p`
        for &q in &dominated[p] {
          dominators[q] -= 1;
          if dominators[q] == 0 {
            released.push(q);
          }
        }
      }
      fronts.push(std::mem::replace(&mut front, released));
    }

    debug_assert_eq!(
      fronts.iter().map(Vec::len).sum::<usize>(),
      n,
      "fronts must cover every solution exactly once"
    );

    Ok(Self { fronts, ranks })
  }

  /// Returns all fronts, the best one first.
  pub fn fronts(&self) -> &[Front] {
    &self.fronts
  }

  /// Moves fronts out of the ranking.
  pub fn into_fronts(self) -> Vec<Front> {
    self.fronts
  }

  /// Returns the front with given rank, if it exists.
  pub fn front(&self, rank: Rank) -> Option<&Front> {
    self.fronts.get(rank)
  }

  /// Returns the number of fronts.
  pub fn number_of_fronts(&self) -> usize {
    self.fronts.len()
  }

  /// Returns the rank of the solution at `index`.
  ///
  /// # Panics
  ///
  /// Panics if `index` is out of bounds of the ranked population.
  pub fn rank(&self, index: usize) -> Rank {
    self.ranks[index]
  }
}

/// Returns references to the non-dominated solutions of `solutions`.
pub fn non_dominated<V>(
  solutions: &[Solution<V>],
) -> Result<Vec<&Solution<V>>, Error> {
  let ranking = Ranking::compute(solutions)?;
  Ok(
    ranking
      .front(0)
      .map(|f| f.iter().map(|&i| &solutions[i]).collect())
      .unwrap_or_default(),
  )
}
