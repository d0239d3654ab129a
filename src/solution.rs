//! Candidate solutions and their per-generation ranking data.

use crate::score::{Score, Scores};

/// A candidate solution: decision variables plus the objective and constraint
/// values computed for them.
///
/// The type of decision variables `V` depends on the encoding: `f64` for
/// real-coded problems, `bool` for binary ones, `usize` for permutations or
/// `Vec<Gene>` for composites of index lists (see [`crate::encoding`]).
///
/// Lengths of objective and constraint vectors are fixed on creation and
/// never change for the lifetime of a solution. Cloning a solution deep
/// copies all of its values.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<V> {
  variables: Vec<V>,
  objectives: Vec<Score>,
  constraints: Vec<Score>,
}

impl<V> Solution<V> {
  /// Creates an unevaluated solution with all objective and constraint values
  /// set to zero.
  pub fn new(
    variables: Vec<V>,
    objective_count: usize,
    constraint_count: usize,
  ) -> Self {
    Self {
      variables,
      objectives: vec![0.0; objective_count],
      constraints: vec![0.0; constraint_count],
    }
  }

  /// Creates a solution with known objective values and no constraints.
  pub fn with_objectives(variables: Vec<V>, objectives: Vec<Score>) -> Self {
    Self {
      variables,
      objectives,
      constraints: Vec::new(),
    }
  }

  /// Creates an unevaluated solution with given variables and the same number
  /// of objectives and constraints as `self`. Used by variation operators to
  /// build offspring.
  pub fn derive(&self, variables: Vec<V>) -> Self {
    Self::new(variables, self.objectives.len(), self.constraints.len())
  }

  /// Returns decision variables.
  pub fn variables(&self) -> &[V] {
    &self.variables
  }

  /// Returns mutable decision variables.
  pub fn variables_mut(&mut self) -> &mut [V] {
    &mut self.variables
  }

  /// Returns objective values.
  pub fn objectives(&self) -> &Scores {
    &self.objectives
  }

  /// Returns mutable objective values. The slice can't be resized.
  pub fn objectives_mut(&mut self) -> &mut Scores {
    &mut self.objectives
  }

  /// Returns constraint violation values. `0` means the constraint is
  /// satisfied.
  pub fn constraints(&self) -> &Scores {
    &self.constraints
  }

  /// Returns mutable constraint violation values.
  pub fn constraints_mut(&mut self) -> &mut Scores {
    &mut self.constraints
  }

  /// Returns the aggregated magnitude of all constraint violations.
  pub fn constraint_violation(&self) -> Score {
    self.constraints.iter().map(|c| c.abs()).sum()
  }

  /// Returns `true` if no constraint is violated.
  pub fn is_feasible(&self) -> bool {
    self.constraint_violation() == 0.0
  }

  /// Moves decision variables out of the solution.
  pub fn into_variables(self) -> Vec<V> {
    self.variables
  }
}

/// Index of a dominance front, `0` being the non-dominated one.
pub type Rank = usize;

/// Crowding distance of a solution within its front. Higher is more isolated.
pub type Density = f64;

/// A solution tagged with the rank and density it was assigned during the
/// current generation.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedSolution<V> {
  /// The solution itself.
  pub solution: Solution<V>,
  /// Index of the front the solution belongs to.
  pub rank: Rank,
  /// Crowding distance within the solution's front.
  pub density: Density,
}

impl<V> RankedSolution<V> {
  /// Creates a ranked solution.
  pub fn new(solution: Solution<V>, rank: Rank, density: Density) -> Self {
    Self {
      solution,
      rank,
      density,
    }
  }

  /// Returns `true` if the solution is better by the crowded comparison
  /// operator: lower rank wins, ties are broken by higher density.
  pub fn crowded_better(&self, other: &Self) -> bool {
    self.rank < other.rank
      || (self.rank == other.rank && self.density > other.density)
  }
}

impl<V> AsRef<Solution<V>> for RankedSolution<V> {
  fn as_ref(&self) -> &Solution<V> {
    &self.solution
  }
}

impl<V> AsRef<Solution<V>> for Solution<V> {
  fn as_ref(&self) -> &Solution<V> {
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_solution_has_fixed_lengths() {
    let mut s = Solution::new(vec![0.5, 0.25], 3, 1);
    assert_eq!(s.variables(), &[0.5, 0.25]);
    assert_eq!(s.objectives().len(), 3);
    assert_eq!(s.constraints().len(), 1);
    s.objectives_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
    assert_eq!(s.objectives(), &[1.0, 2.0, 3.0]);
  }

  #[test]
  fn test_constraint_violation() {
    let mut s = Solution::new(vec![true], 1, 2);
    assert!(s.is_feasible());
    s.constraints_mut().copy_from_slice(&[-0.5, 1.5]);
    assert_eq!(s.constraint_violation(), 2.0);
    assert!(!s.is_feasible());
  }

  #[test]
  fn test_clone_is_deep() {
    let a = Solution::with_objectives(vec![1, 2, 3], vec![1.0, 2.0]);
    let mut b = a.clone();
    b.variables_mut()[0] = 10;
    b.objectives_mut()[0] = 10.0;
    assert_eq!(a.variables(), &[1, 2, 3]);
    assert_eq!(a.objectives(), &[1.0, 2.0]);
  }

  #[test]
  fn test_derived_solution_is_unevaluated() {
    let mut parent = Solution::new(vec![0.5], 2, 1);
    parent.objectives_mut().copy_from_slice(&[3.0, 4.0]);
    let child = parent.derive(vec![0.25]);
    assert_eq!(child.variables(), &[0.25]);
    assert_eq!(child.objectives(), &[0.0, 0.0]);
    assert_eq!(child.constraints().len(), 1);
  }

  #[test]
  fn test_crowded_comparison() {
    let s = || Solution::with_objectives(vec![0.0], vec![0.0]);
    let a = RankedSolution::new(s(), 0, 1.0);
    let b = RankedSolution::new(s(), 1, f64::INFINITY);
    let c = RankedSolution::new(s(), 0, 2.0);
    assert!(a.crowded_better(&b));
    assert!(!b.crowded_better(&a));
    assert!(c.crowded_better(&a));
    assert!(!a.crowded_better(&a));
  }
}
