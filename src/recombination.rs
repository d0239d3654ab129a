//! Crossover operators.

use rand::{Rng, RngCore};

use crate::{
  encoding::{resolve_duplicates, Bounds, Gene},
  error::{check_probability, Error},
  solution::Solution,
};

/// An operator that creates offspring from a fixed number of parents.
///
/// Implementations declare how many parents they take and how many offspring
/// they produce. Offspring are unevaluated: their objective and constraint
/// values are reset (see [`Solution::derive`]). When the operator decides not
/// to recombine, offspring are copies of the parents' variables.
pub trait Crossover<V> {
  /// Number of parents taken by a single [`execute`](Crossover::execute) call.
  fn parents(&self) -> usize;

  /// Number of offspring produced by a single call.
  fn offspring(&self) -> usize;

  /// Probability of recombination, in `[0, 1]`.
  fn probability(&self) -> f64;

  /// Recombines `parents` into offspring.
  ///
  /// Returns [`Error::ParentCount`] if the length of `parents` differs from
  /// [`parents`](Crossover::parents).
  fn execute(
    &self,
    parents: &[&Solution<V>],
    rng: &mut dyn RngCore,
  ) -> Result<Vec<Solution<V>>, Error>;
}

fn check_parents(
  operator: &'static str,
  expected: usize,
  actual: usize,
) -> Result<(), Error> {
  if expected == actual {
    Ok(())
  } else {
    Err(Error::ParentCount {
      operator,
      expected,
      actual,
    })
  }
}

fn check_variables(expected: usize, actual: usize) -> Result<(), Error> {
  if expected == actual {
    Ok(())
  } else {
    Err(Error::VariableCountMismatch { expected, actual })
  }
}

/// Simulated binary crossover for real-coded variables.
///
/// Each variable pair is recombined with probability `0.5`, spreading
/// children around the parents according to the distribution index. Larger
/// indices keep children closer to their parents. Children are clamped into
/// bounds.
#[derive(Clone, PartialEq, Debug)]
pub struct SbxCrossover {
  probability: f64,
  distribution_index: f64,
  bounds: Vec<Bounds<f64>>,
}

impl SbxCrossover {
  const EPSILON: f64 = 1.0e-14;

  /// Creates the operator. `bounds` holds one entry per decision variable.
  ///
  /// Returns an error if `probability` is outside of `[0, 1]` or
  /// `distribution_index` is negative.
  pub fn new(
    probability: f64,
    distribution_index: f64,
    bounds: Vec<Bounds<f64>>,
  ) -> Result<Self, Error> {
    if distribution_index.is_nan() || distribution_index < 0.0 {
      return Err(Error::InvalidConfig(format!(
        "SBX distribution index must be non-negative, got {distribution_index}"
      )));
    }
    Ok(Self {
      probability: check_probability("crossover", probability)?,
      distribution_index,
      bounds,
    })
  }

  /// Returns the distribution index.
  pub fn distribution_index(&self) -> f64 {
    self.distribution_index
  }

  fn spread(&self, beta: f64, rand: f64) -> f64 {
    let exponent = 1.0 / (self.distribution_index + 1.0);
    let alpha = 2.0 - beta.powf(-(self.distribution_index + 1.0));
    if rand <= 1.0 / alpha {
      (rand * alpha).powf(exponent)
    } else {
      (1.0 / (2.0 - rand * alpha)).powf(exponent)
    }
  }
}

impl Crossover<f64> for SbxCrossover {
  fn parents(&self) -> usize {
    2
  }

  fn offspring(&self) -> usize {
    2
  }

  fn probability(&self) -> f64 {
    self.probability
  }

  fn execute(
    &self,
    parents: &[&Solution<f64>],
    rng: &mut dyn RngCore,
  ) -> Result<Vec<Solution<f64>>, Error> {
    check_parents("SbxCrossover", 2, parents.len())?;
    let (a, b) = (parents[0], parents[1]);
    check_variables(self.bounds.len(), a.variables().len())?;
    check_variables(self.bounds.len(), b.variables().len())?;

    let mut x = a.variables().to_vec();
    let mut y = b.variables().to_vec();
    if rng.gen::<f64>() < self.probability {
      for (i, bounds) in self.bounds.iter().enumerate() {
        if rng.gen::<f64>() > 0.5 || (x[i] - y[i]).abs() <= Self::EPSILON {
          continue;
        }
        let (y1, y2) = (x[i].min(y[i]), x[i].max(y[i]));
        let rand = rng.gen::<f64>();

        let beta = 1.0 + 2.0 * (y1 - bounds.lower) / (y2 - y1);
        let betaq = self.spread(beta, rand);
        let c1 = bounds.clamp(0.5 * ((y1 + y2) - betaq * (y2 - y1)));

        let beta = 1.0 + 2.0 * (bounds.upper - y2) / (y2 - y1);
        let betaq = self.spread(beta, rand);
        let c2 = bounds.clamp(0.5 * ((y1 + y2) + betaq * (y2 - y1)));

        if rng.gen_bool(0.5) {
          (x[i], y[i]) = (c2, c1);
        } else {
          (x[i], y[i]) = (c1, c2);
        }
      }
    }
    Ok(vec![a.derive(x), b.derive(y)])
  }
}

/// Swaps the tails of two parents after a random cut point. Works with any
/// encoding.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SinglePointCrossover {
  probability: f64,
}

impl SinglePointCrossover {
  /// Creates the operator. Returns an error if `probability` is outside of
  /// `[0, 1]`.
  pub fn new(probability: f64) -> Result<Self, Error> {
    Ok(Self {
      probability: check_probability("crossover", probability)?,
    })
  }
}

impl<V: Clone> Crossover<V> for SinglePointCrossover {
  fn parents(&self) -> usize {
    2
  }

  fn offspring(&self) -> usize {
    2
  }

  fn probability(&self) -> f64 {
    self.probability
  }

  fn execute(
    &self,
    parents: &[&Solution<V>],
    rng: &mut dyn RngCore,
  ) -> Result<Vec<Solution<V>>, Error> {
    check_parents("SinglePointCrossover", 2, parents.len())?;
    let (a, b) = (parents[0], parents[1]);
    let len = a.variables().len();
    check_variables(len, b.variables().len())?;

    let mut x = a.variables().to_vec();
    let mut y = b.variables().to_vec();
    if len > 1 && rng.gen::<f64>() < self.probability {
      let cut = rng.gen_range(1..len);
      x[cut..].swap_with_slice(&mut y[cut..]);
    }
    Ok(vec![a.derive(x), b.derive(y)])
  }
}

/// Crossover of composite index-list solutions.
///
/// Each decision variable is a list of [`Gene`]s selecting indices from its
/// own universe, e.g. rows and columns of a matrix. Every list is cut at a
/// random interior point and tails are swapped. Repeated selections in a
/// child are resolved by [`resolve_duplicates`], so children never select
/// the same index twice within a list and their lists are sorted.
#[derive(Clone, PartialEq, Debug)]
pub struct IndexListCrossover {
  probability: f64,
  duplicates_probability: f64,
  universes: Vec<usize>,
}

impl IndexListCrossover {
  /// Creates the operator. `universes` holds the number of selectable
  /// indices of each list. A repeated index becomes [`Gene::Unselected`]
  /// with `duplicates_probability`, otherwise it is replaced by a missing
  /// one.
  ///
  /// Returns an error if either probability is outside of `[0, 1]`.
  pub fn new(
    probability: f64,
    duplicates_probability: f64,
    universes: Vec<usize>,
  ) -> Result<Self, Error> {
    Ok(Self {
      probability: check_probability("crossover", probability)?,
      duplicates_probability: check_probability(
        "duplicates",
        duplicates_probability,
      )?,
      universes,
    })
  }
}

impl Crossover<Vec<Gene>> for IndexListCrossover {
  fn parents(&self) -> usize {
    2
  }

  fn offspring(&self) -> usize {
    2
  }

  fn probability(&self) -> f64 {
    self.probability
  }

  fn execute(
    &self,
    parents: &[&Solution<Vec<Gene>>],
    rng: &mut dyn RngCore,
  ) -> Result<Vec<Solution<Vec<Gene>>>, Error> {
    check_parents("IndexListCrossover", 2, parents.len())?;
    let (a, b) = (parents[0], parents[1]);
    check_variables(self.universes.len(), a.variables().len())?;
    check_variables(self.universes.len(), b.variables().len())?;
    for (x, y) in a.variables().iter().zip(b.variables()) {
      check_variables(x.len(), y.len())?;
    }

    let mut x = a.variables().to_vec();
    let mut y = b.variables().to_vec();
    if rng.gen::<f64>() < self.probability {
      for ((xs, ys), &universe) in x.iter_mut().zip(&mut y).zip(&self.universes)
      {
        if xs.len() > 2 {
          let cut = rng.gen_range(1..xs.len() - 1);
          xs[cut..].swap_with_slice(&mut ys[cut..]);
        }
        *xs =
          resolve_duplicates(xs, universe, self.duplicates_probability, rng);
        *ys =
          resolve_duplicates(ys, universe, self.duplicates_probability, rng);
      }
    }
    Ok(vec![a.derive(x), b.derive(y)])
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;
  use crate::encoding::{has_unique_selection, Gene::Selected as S};

  fn real(xs: &[f64]) -> Solution<f64> {
    Solution::new(xs.to_vec(), 2, 0)
  }

  fn bounds(n: usize) -> Vec<Bounds<f64>> {
    vec![Bounds { lower: 0.0, upper: 1.0 }; n]
  }

  #[test]
  fn test_invalid_parameters() {
    assert!(matches!(
      SbxCrossover::new(1.5, 20.0, bounds(1)),
      Err(Error::InvalidProbability { .. })
    ));
    assert!(matches!(
      SbxCrossover::new(0.9, -1.0, bounds(1)),
      Err(Error::InvalidConfig(_))
    ));
    assert!(SinglePointCrossover::new(-0.1).is_err());
    assert!(IndexListCrossover::new(0.9, 2.0, vec![10]).is_err());
  }

  #[test]
  fn test_wrong_parent_count() {
    let mut rng = StdRng::seed_from_u64(0);
    let c = SinglePointCrossover::new(1.0).unwrap();
    let p = real(&[0.5, 0.5]);
    let err = c.execute(&[&p], &mut rng).unwrap_err();
    assert!(matches!(
      err,
      Error::ParentCount {
        expected: 2,
        actual: 1,
        ..
      }
    ));
  }

  #[test]
  fn test_sbx_stays_in_bounds_and_resets_objectives() {
    let mut rng = StdRng::seed_from_u64(1);
    let c = SbxCrossover::new(1.0, 20.0, bounds(5)).unwrap();
    let mut a = real(&[0.0, 0.2, 0.4, 0.6, 1.0]);
    a.objectives_mut().fill(7.0);
    let b = real(&[1.0, 0.8, 0.6, 0.4, 0.0]);
    let mut changed = false;
    for _ in 0..100 {
      let children = c.execute(&[&a, &b], &mut rng).unwrap();
      assert_eq!(children.len(), 2);
      for child in &children {
        assert_eq!(child.objectives(), &[0.0, 0.0]);
        assert!(child.variables().iter().all(|v| (0.0..=1.0).contains(v)));
        changed |= child.variables() != a.variables()
          && child.variables() != b.variables();
      }
    }
    assert!(changed);
  }

  #[test]
  fn test_sbx_without_recombination_copies_parents() {
    let mut rng = StdRng::seed_from_u64(2);
    let c = SbxCrossover::new(0.0, 20.0, bounds(2)).unwrap();
    let (a, b) = (real(&[0.1, 0.2]), real(&[0.3, 0.4]));
    let children = c.execute(&[&a, &b], &mut rng).unwrap();
    assert_eq!(children[0].variables(), a.variables());
    assert_eq!(children[1].variables(), b.variables());
  }

  #[test]
  fn test_sbx_rejects_mismatched_bounds() {
    let mut rng = StdRng::seed_from_u64(3);
    let c = SbxCrossover::new(1.0, 20.0, bounds(3)).unwrap();
    let (a, b) = (real(&[0.1, 0.2]), real(&[0.3, 0.4]));
    assert!(matches!(
      c.execute(&[&a, &b], &mut rng),
      Err(Error::VariableCountMismatch {
        expected: 3,
        actual: 2
      })
    ));
  }

  #[test]
  fn test_single_point_swaps_tails() {
    let mut rng = StdRng::seed_from_u64(4);
    let c = SinglePointCrossover::new(1.0).unwrap();
    let a = Solution::new(vec![true; 8], 1, 0);
    let b = Solution::new(vec![false; 8], 1, 0);
    let children = c.execute(&[&a, &b], &mut rng).unwrap();
    let x = children[0].variables();
    let y = children[1].variables();
    let cut = x.iter().position(|v| !v).unwrap();
    assert!(cut >= 1);
    assert!(x[..cut].iter().all(|&v| v) && x[cut..].iter().all(|&v| !v));
    assert!(y[..cut].iter().all(|&v| !v) && y[cut..].iter().all(|&v| v));
  }

  #[test]
  fn test_index_list_children_have_unique_sorted_selection() {
    let mut rng = StdRng::seed_from_u64(5);
    let c = IndexListCrossover::new(1.0, 0.5, vec![10, 6]).unwrap();
    let a = Solution::new(
      vec![vec![S(0), S(1), S(2), S(3), S(4)], vec![S(0), S(1), S(2)]],
      2,
      0,
    );
    let b = Solution::new(
      vec![vec![S(4), S(3), S(2), S(1), S(0)], vec![S(2), S(1), S(0)]],
      2,
      0,
    );
    for _ in 0..100 {
      for child in c.execute(&[&a, &b], &mut rng).unwrap() {
        for (list, &universe) in child.variables().iter().zip(&[10, 6]) {
          assert_eq!(list.len(), if universe == 10 { 5 } else { 3 });
          assert!(has_unique_selection(list));
          assert!(list.windows(2).all(|w| w[0] <= w[1]));
          assert!(list.iter().filter_map(|g| g.index()).all(|i| i < universe));
        }
      }
    }
  }

  #[test]
  fn test_index_list_rejects_mismatched_lists() {
    let mut rng = StdRng::seed_from_u64(6);
    let c = IndexListCrossover::new(1.0, 0.5, vec![10]).unwrap();
    let a = Solution::new(vec![vec![S(0), S(1)]], 1, 0);
    let b = Solution::new(vec![vec![S(0), S(1), S(2)]], 1, 0);
    assert!(c.execute(&[&a, &b], &mut rng).is_err());
  }
}
