//! Mutation operators.

use rand::{Rng, RngCore};

use crate::{
  encoding::{missing_index, Bounds, Gene},
  error::{check_probability, Error},
  solution::Solution,
};

/// An operator that mutates a single solution in place.
///
/// Probability is usually applied per variable, so a mutation may leave the
/// solution untouched.
///
/// # Examples
/// Any closure taking a solution and a random generator is a `Mutation`
/// applied unconditionally:
/// ```
/// # use emoa::{mutation::Mutation, solution::Solution};
/// # use rand::{Rng, RngCore};
/// let m = |s: &mut Solution<f64>, rng: &mut dyn RngCore| {
///   for v in s.variables_mut() {
///     *v += rng.gen_range(-0.1..0.1);
///   }
/// };
/// assert_eq!(Mutation::probability(&m), 1.0);
/// ```
///
/// Closures get this trait for free, but a named type can carry its own
/// probability.
pub trait Mutation<V> {
  /// Probability of mutation, in `[0, 1]`.
  fn probability(&self) -> f64;

  /// Mutates `solution` in place.
  fn mutate(&self, solution: &mut Solution<V>, rng: &mut dyn RngCore);
}

impl<V, F> Mutation<V> for F
where
  F: Fn(&mut Solution<V>, &mut dyn RngCore),
{
  fn probability(&self) -> f64 {
    1.0
  }

  fn mutate(&self, solution: &mut Solution<V>, rng: &mut dyn RngCore) {
    self(solution, rng)
  }
}

/// Polynomial mutation for real-coded variables.
///
/// Each variable is perturbed with `probability` by a polynomially
/// distributed step scaled to its bounds. Larger distribution indices make
/// smaller steps. Results are clamped into bounds.
#[derive(Clone, PartialEq, Debug)]
pub struct PolynomialMutation {
  probability: f64,
  distribution_index: f64,
  bounds: Vec<Bounds<f64>>,
}

impl PolynomialMutation {
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
        "polynomial mutation distribution index must be non-negative, got \
         {distribution_index}"
      )));
    }
    Ok(Self {
      probability: check_probability("mutation", probability)?,
      distribution_index,
      bounds,
    })
  }

  /// Returns the distribution index.
  pub fn distribution_index(&self) -> f64 {
    self.distribution_index
  }
}

impl Mutation<f64> for PolynomialMutation {
  fn probability(&self) -> f64 {
    self.probability
  }

  fn mutate(&self, solution: &mut Solution<f64>, rng: &mut dyn RngCore) {
    debug_assert_eq!(
      solution.variables().len(),
      self.bounds.len(),
      "every variable must have bounds"
    );
    let power = 1.0 / (self.distribution_index + 1.0);
    for (x, b) in solution.variables_mut().iter_mut().zip(&self.bounds) {
      if rng.gen::<f64>() >= self.probability {
        continue;
      }
      let range = b.upper - b.lower;
      if range == 0.0 {
        *x = b.lower;
        continue;
      }
      let rand = rng.gen::<f64>();
      let deltaq = if rand < 0.5 {
        let xy = 1.0 - (*x - b.lower) / range;
        let val = 2.0 * rand
          + (1.0 - 2.0 * rand) * xy.powf(self.distribution_index + 1.0);
        val.powf(power) - 1.0
      } else {
        let xy = 1.0 - (b.upper - *x) / range;
        let val = 2.0 * (1.0 - rand)
          + 2.0 * (rand - 0.5) * xy.powf(self.distribution_index + 1.0);
        1.0 - val.powf(power)
      };
      *x = b.clamp(*x + deltaq * range);
    }
  }
}

/// Flips each bit of a binary solution with `probability`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BitFlipMutation {
  probability: f64,
}

impl BitFlipMutation {
  /// Creates the operator. Returns an error if `probability` is outside of
  /// `[0, 1]`.
  pub fn new(probability: f64) -> Result<Self, Error> {
    Ok(Self {
      probability: check_probability("mutation", probability)?,
    })
  }
}

impl Mutation<bool> for BitFlipMutation {
  fn probability(&self) -> f64 {
    self.probability
  }

  fn mutate(&self, solution: &mut Solution<bool>, rng: &mut dyn RngCore) {
    for bit in solution.variables_mut() {
      if rng.gen::<f64>() < self.probability {
        *bit = !*bit;
      }
    }
  }
}

/// Mutation of composite index-list solutions.
///
/// Each gene is toggled with `probability`: a selected index becomes
/// [`Gene::Unselected`], an unselected entry picks a random index of its
/// universe that the list doesn't select yet. Lists are kept sorted and never
/// select an index twice.
#[derive(Clone, PartialEq, Debug)]
pub struct IndexListMutation {
  probability: f64,
  universes: Vec<usize>,
}

impl IndexListMutation {
  /// Creates the operator. `universes` holds the number of selectable
  /// indices of each list.
  ///
  /// Returns an error if `probability` is outside of `[0, 1]`.
  pub fn new(probability: f64, universes: Vec<usize>) -> Result<Self, Error> {
    Ok(Self {
      probability: check_probability("mutation", probability)?,
      universes,
    })
  }
}

impl Mutation<Vec<Gene>> for IndexListMutation {
  fn probability(&self) -> f64 {
    self.probability
  }

  fn mutate(&self, solution: &mut Solution<Vec<Gene>>, rng: &mut dyn RngCore) {
    for (genes, &universe) in
      solution.variables_mut().iter_mut().zip(&self.universes)
    {
      for pos in 0..genes.len() {
        if rng.gen::<f64>() >= self.probability {
          continue;
        }
        genes[pos] = match genes[pos] {
          Gene::Selected(_) => Gene::Unselected,
          Gene::Unselected => missing_index(genes, universe, rng)
            .map_or(Gene::Unselected, Gene::Selected),
        };
      }
      genes.sort_unstable();
    }
  }
}
