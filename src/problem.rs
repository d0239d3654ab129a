//! The problem contract consumed by the engine.

use rand::RngCore;

use crate::{error::BoxError, solution::Solution};

/// A multi-objective optimization problem.
///
/// A problem declares how many variables, objectives and constraints its
/// solutions have, creates random solutions, and evaluates them by filling in
/// their objective and constraint values.
///
/// `evaluate` may be called concurrently from several worker threads, so it
/// must not mutate any state shared between solutions.
///
/// # Examples
/// ```
/// # use emoa::{problem::Problem, solution::Solution, error::BoxError};
/// # use rand::{Rng, RngCore};
/// /// Schaffer's problem N.1: `f1(x) = x^2`, `f2(x) = (x - 2)^2`.
/// struct Schaffer;
///
/// impl Problem<f64> for Schaffer {
///   fn number_of_variables(&self) -> usize {
///     1
///   }
///
///   fn number_of_objectives(&self) -> usize {
///     2
///   }
///
///   fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
///     Solution::new(vec![rng.gen_range(-10.0..10.0)], 2, 0)
///   }
///
///   fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
///     let x = solution.variables()[0];
///     solution.objectives_mut().copy_from_slice(&[x * x, (x - 2.0) * (x - 2.0)]);
///     Ok(())
///   }
/// }
/// ```
pub trait Problem<V> {
  /// Returns the number of decision variables of each solution.
  fn number_of_variables(&self) -> usize;

  /// Returns the number of objectives of each solution.
  fn number_of_objectives(&self) -> usize;

  /// Returns the number of constraints of each solution.
  fn number_of_constraints(&self) -> usize {
    0
  }

  /// Returns a human readable problem name used in logs.
  fn name(&self) -> &str {
    std::any::type_name::<Self>()
  }

  /// Creates a new random solution.
  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<V>;

  /// Evaluates objectives and constraints of given solution in place.
  fn evaluate(&self, solution: &mut Solution<V>) -> Result<(), BoxError>;
}

impl<V, P: Problem<V> + ?Sized> Problem<V> for &P {
  fn number_of_variables(&self) -> usize {
    (**self).number_of_variables()
  }

  fn number_of_objectives(&self) -> usize {
    (**self).number_of_objectives()
  }

  fn number_of_constraints(&self) -> usize {
    (**self).number_of_constraints()
  }

  fn name(&self) -> &str {
    (**self).name()
  }

  fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<V> {
    (**self).create_solution(rng)
  }

  fn evaluate(&self, solution: &mut Solution<V>) -> Result<(), BoxError> {
    (**self).evaluate(solution)
  }
}
