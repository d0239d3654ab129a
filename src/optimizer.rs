//! Abstract optimizer and the result of a run.

pub mod nsga;

use crate::{error::Error, solution::Solution};

/// Why an optimization stopped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StopReason {
  /// The termination predicate was satisfied.
  Terminated,
  /// A [`CancellationToken`](crate::observer::CancellationToken) was
  /// cancelled.
  Cancelled,
}

/// The result of an optimization.
#[derive(Clone, Debug)]
pub struct Outcome<V> {
  /// The approximation of the Pareto front: the archive contents if an
  /// archive was configured, otherwise the non-dominated members of the last
  /// population.
  pub solutions: Vec<Solution<V>>,
  /// Total number of problem evaluations.
  pub evaluations: usize,
  /// Number of completed generations.
  pub generations: usize,
  /// Why the optimization stopped.
  pub stop: StopReason,
}

/// A search procedure that runs to completion and reports its result.
pub trait Optimizer<V>: Sized {
  /// Runs the optimizer until it is terminated or cancelled, then returns
  /// the best found solutions.
  ///
  /// Configuration is validated before the first generation runs. Returns an
  /// error on invalid configuration, on a contract violation by an operator,
  /// or on a failed evaluation that isn't penalized.
  fn optimize(self) -> Result<Outcome<V>, Error>;
}
