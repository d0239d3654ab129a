//! Termination predicates.

use std::time::Duration;

use crate::solution::RankedSolution;

/// A snapshot of a running optimization, taken at a generation boundary.
#[derive(Debug)]
pub struct Progress<'a, V> {
  /// Number of completed generations. `0` right after the initial population
  /// was evaluated.
  pub generation: usize,
  /// Total number of problem evaluations so far.
  pub evaluations: usize,
  /// Time elapsed since the optimization started.
  pub elapsed: Duration,
  /// Current ranked population.
  pub population: &'a [RankedSolution<V>],
}

// manual impls avoid requiring `V: Clone`
impl<V> Clone for Progress<'_, V> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<V> Copy for Progress<'_, V> {}

/// Decides whether the optimization should stop. Checked once per
/// generation, before offspring are produced.
///
/// # Examples
/// ```
/// # use emoa::termination::{Progress, Termination};
/// // stop as soon as the whole population is non-dominated
/// let t = |p: &Progress<f64>| p.population.iter().all(|s| s.rank == 0);
/// ```
///
/// Any `FnMut(&Progress<V>) -> bool` is a termination predicate too.
pub trait Termination<V> {
  /// If returns `true`, the optimization is terminated.
  fn terminate(&mut self, progress: &Progress<V>) -> bool;
}

impl<V, F> Termination<V> for F
where
  F: FnMut(&Progress<V>) -> bool,
{
  fn terminate(&mut self, progress: &Progress<V>) -> bool {
    self(progress)
  }
}

/// Terminates once the number of problem evaluations reaches a budget.
///
/// The check happens between generations, so the final count may exceed the
/// budget by up to one generation of offspring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MaxEvaluations(pub usize);

impl<V> Termination<V> for MaxEvaluations {
  fn terminate(&mut self, progress: &Progress<V>) -> bool {
    progress.evaluations >= self.0
  }
}

/// Terminates after a given number of generations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MaxGenerations(pub usize);

impl<V> Termination<V> for MaxGenerations {
  fn terminate(&mut self, progress: &Progress<V>) -> bool {
    progress.generation >= self.0
  }
}

/// Terminates once a given amount of time has passed.
///
/// The running generation is never interrupted, so the total run time may
/// exceed the limit by one generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MaxDuration(pub Duration);

impl<V> Termination<V> for MaxDuration {
  fn terminate(&mut self, progress: &Progress<V>) -> bool {
    progress.elapsed >= self.0
  }
}
