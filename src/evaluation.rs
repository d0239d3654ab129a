//! Evaluation of solutions, sequential or on a worker pool.

use log::{error, warn};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::{
  error::{BoxError, Error},
  problem::Problem,
  score::Score,
  solution::Solution,
};

/// What to do when the problem fails to evaluate a solution.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum FailurePolicy {
  /// Let the rest of the batch finish, then return the failure of the
  /// solution with the lowest index.
  #[default]
  Abort,
  /// Assign `Score::MAX` to every objective and every constraint of the
  /// failed solution and carry on. A penalized solution of a constrained
  /// problem is infeasible, so any evaluated feasible or less violating
  /// solution dominates it.
  Penalize,
}

/// Evaluates a batch of solutions against a problem.
///
/// Implementations evaluate every solution exactly once and keep the order of
/// solutions intact. The call returns only after the whole batch is done.
pub trait Evaluator<V> {
  /// Evaluates `solutions` in place. `generation` is only used to report
  /// failures.
  fn evaluate<P>(
    &self,
    problem: &P,
    solutions: &mut [Solution<V>],
    generation: usize,
  ) -> Result<(), Error>
  where
    P: Problem<V> + Sync;
}

/// Evaluates solutions one after another on the calling thread.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SequentialEvaluator {
  policy: FailurePolicy,
}

impl SequentialEvaluator {
  /// Creates an evaluator with [`FailurePolicy::Abort`].
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the failure policy.
  pub fn with_policy(self, policy: FailurePolicy) -> Self {
    Self { policy }
  }
}

impl<V> Evaluator<V> for SequentialEvaluator {
  fn evaluate<P>(
    &self,
    problem: &P,
    solutions: &mut [Solution<V>],
    generation: usize,
  ) -> Result<(), Error>
  where
    P: Problem<V> + Sync,
  {
    let results: Vec<_> =
      solutions.iter_mut().map(|s| problem.evaluate(s)).collect();
    settle(self.policy, results, solutions, generation)
  }
}

/// Evaluates solutions concurrently on a dedicated [rayon] thread pool.
///
/// Each solution is an independent unit of work. By default every solution is
/// scheduled separately, which suits expensive evaluations. For cheap ones,
/// [`batched`](ParallelEvaluator::batched) splits the population into one
/// chunk per worker instead, cutting scheduling overhead.
///
/// **For simple problems, parallelization may only decrease performance
/// because of additional overhead introduced. Benchmark if in doubt.**
#[derive(Debug)]
pub struct ParallelEvaluator {
  pool: ThreadPool,
  policy: FailurePolicy,
  batched: bool,
}

impl ParallelEvaluator {
  /// Creates an evaluator backed by a pool of `threads` workers. If `threads`
  /// is `0`, the pool size matches available hardware parallelism.
  pub fn new(threads: usize) -> Result<Self, Error> {
    let pool = ThreadPoolBuilder::new()
      .num_threads(threads)
      .thread_name(|i| format!("emoa-evaluator-{i}"))
      .build()?;
    Ok(Self {
      pool,
      policy: FailurePolicy::default(),
      batched: false,
    })
  }

  /// Sets the failure policy.
  pub fn with_policy(self, policy: FailurePolicy) -> Self {
    Self { policy, ..self }
  }

  /// Evaluates one chunk of solutions per worker instead of scheduling each
  /// solution separately.
  pub fn batched(self) -> Self {
    Self {
      batched: true,
      ..self
    }
  }

  /// Returns the number of workers.
  pub fn threads(&self) -> usize {
    self.pool.current_num_threads()
  }
}

impl<V: Send> Evaluator<V> for ParallelEvaluator {
  fn evaluate<P>(
    &self,
    problem: &P,
    solutions: &mut [Solution<V>],
    generation: usize,
  ) -> Result<(), Error>
  where
    P: Problem<V> + Sync,
  {
    let results: Vec<Result<(), BoxError>> = self.pool.install(|| {
      if self.batched {
        let chunk_size = (solutions.len() / self.threads()).max(1);
        solutions
          .par_chunks_mut(chunk_size)
          .flat_map_iter(|chunk| {
            chunk.iter_mut().map(move |s| problem.evaluate(s))
          })
          .collect()
      } else {
        solutions
          .par_iter_mut()
          .map(|s| problem.evaluate(s))
          .collect()
      }
    });
    settle(self.policy, results, solutions, generation)
  }
}

/// Applies `policy` to per-solution results of a finished batch.
fn settle<V>(
  policy: FailurePolicy,
  results: Vec<Result<(), BoxError>>,
  solutions: &mut [Solution<V>],
  generation: usize,
) -> Result<(), Error> {
  debug_assert_eq!(
    results.len(),
    solutions.len(),
    "every solution must be evaluated exactly once"
  );

  let mut failure = None;
  for (index, (result, solution)) in
    results.into_iter().zip(solutions.iter_mut()).enumerate()
  {
    let Err(source) = result else {
      continue;
    };
    match policy {
      FailurePolicy::Penalize => {
        warn!(
          "generation {generation}: evaluation of solution {index} failed, \
           assigning worst objective values: {source}"
        );
        solution.objectives_mut().fill(Score::MAX);
        solution.constraints_mut().fill(Score::MAX);
      }
      FailurePolicy::Abort => {
        error!(
          "generation {generation}: evaluation of solution {index} failed: \
           {source}"
        );
        failure.get_or_insert(Error::Evaluation {
          generation,
          index,
          source,
        });
      }
    }
  }
  failure.map_or(Ok(()), Err)
}
