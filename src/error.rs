//! The crate's error type.

/// A boxed error returned by a failing [`Problem`] evaluation.
///
/// [`Problem`]: crate::problem::Problem
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by the engine.
///
/// Configuration errors are returned before any generation runs. Contract
/// violations are returned at the call that violated them. Evaluation errors
/// carry the generation and the index of the failed solution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A probability parameter lies outside of `[0, 1]`.
  #[error("{name} probability must lie in [0, 1], got {value}")]
  InvalidProbability {
    /// Name of the parameter.
    name: &'static str,
    /// Rejected value.
    value: f64,
  },
  /// Population size is zero.
  #[error("population size must be positive")]
  EmptyPopulation,
  /// Archive capacity is zero.
  #[error("archive capacity must be positive")]
  ZeroCapacity,
  /// Any other invalid configuration value.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  /// The worker pool could not be started.
  #[error("failed to build evaluation thread pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
  /// Two objective vectors of different lengths were compared.
  #[error("objective vectors differ in length: {0} and {1}")]
  ObjectiveCountMismatch(usize, usize),
  /// A created solution holds a different number of constraint values than
  /// its problem declares.
  #[error("problem declares {expected} constraints, solution has {actual}")]
  ConstraintCountMismatch {
    /// Number of constraints declared by the problem.
    expected: usize,
    /// Number of constraint values the solution has.
    actual: usize,
  },
  /// Two solutions, or a solution and its operator, disagree on the number of
  /// decision variables.
  #[error("expected {expected} decision variables, got {actual}")]
  VariableCountMismatch {
    /// Number of variables the operator or the first solution has.
    expected: usize,
    /// Number of variables actually found.
    actual: usize,
  },
  /// An operator received a wrong number of parents.
  #[error("{operator} requires {expected} parents, got {actual}")]
  ParentCount {
    /// Name of the operator.
    operator: &'static str,
    /// Number of parents the operator declares.
    expected: usize,
    /// Number of parents it received.
    actual: usize,
  },
  /// An operator produced a different number of offspring than it declares.
  #[error("{operator} declares {expected} offspring, produced {actual}")]
  OffspringCount {
    /// Name of the operator.
    operator: &'static str,
    /// Number of offspring the operator declares.
    expected: usize,
    /// Number of offspring it produced.
    actual: usize,
  },
  /// A selection operator was invoked on an empty population.
  #[error("cannot select a parent from an empty population")]
  EmptySelectionPool,
  /// Evaluation of a single solution failed.
  #[error("evaluation of solution {index} failed in generation {generation}")]
  Evaluation {
    /// Generation in which the failure happened, `0` being the initial
    /// population.
    generation: usize,
    /// Index of the solution within the evaluated batch.
    index: usize,
    /// The error returned by the problem.
    #[source]
    source: BoxError,
  },
}

/// Checks that a probability lies in `[0, 1]`.
pub(crate) fn check_probability(
  name: &'static str,
  value: f64,
) -> Result<f64, Error> {
  if (0.0..=1.0).contains(&value) {
    Ok(value)
  } else {
    Err(Error::InvalidProbability { name, value })
  }
}
