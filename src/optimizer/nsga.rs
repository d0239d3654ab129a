//! Implementations of genetic algorithms of NSGA family.

use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use typed_builder::TypedBuilder;

use super::{Optimizer, Outcome, StopReason};
use crate::{
  archive::SharedArchive,
  error::{check_probability, Error},
  evaluation::Evaluator,
  mutation::Mutation,
  observer::{CancellationToken, Observer},
  problem::Problem,
  recombination::Crossover,
  replacement,
  selection::Selection,
  solution::{RankedSolution, Solution},
  termination::{Progress, Termination},
};

/// The NSGA-II algorithm.
///
/// Each generation selects parents from the ranked population, recombines
/// and mutates them into as many offspring as there are members, evaluates
/// the offspring and keeps the best members of the merged population by rank
/// and crowding distance (see [`replacement`]).
///
/// Configured through [`Nsga2::builder`]. Problem, population size, evaluator
/// and all operators are required; an archive, a seed, observers and a
/// cancellation token are optional.
///
/// Every solution the problem creates must hold as many objective and
/// constraint values as the problem declares, otherwise `optimize` fails
/// before anything is evaluated.
///
/// Observers run on the optimizer's thread between generations, so a slow
/// observer stalls the whole run. Closure observers must return promptly;
/// anything heavier belongs behind a
/// [`ChannelObserver`](crate::observer::ChannelObserver).
///
/// # Examples
/// ```
/// # use emoa::prelude::*;
/// # use rand::{Rng, RngCore};
/// # struct Schaffer;
/// # impl Problem<f64> for Schaffer {
/// #   fn number_of_variables(&self) -> usize { 1 }
/// #   fn number_of_objectives(&self) -> usize { 2 }
/// #   fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
/// #     Solution::new(vec![rng.gen_range(-10.0..10.0)], 2, 0)
/// #   }
/// #   fn evaluate(&self, s: &mut Solution<f64>) -> Result<(), BoxError> {
/// #     let x = s.variables()[0];
/// #     s.objectives_mut().copy_from_slice(&[x * x, (x - 2.0) * (x - 2.0)]);
/// #     Ok(())
/// #   }
/// # }
/// let bounds = vec![Bounds::new(-10.0, 10.0).unwrap()];
/// let nsga2 = Nsga2::builder()
///   .problem(Schaffer)
///   .population_size(20)
///   .evaluator(SequentialEvaluator::new())
///   .selection(BinaryTournament)
///   .crossover(SbxCrossover::new(0.9, 20.0, bounds.clone())?)
///   .mutation(PolynomialMutation::new(1.0, 20.0, bounds)?)
///   .termination(MaxEvaluations(1000))
///   .seed(7)
///   .build();
/// let outcome = nsga2.optimize()?;
/// assert_eq!(outcome.stop, StopReason::Terminated);
/// assert!(outcome.evaluations >= 1000);
/// # Ok::<(), emoa::error::Error>(())
/// ```
#[derive(TypedBuilder)]
pub struct Nsga2<V, P, E, S, C, M, T> {
  /// The problem to solve.
  problem: P,
  /// Number of population members. Must be positive.
  population_size: usize,
  /// Evaluator of the initial population and of each generation's offspring.
  evaluator: E,
  /// Mating selection operator.
  selection: S,
  /// Crossover operator.
  crossover: C,
  /// Mutation operator, applied to every offspring.
  mutation: M,
  /// Termination predicate, checked once per generation.
  termination: T,
  /// Archive receiving every evaluated solution. If set, the archive
  /// contents become the result of the optimization.
  #[builder(default, setter(strip_option))]
  archive: Option<SharedArchive<V>>,
  /// Seed of the random generator. Drawn from the OS if unset.
  #[builder(default, setter(strip_option))]
  seed: Option<u64>,
  /// Observers notified at every generation boundary. They must not block.
  #[builder(default)]
  observers: Vec<Box<dyn Observer<V> + Send>>,
  /// Token to stop the optimization from another thread.
  #[builder(default, setter(strip_option))]
  cancellation: Option<CancellationToken>,
}

impl<V, P, E, S, C, M, T> Nsga2<V, P, E, S, C, M, T>
where
  V: Clone,
  P: Problem<V> + Sync,
  E: Evaluator<V>,
  S: Selection<V>,
  C: Crossover<V>,
  M: Mutation<V>,
  T: Termination<V>,
{
  fn validate(&self) -> Result<(), Error> {
    if self.population_size == 0 {
      return Err(Error::EmptyPopulation);
    }
    if self.problem.number_of_objectives() == 0 {
      return Err(Error::InvalidConfig(
        "problem must have at least one objective".to_owned(),
      ));
    }
    if self.crossover.parents() == 0 || self.crossover.offspring() == 0 {
      return Err(Error::InvalidConfig(format!(
        "crossover must take and produce at least one solution, got {} \
         parents and {} offspring",
        self.crossover.parents(),
        self.crossover.offspring()
      )));
    }
    check_probability("crossover", self.crossover.probability())?;
    check_probability("mutation", self.mutation.probability())?;
    Ok(())
  }

  fn create_population(
    &self,
    rng: &mut StdRng,
  ) -> Result<Vec<Solution<V>>, Error> {
    let objectives = self.problem.number_of_objectives();
    let constraints = self.problem.number_of_constraints();
    (0..self.population_size)
      .map(|_| {
        let solution = self.problem.create_solution(rng);
        let actual = solution.objectives().len();
        if actual != objectives {
          return Err(Error::ObjectiveCountMismatch(objectives, actual));
        }
        let actual = solution.constraints().len();
        if actual != constraints {
          return Err(Error::ConstraintCountMismatch {
            expected: constraints,
            actual,
          });
        }
        Ok(solution)
      })
      .collect()
  }

  /// Selects parents and produces exactly `population.len()` mutated
  /// offspring.
  fn reproduce(
    &self,
    population: &[RankedSolution<V>],
    rng: &mut StdRng,
  ) -> Result<Vec<Solution<V>>, Error> {
    let size = population.len();
    let mut offspring = Vec::with_capacity(size + self.crossover.offspring());
    while offspring.len() < size {
      let parents = (0..self.crossover.parents())
        .map(|_| {
          self
            .selection
            .select(population, rng)
            .map(|ranked| &ranked.solution)
        })
        .collect::<Result<Vec<_>, _>>()?;
      let children = self.crossover.execute(&parents, rng)?;
      if children.len() != self.crossover.offspring() {
        return Err(Error::OffspringCount {
          operator: std::any::type_name::<C>(),
          expected: self.crossover.offspring(),
          actual: children.len(),
        });
      }
      offspring.extend(children);
    }
    offspring.truncate(size);
    for child in &mut offspring {
      self.mutation.mutate(child, rng);
    }
    Ok(offspring)
  }

  fn feed_archive(&self, solutions: &[Solution<V>]) -> Result<(), Error> {
    if let Some(archive) = &self.archive {
      for solution in solutions {
        archive.add(solution.clone())?;
      }
    }
    Ok(())
  }
}

impl<V, P, E, S, C, M, T> Optimizer<V> for Nsga2<V, P, E, S, C, M, T>
where
  V: Clone,
  P: Problem<V> + Sync,
  E: Evaluator<V>,
  S: Selection<V>,
  C: Crossover<V>,
  M: Mutation<V>,
  T: Termination<V>,
{
  fn optimize(mut self) -> Result<Outcome<V>, Error> {
    self.validate()?;
    let started = Instant::now();
    let mut rng = match self.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    info!(
      "NSGA-II started on {} with population of {}",
      self.problem.name(),
      self.population_size
    );

    let mut initial = self.create_population(&mut rng)?;
    self.evaluator.evaluate(&self.problem, &mut initial, 0)?;
    let mut evaluations = initial.len();
    self.feed_archive(&initial)?;
    let mut population = replacement::select(initial, self.population_size)?;
    let mut generation = 0;

    let stop = loop {
      let progress = Progress {
        generation,
        evaluations,
        elapsed: started.elapsed(),
        population: &population,
      };
      for observer in &mut self.observers {
        observer.observe(&progress);
      }
      if self
        .cancellation
        .as_ref()
        .is_some_and(CancellationToken::is_cancelled)
      {
        break StopReason::Cancelled;
      }
      if self.termination.terminate(&progress) {
        break StopReason::Terminated;
      }

      let mut offspring = self.reproduce(&population, &mut rng)?;
      generation += 1;
      self
        .evaluator
        .evaluate(&self.problem, &mut offspring, generation)?;
      evaluations += offspring.len();
      self.feed_archive(&offspring)?;
      population = replacement::replace(population, offspring)?;
      debug!(
        "generation {generation}: {evaluations} evaluations, {} solutions in \
         first front",
        population.iter().filter(|s| s.rank == 0).count()
      );
    };

    let solutions: Vec<Solution<V>> = match &self.archive {
      Some(archive) => archive.solutions(),
      None => population
        .into_iter()
        .filter(|s| s.rank == 0)
        .map(|s| s.solution)
        .collect(),
    };
    info!(
      "NSGA-II {} after {generation} generations and {evaluations} \
       evaluations with {} solutions",
      match stop {
        StopReason::Terminated => "terminated",
        StopReason::Cancelled => "cancelled",
      },
      solutions.len()
    );

    Ok(Outcome {
      solutions,
      evaluations,
      generations: generation,
      stop,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use rand::{Rng, RngCore};

  use super::*;
  use crate::{
    encoding::Bounds,
    error::BoxError,
    evaluation::SequentialEvaluator,
    mutation::PolynomialMutation,
    recombination::SbxCrossover,
    selection::BinaryTournament,
    termination::{MaxEvaluations, MaxGenerations},
  };

  /// Schaffer's problem N.1, optimal for `x` in `[0, 2]`.
  struct Schaffer;

  impl Problem<f64> for Schaffer {
    fn number_of_variables(&self) -> usize {
      1
    }

    fn number_of_objectives(&self) -> usize {
      2
    }

    fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
      Solution::new(vec![rng.gen_range(-10.0..10.0)], 2, 0)
    }

    fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
      let x = solution.variables()[0];
      solution
        .objectives_mut()
        .copy_from_slice(&[x * x, (x - 2.0) * (x - 2.0)]);
      Ok(())
    }
  }

  fn bounds() -> Vec<Bounds<f64>> {
    vec![Bounds {
      lower: -10.0,
      upper: 10.0,
    }]
  }

  fn sbx() -> SbxCrossover {
    SbxCrossover::new(0.9, 20.0, bounds()).unwrap()
  }

  fn polynomial() -> PolynomialMutation {
    PolynomialMutation::new(1.0, 20.0, bounds()).unwrap()
  }

  #[test]
  fn test_nsga2_converges_on_schaffer() {
    let outcome = Nsga2::builder()
      .problem(Schaffer)
      .population_size(40)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxEvaluations(4000))
      .seed(42)
      .build()
      .optimize()
      .unwrap();
    assert_eq!(outcome.stop, StopReason::Terminated);
    assert_eq!(outcome.evaluations, 4000);
    assert_eq!(outcome.generations, 99);
    assert!(!outcome.solutions.is_empty());
    for s in &outcome.solutions {
      let x = s.variables()[0];
      assert!((-0.1..=2.1).contains(&x), "{x} is far from the front");
    }
  }

  #[test]
  fn test_same_seed_same_outcome() {
    let run = || {
      Nsga2::builder()
        .problem(Schaffer)
        .population_size(10)
        .evaluator(SequentialEvaluator::new())
        .selection(BinaryTournament)
        .crossover(sbx())
        .mutation(polynomial())
        .termination(MaxGenerations(5))
        .seed(3)
        .build()
        .optimize()
        .unwrap()
        .solutions
    };
    assert_eq!(run(), run());
  }

  #[test]
  fn test_zero_population_is_rejected() {
    let result = Nsga2::builder()
      .problem(Schaffer)
      .population_size(0)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxGenerations(5))
      .build()
      .optimize();
    assert!(matches!(result, Err(Error::EmptyPopulation)));
  }

  #[test]
  fn test_constraint_count_is_checked_before_evaluation() {
    /// Declares a constraint its solutions don't have room for.
    struct Undersized;

    impl Problem<f64> for Undersized {
      fn number_of_variables(&self) -> usize {
        1
      }

      fn number_of_objectives(&self) -> usize {
        2
      }

      fn number_of_constraints(&self) -> usize {
        1
      }

      fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
        Schaffer.create_solution(rng)
      }

      fn evaluate(&self, _: &mut Solution<f64>) -> Result<(), BoxError> {
        panic!("nothing may be evaluated");
      }
    }

    let result = Nsga2::builder()
      .problem(Undersized)
      .population_size(4)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxGenerations(5))
      .build()
      .optimize();
    assert!(matches!(
      result,
      Err(Error::ConstraintCountMismatch {
        expected: 1,
        actual: 0,
      })
    ));
  }

  #[test]
  fn test_invalid_custom_mutation_is_rejected_before_evaluation() {
    struct Wild;

    impl Mutation<f64> for Wild {
      fn probability(&self) -> f64 {
        1.5
      }

      fn mutate(&self, _: &mut Solution<f64>, _: &mut dyn RngCore) {}
    }

    let result = Nsga2::builder()
      .problem(Schaffer)
      .population_size(4)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(Wild)
      .termination(MaxGenerations(5))
      .build()
      .optimize();
    assert!(matches!(
      result,
      Err(Error::InvalidProbability {
        name: "mutation",
        ..
      })
    ));
  }

  #[test]
  fn test_crossover_breaking_its_contract() {
    /// Declares two offspring but produces one.
    struct Liar;

    impl Crossover<f64> for Liar {
      fn parents(&self) -> usize {
        2
      }

      fn offspring(&self) -> usize {
        2
      }

      fn probability(&self) -> f64 {
        1.0
      }

      fn execute(
        &self,
        parents: &[&Solution<f64>],
        _: &mut dyn RngCore,
      ) -> Result<Vec<Solution<f64>>, Error> {
        Ok(vec![parents[0].derive(parents[0].variables().to_vec())])
      }
    }

    let result = Nsga2::builder()
      .problem(Schaffer)
      .population_size(4)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(Liar)
      .mutation(polynomial())
      .termination(MaxGenerations(5))
      .build()
      .optimize();
    assert!(matches!(
      result,
      Err(Error::OffspringCount {
        expected: 2,
        actual: 1,
        ..
      })
    ));
  }

  #[test]
  fn test_cancelled_before_first_generation() {
    let token = CancellationToken::new();
    token.cancel();
    let outcome = Nsga2::builder()
      .problem(Schaffer)
      .population_size(8)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxGenerations(100))
      .cancellation(token)
      .build()
      .optimize()
      .unwrap();
    assert_eq!(outcome.stop, StopReason::Cancelled);
    assert_eq!(outcome.generations, 0);
    assert_eq!(outcome.evaluations, 8);
  }

  #[test]
  fn test_observers_see_every_generation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let observer: Box<dyn Observer<f64> + Send> =
      Box::new(move |p: &Progress<f64>| {
        assert_eq!(counter.fetch_add(1, Ordering::Relaxed), p.generation);
        assert_eq!(p.population.len(), 6);
      });
    Nsga2::builder()
      .problem(Schaffer)
      .population_size(6)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxGenerations(10))
      .observers(vec![observer])
      .build()
      .optimize()
      .unwrap();
    // generations 0 through 10
    assert_eq!(calls.load(Ordering::Relaxed), 11);
  }

  #[test]
  fn test_archive_becomes_result() {
    let archive = SharedArchive::new(5).unwrap();
    let outcome = Nsga2::builder()
      .problem(Schaffer)
      .population_size(20)
      .evaluator(SequentialEvaluator::new())
      .selection(BinaryTournament)
      .crossover(sbx())
      .mutation(polynomial())
      .termination(MaxGenerations(20))
      .archive(archive.clone())
      .seed(11)
      .build()
      .optimize()
      .unwrap();
    assert_eq!(outcome.solutions.len(), 5);
    assert_eq!(outcome.solutions, archive.solutions());
  }
}
