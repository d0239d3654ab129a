//! **emoa** is an evolutionary multi-objective optimization engine. Given a
//! problem that maps a candidate solution to a vector of objective values, it
//! evolves a population toward the Pareto-optimal trade-off surface and
//! returns a bounded, well-spread approximation of it.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! The engine is built from a few small pieces, each living in its own
//! module:
//! - [`Problem`] describes the search space: it creates random
//!   [`Solution`]s and evaluates their objectives and constraints
//! - [`dominance`] compares two solutions, feasible ones always beating
//!   infeasible ones
//! - [`ranking`] sorts a population into dominance fronts and [`density`]
//!   measures how crowded each member of a front is
//! - [`replacement`] uses both to keep the best members of a population
//! - [`archive`] keeps a bounded set of mutually non-dominated solutions
//!   found so far
//! - [`evaluation`] evaluates whole batches of solutions, sequentially or on
//!   a [rayon] worker pool
//!
//! An **optimizer** drives the generational loop:
//! 1. **Select** parents from the ranked population
//! 2. **Recombine** them into offspring and **mutate** each offspring
//! 3. **Evaluate** offspring against the problem
//! 4. **Replace** the population with the best of parents and offspring
//! 5. **Terminate** the loop once a certain condition is met
//!
//! # Optimizers
//!
//! **Optimizer** is represented in this crate with the [`Optimizer`] trait.
//! It consumes a problem, an evaluator and four **operators** supplied by the
//! user, and runs the loop until its termination predicate holds or it is
//! cancelled.
//!
//! As for now, this crate features [NSGA-II], optionally backed by an archive.
//!
//! # Operators
//!
//! | **Operator**  | Trait            | Implementations                                                   |
//! |:--------------|:-----------------|:------------------------------------------------------------------|
//! | Selection     | [`Selection`]    | [`BinaryTournament`], [`RandomSelection`]                         |
//! | Crossover     | [`Crossover`]    | [`SbxCrossover`], [`SinglePointCrossover`], [`IndexListCrossover`] |
//! | Mutation      | [`Mutation`]     | [`PolynomialMutation`], [`BitFlipMutation`], [`IndexListMutation`] |
//! | Termination   | [`Termination`]  | [`MaxEvaluations`], [`MaxGenerations`], [`MaxDuration`]            |
//!
//! [`Mutation`] and [`Termination`] are also implemented for closures, and
//! so is [`Observer`], which receives a snapshot of every generation.
//!
//! Every operator takes the random generator as `&mut dyn RngCore`. The
//! optimizer owns the only generator, so a seeded run is reproducible as long
//! as the problem's evaluation is deterministic.
//!
//! # Parallelization
//!
//! Only evaluation runs in parallel. [`ParallelEvaluator`] evaluates every
//! offspring of a generation on its own thread pool and returns once the
//! whole batch is done; everything else runs on the optimizer's thread.
//!
//! For cheap problems, the overhead introduced by parallelization usually
//! only decreases performance, but when you need it, *you need it*.
//! Benchmark, if in doubt.
//!
//! # Example
//!
//! Here's a solution for the textbook *Schaffer's Problem No.1* with the
//! [NSGA-II] optimizer.
//! ```
//! use emoa::prelude::*;
//! use rand::{Rng, RngCore};
//!
//! // objective functions `f1(x) = x^2` and `f2(x) = (x - 2)^2`
//! struct Schaffer;
//!
//! impl Problem<f64> for Schaffer {
//!   fn number_of_variables(&self) -> usize {
//!     1
//!   }
//!
//!   fn number_of_objectives(&self) -> usize {
//!     2
//!   }
//!
//!   fn create_solution(&self, rng: &mut dyn RngCore) -> Solution<f64> {
//!     Solution::new(vec![rng.gen_range(-100.0..100.0)], 2, 0)
//!   }
//!
//!   fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), BoxError> {
//!     let x = solution.variables()[0];
//!     solution
//!       .objectives_mut()
//!       .copy_from_slice(&[x.powi(2), (x - 2.0).powi(2)]);
//!     Ok(())
//!   }
//! }
//!
//! let bounds = vec![Bounds::new(-100.0, 100.0).unwrap()];
//! // a convenient builder with compile time verification from `typed-builder`
//! let nsga2 = Nsga2::builder()
//!   .problem(Schaffer)
//!   .population_size(50)
//!   // evaluate on all available cores
//!   .evaluator(ParallelEvaluator::new(0)?)
//!   .selection(BinaryTournament)
//!   .crossover(SbxCrossover::new(0.9, 20.0, bounds.clone())?)
//!   .mutation(PolynomialMutation::new(1.0, 20.0, bounds)?)
//!   .termination(MaxEvaluations(5_000))
//!   .build();
//! // upon termination optimizer returns the best solutions it has found
//! let outcome = nsga2.optimize()?;
//! assert!(!outcome.solutions.is_empty());
//! # Ok::<(), emoa::error::Error>(())
//! ```
//!
//! # Common pitfalls
//!
//! - Closures are great and handy to use until they aren't. If the compiler
//!   can't infer a closure's argument types, annotate them (e.g.
//!   `|p: &Progress<f64>| ...`) or implement the trait for your own type.
//! - Evaluation errors abort the optimization by default. Use
//!   [`FailurePolicy::Penalize`] to assign worst objective values to failed
//!   solutions instead.
//!
//! [`Problem`]: crate::problem::Problem
//! [`Solution`]: crate::solution::Solution
//! [`Optimizer`]: crate::optimizer::Optimizer
//! [`Selection`]: crate::selection::Selection
//! [`BinaryTournament`]: crate::selection::BinaryTournament
//! [`RandomSelection`]: crate::selection::RandomSelection
//! [`Crossover`]: crate::recombination::Crossover
//! [`SbxCrossover`]: crate::recombination::SbxCrossover
//! [`SinglePointCrossover`]: crate::recombination::SinglePointCrossover
//! [`IndexListCrossover`]: crate::recombination::IndexListCrossover
//! [`Mutation`]: crate::mutation::Mutation
//! [`PolynomialMutation`]: crate::mutation::PolynomialMutation
//! [`BitFlipMutation`]: crate::mutation::BitFlipMutation
//! [`IndexListMutation`]: crate::mutation::IndexListMutation
//! [`Termination`]: crate::termination::Termination
//! [`MaxEvaluations`]: crate::termination::MaxEvaluations
//! [`MaxGenerations`]: crate::termination::MaxGenerations
//! [`MaxDuration`]: crate::termination::MaxDuration
//! [`Observer`]: crate::observer::Observer
//! [`ParallelEvaluator`]: crate::evaluation::ParallelEvaluator
//! [`FailurePolicy::Penalize`]: crate::evaluation::FailurePolicy::Penalize
//! [NSGA-II]: https://sci2s.ugr.es/sites/default/files/files/Teaching/OtherPostGraduateCourses/Metaheuristicas/Deb_NSGAII.pdf

#![warn(missing_docs)]

pub mod archive;
pub mod density;
pub mod dominance;
pub mod encoding;
pub mod error;
pub mod evaluation;
pub mod mutation;
pub mod observer;
pub mod optimizer;
pub mod problem;
pub mod quality;
pub mod ranking;
pub mod recombination;
pub mod replacement;
pub mod score;
pub mod selection;
pub mod solution;
pub mod termination;

/// Re-exports of the types needed to set up and run an optimization.
pub mod prelude {
  pub use crate::{
    archive::{CrowdingDistanceArchive, SharedArchive},
    encoding::{Bounds, Gene},
    error::{BoxError, Error},
    evaluation::{
      Evaluator,
      FailurePolicy,
      ParallelEvaluator,
      SequentialEvaluator,
    },
    mutation::{
      BitFlipMutation,
      IndexListMutation,
      Mutation,
      PolynomialMutation,
    },
    observer::{CancellationToken, ChannelObserver, Observer, ProgressReport},
    optimizer::{nsga::Nsga2, Optimizer, Outcome, StopReason},
    problem::Problem,
    recombination::{
      Crossover,
      IndexListCrossover,
      SbxCrossover,
      SinglePointCrossover,
    },
    selection::{BinaryTournament, RandomSelection, Selection},
    solution::{RankedSolution, Solution},
    termination::{
      MaxDuration,
      MaxEvaluations,
      MaxGenerations,
      Progress,
      Termination,
    },
  };
}
