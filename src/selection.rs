//! Mating selection operators.

use rand::{seq::index, Rng, RngCore};

use crate::{error::Error, solution::RankedSolution};

/// An operator that picks one parent from the current population per call.
///
/// The population is already ranked, so implementations may use rank and
/// density of each member. Selected parents are passed on to a
/// [`Crossover`](crate::recombination::Crossover).
///
/// Calling `select` on an empty population returns
/// [`Error::EmptySelectionPool`].
///
/// # Examples
/// ```
/// # use emoa::{error::Error, selection::Selection, solution::RankedSolution};
/// # use rand::RngCore;
/// // always picks the first member
/// struct First;
///
/// impl<V> Selection<V> for First {
///   fn select<'a>(
///     &self,
///     population: &'a [RankedSolution<V>],
///     _: &mut dyn RngCore,
///   ) -> Result<&'a RankedSolution<V>, Error> {
///     population.first().ok_or(Error::EmptySelectionPool)
///   }
/// }
/// ```
pub trait Selection<V> {
  /// Returns a reference to the selected member of `population`.
  fn select<'a>(
    &self,
    population: &'a [RankedSolution<V>],
    rng: &mut dyn RngCore,
  ) -> Result<&'a RankedSolution<V>, Error>;
}

/// Picks two distinct members at random and returns the better one by the
/// crowded comparison: lower rank wins, then higher density. A tie is decided
/// by a fair coin.
///
/// A single-member population always yields that member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BinaryTournament;

impl<V> Selection<V> for BinaryTournament {
  fn select<'a>(
    &self,
    population: &'a [RankedSolution<V>],
    rng: &mut dyn RngCore,
  ) -> Result<&'a RankedSolution<V>, Error> {
    match population.len() {
      0 => Err(Error::EmptySelectionPool),
      1 => Ok(&population[0]),
      len => {
        let picked = index::sample(rng, len, 2);
        let a = &population[picked.index(0)];
        let b = &population[picked.index(1)];
        let winner = if a.crowded_better(b) {
          a
        } else if b.crowded_better(a) {
          b
        } else if rng.gen_bool(0.5) {
          a
        } else {
          b
        };
        Ok(winner)
      }
    }
  }
}

/// Picks a member uniformly at random, ignoring rank and density.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RandomSelection;

impl<V> Selection<V> for RandomSelection {
  fn select<'a>(
    &self,
    population: &'a [RankedSolution<V>],
    rng: &mut dyn RngCore,
  ) -> Result<&'a RankedSolution<V>, Error> {
    if population.is_empty() {
      return Err(Error::EmptySelectionPool);
    }
    Ok(&population[rng.gen_range(0..population.len())])
  }
}
