//! Elitist environmental selection by ranking and crowding distance.

use log::trace;

use crate::{
  density::crowding_distances,
  error::Error,
  ranking::Ranking,
  solution::{Density, RankedSolution, Solution},
};

/// Ranks `solutions` and assigns crowding distances within each front,
/// keeping at most `size` of them.
///
/// Fronts are taken whole in rank order while they fit. The first front that
/// doesn't fit is truncated to its most isolated members, boundary solutions
/// first. The result is ordered by rank, then by decreasing density.
///
/// Returns an error if objective vectors have different lengths.
pub fn select<V>(
  solutions: Vec<Solution<V>>,
  size: usize,
) -> Result<Vec<RankedSolution<V>>, Error> {
  let ranking = Ranking::compute(&solutions)?;
  // (index, rank, density) of each survivor
  let mut survivors: Vec<(usize, usize, Density)> =
    Vec::with_capacity(size.min(solutions.len()));
  for (rank, front) in ranking.fronts().iter().enumerate() {
    let remaining = size - survivors.len();
    if remaining == 0 {
      break;
    }
    let distances = crowding_distances(&solutions, front);
    let mut members: Vec<(usize, usize, Density)> = front
      .iter()
      .zip(distances)
      .map(|(&idx, d)| (idx, rank, d))
      .collect();
    members.sort_by(|a, b| b.2.total_cmp(&a.2));
    if members.len() > remaining {
      trace!(
        "truncating front {rank} from {} to {remaining} solutions",
        members.len()
      );
      members.truncate(remaining);
    }
    survivors.append(&mut members);
  }

  let mut slots: Vec<Option<Solution<V>>> =
    solutions.into_iter().map(Some).collect();
  let selected: Vec<RankedSolution<V>> = survivors
    .into_iter()
    .filter_map(|(idx, rank, density)| {
      slots[idx]
        .take()
        .map(|solution| RankedSolution::new(solution, rank, density))
    })
    .collect();

  debug_assert!(
    selected.len() <= size,
    "selection must not exceed requested size"
  );

  Ok(selected)
}

/// Produces the next generation of `population.len()` solutions from the
/// current population and its offspring.
///
/// Merges both into one pool and keeps the best solutions by [`select`], so
/// the next generation is never worse in Pareto terms than either parent
/// population.
pub fn replace<V>(
  population: Vec<RankedSolution<V>>,
  offspring: Vec<Solution<V>>,
) -> Result<Vec<RankedSolution<V>>, Error> {
  let size = population.len();
  let mut pool: Vec<Solution<V>> = population
    .into_iter()
    .map(|ranked| ranked.solution)
    .collect();
  pool.extend(offspring);
  select(pool, size)
}
