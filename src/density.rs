//! Crowding distance density estimation.

use crate::solution::{Density, Solution};

/// Computes crowding distances of solutions of a single front.
///
/// `front` holds indices into `solutions`. Returns one density per entry of
/// `front`, in the same order.
///
/// For each objective the front is sorted by that objective. The two boundary
/// solutions receive an infinite distance, every interior one adds the
/// distance between its neighbours normalized by the objective's range. An
/// objective with zero range contributes nothing. Fronts of at most two
/// solutions are all boundary.
pub fn crowding_distances<V, S: AsRef<Solution<V>>>(
  solutions: &[S],
  front: &[usize],
) -> Vec<Density> {
  let mut distances: Vec<Density> = vec![0.0; front.len()];
  if front.len() <= 2 {
    distances.fill(Density::INFINITY);
    return distances;
  }

  let objective =
    |pos: usize, obj: usize| solutions[front[pos]].as_ref().objectives()[obj];
  let objective_count = solutions[front[0]].as_ref().objectives().len();
  // positions into `front`, sorted by current objective
  let mut order: Vec<usize> = (0..front.len()).collect();
  for o_idx in 0..objective_count {
    order.sort_by(|&a, &b| objective(a, o_idx).total_cmp(&objective(b, o_idx)));

    let first = order[0];
    let last = order[order.len() - 1];
    distances[first] = Density::INFINITY;
    distances[last] = Density::INFINITY;

    let range = objective(last, o_idx) - objective(first, o_idx);
    if range == 0.0 || !range.is_finite() {
      continue;
    }
    for w in order.windows(3) {
      let (prev, curr, next) = (w[0], w[1], w[2]);
      distances[curr] +=
        (objective(next, o_idx) - objective(prev, o_idx)) / range;
    }
  }
  distances
}
