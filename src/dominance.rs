//! Constrained dominance comparison of solutions.

use std::cmp::Ordering;

use crate::{error::Error, score::ParetoDominance, solution::Solution};

/// Compares two solutions by constrained Pareto dominance.
///
/// Returns `Less` if `a` dominates `b`, `Greater` if `b` dominates `a`,
/// otherwise `Equal`.
///
/// Constraint violation is compared first: a feasible solution dominates an
/// infeasible one, and of two infeasible solutions the one with the smaller
/// aggregated violation dominates. Solutions with equal violation are compared
/// by Pareto dominance of their objectives.
///
/// Returns an error if objective vectors have different lengths.
pub fn compare<V>(a: &Solution<V>, b: &Solution<V>) -> Result<Ordering, Error> {
  let (a_obj, b_obj) = (a.objectives(), b.objectives());
  if a_obj.len() != b_obj.len() {
    return Err(Error::ObjectiveCountMismatch(a_obj.len(), b_obj.len()));
  }
  let (a_cv, b_cv) = (a.constraint_violation(), b.constraint_violation());
  Ok(match a_cv.partial_cmp(&b_cv) {
    Some(Ordering::Equal) | None => a_obj.dominance(b_obj),
    Some(ord) => ord,
  })
}

/// Returns `true` if `a` dominates `b`.
pub fn dominates<V>(a: &Solution<V>, b: &Solution<V>) -> Result<bool, Error> {
  compare(a, b).map(|ord| ord == Ordering::Less)
}
