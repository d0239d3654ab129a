//! Quality indicators of approximation fronts.

use crate::{error::Error, score::Score};

/// Returns the dominance distance from reference point `reference` to
/// `point`: the Euclidean norm of the amounts by which `point` is worse than
/// `reference` in each objective.
///
/// It is zero if `point` weakly dominates `reference`.
pub fn dominance_distance(
  reference: &[Score],
  point: &[Score],
) -> Result<Score, Error> {
  if reference.len() != point.len() {
    return Err(Error::ObjectiveCountMismatch(reference.len(), point.len()));
  }
  Ok(
    point
      .iter()
      .zip(reference)
      .map(|(p, r)| (p - r).max(0.0).powi(2))
      .sum::<Score>()
      .sqrt(),
  )
}

/// Computes the inverted generational distance plus (IGD+) of `front` with
/// respect to `reference`. Lower is better, and `0` means `front` weakly
/// dominates every reference point.
///
/// For each reference point, takes the dominance distance to the closest
/// point of `front`, then averages over reference points.
///
/// Returns infinity for an empty `front`, and an error if `reference` is empty
/// or objective vectors have different lengths.
///
/// # Examples
/// ```
/// # use emoa::quality::igd_plus;
/// let reference = [[0.0, 1.0], [1.0, 0.0]];
/// assert_eq!(igd_plus(&[[0.0, 1.0], [1.0, 0.0]], &reference).unwrap(), 0.0);
/// assert_eq!(igd_plus(&[[1.0, 1.0]], &reference).unwrap(), 1.0);
/// ```
pub fn igd_plus<F, R>(front: &[F], reference: &[R]) -> Result<Score, Error>
where
  F: AsRef<[Score]>,
  R: AsRef<[Score]>,
{
  if reference.is_empty() {
    return Err(Error::InvalidConfig(
      "IGD+ requires a non-empty reference front".to_owned(),
    ));
  }
  let mut sum = 0.0;
  for r in reference {
    let mut closest = Score::INFINITY;
    for p in front {
      closest = closest.min(dominance_distance(r.as_ref(), p.as_ref())?);
    }
    sum += closest;
  }
  Ok(sum / reference.len() as Score)
}
