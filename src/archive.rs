//! Bounded archives of mutually non-dominated solutions.

use std::{
  cmp::Ordering,
  sync::{Arc, Mutex, PoisonError},
};

use itertools::Itertools;
use log::trace;

use crate::{
  density::crowding_distances,
  dominance,
  error::Error,
  solution::Solution,
};

/// A bounded archive of mutually non-dominated solutions.
///
/// No stored solution dominates another, no two stored solutions share the
/// same objective vector, and the archive never holds more than `capacity`
/// solutions. When an insertion overflows the archive, the solution with the
/// lowest crowding distance over the whole archive is evicted.
#[derive(Clone, Debug)]
pub struct CrowdingDistanceArchive<V> {
  solutions: Vec<Solution<V>>,
  capacity: usize,
}

impl<V> CrowdingDistanceArchive<V> {
  /// Creates an empty archive. Returns an error if `capacity` is zero.
  pub fn new(capacity: usize) -> Result<Self, Error> {
    if capacity == 0 {
      return Err(Error::ZeroCapacity);
    }
    Ok(Self {
      solutions: Vec::with_capacity(capacity + 1),
      capacity,
    })
  }

  /// Offers `candidate` to the archive, returning `true` if it was kept.
  ///
  /// The candidate is rejected if a stored solution dominates it or has the
  /// same objective vector. Otherwise every stored solution it dominates is
  /// removed and the candidate is inserted. If the archive now overflows,
  /// the least crowded solution is evicted, which may be the candidate itself.
  ///
  /// Returns an error if the candidate has a different number of objectives
  /// than stored solutions. The archive is left unchanged in that case.
  pub fn add(&mut self, candidate: Solution<V>) -> Result<bool, Error> {
    let mut dominated = Vec::new();
    for (idx, stored) in self.solutions.iter().enumerate() {
      match dominance::compare(&candidate, stored)? {
        Ordering::Greater => return Ok(false),
        Ordering::Less => dominated.push(idx),
        Ordering::Equal if stored.objectives() == candidate.objectives() => {
          return Ok(false);
        }
        Ordering::Equal => {}
      }
    }

    let mut idx = 0;
    self.solutions.retain(|_| {
      let keep = dominated.binary_search(&idx).is_err();
      idx += 1;
      keep
    });
    self.solutions.push(candidate);
    let mut candidate_idx = Some(self.solutions.len() - 1);

    while self.solutions.len() > self.capacity {
      let all = (0..self.solutions.len()).collect::<Vec<_>>();
      let distances = crowding_distances(&self.solutions, &all);
      let Some(evicted) =
        distances.iter().position_min_by(|a, b| a.total_cmp(b))
      else {
        break;
      };
      trace!(
        "evicting solution {evicted} with crowding distance {}",
        distances[evicted]
      );
      self.solutions.remove(evicted);
      candidate_idx = match candidate_idx {
        Some(c) if c == evicted => None,
        Some(c) if c > evicted => Some(c - 1),
        c => c,
      };
    }

    debug_assert!(
      self.solutions.len() <= self.capacity,
      "archive must not exceed its capacity"
    );

    Ok(candidate_idx.is_some())
  }

  /// Returns stored solutions.
  pub fn solutions(&self) -> &[Solution<V>] {
    &self.solutions
  }

  /// Moves stored solutions out of the archive.
  pub fn into_solutions(self) -> Vec<Solution<V>> {
    self.solutions
  }

  /// Returns the number of stored solutions.
  pub fn len(&self) -> usize {
    self.solutions.len()
  }

  /// Returns `true` if the archive is empty.
  pub fn is_empty(&self) -> bool {
    self.solutions.is_empty()
  }

  /// Returns the maximum number of stored solutions.
  pub fn capacity(&self) -> usize {
    self.capacity
  }
}

/// A [`CrowdingDistanceArchive`] that can be fed from several threads or
/// several optimizers at once.
///
/// Each [`add`](SharedArchive::add) call holds a single lock for the whole
/// check-and-insert sequence. Clones share the same archive.
#[derive(Debug)]
pub struct SharedArchive<V> {
  inner: Arc<Mutex<CrowdingDistanceArchive<V>>>,
}

impl<V> Clone for SharedArchive<V> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<V> SharedArchive<V> {
  /// Creates an empty shared archive. Returns an error if `capacity` is zero.
  pub fn new(capacity: usize) -> Result<Self, Error> {
    Ok(CrowdingDistanceArchive::new(capacity)?.into())
  }

  /// Offers `candidate` to the archive, returning `true` if it was kept.
  /// See [`CrowdingDistanceArchive::add`].
  pub fn add(&self, candidate: Solution<V>) -> Result<bool, Error> {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .add(candidate)
  }

  /// Returns the number of stored solutions.
  pub fn len(&self) -> usize {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Returns `true` if the archive is empty.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the maximum number of stored solutions.
  pub fn capacity(&self) -> usize {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .capacity()
  }
}

impl<V: Clone> SharedArchive<V> {
  /// Returns a snapshot of stored solutions.
  pub fn solutions(&self) -> Vec<Solution<V>> {
    self
      .inner
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .solutions()
      .to_vec()
  }
}

impl<V> From<CrowdingDistanceArchive<V>> for SharedArchive<V> {
  fn from(archive: CrowdingDistanceArchive<V>) -> Self {
    Self {
      inner: Arc::new(Mutex::new(archive)),
    }
  }
}
