//! Progress observers and cooperative cancellation.

use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{SyncSender, TrySendError},
    Arc,
  },
  time::Duration,
};

use log::trace;

use crate::{score::Score, termination::Progress};

/// Receives a [`Progress`] snapshot at every generation boundary.
///
/// Observers run on the optimizer's thread between generations and must not
/// block for long.
///
/// # Examples
/// ```
/// # use emoa::{observer::Observer, termination::Progress};
/// let o = |p: &Progress<f64>| println!("generation {}", p.generation);
/// ```
pub trait Observer<V> {
  /// Called once per generation, before termination is checked.
  fn observe(&mut self, progress: &Progress<V>);
}

impl<V, F> Observer<V> for F
where
  F: FnMut(&Progress<V>),
{
  fn observe(&mut self, progress: &Progress<V>) {
    self(progress)
  }
}

/// An owned summary of a [`Progress`], suitable for sending to another thread.
#[derive(Clone, PartialEq, Debug)]
pub struct ProgressReport {
  /// Number of completed generations.
  pub generation: usize,
  /// Total number of problem evaluations so far.
  pub evaluations: usize,
  /// Time elapsed since the optimization started.
  pub elapsed: Duration,
  /// Objective vectors of the current non-dominated front.
  pub front: Vec<Vec<Score>>,
}

impl<V> From<&Progress<'_, V>> for ProgressReport {
  fn from(progress: &Progress<'_, V>) -> Self {
    Self {
      generation: progress.generation,
      evaluations: progress.evaluations,
      elapsed: progress.elapsed,
      front: progress
        .population
        .iter()
        .filter(|s| s.rank == 0)
        .map(|s| s.solution.objectives().to_vec())
        .collect(),
    }
  }
}

/// Forwards a [`ProgressReport`] of every generation over a bounded channel.
///
/// Never blocks: if the channel is full the report is dropped, and once the
/// receiver hangs up the observer stops sending.
///
/// # Examples
/// ```
/// # use std::sync::mpsc;
/// # use emoa::observer::ChannelObserver;
/// let (tx, rx) = mpsc::sync_channel(16);
/// let observer = ChannelObserver::new(tx);
/// ```
#[derive(Debug)]
pub struct ChannelObserver {
  sender: Option<SyncSender<ProgressReport>>,
  dropped: usize,
}

impl ChannelObserver {
  /// Creates an observer sending to `sender`.
  pub fn new(sender: SyncSender<ProgressReport>) -> Self {
    Self {
      sender: Some(sender),
      dropped: 0,
    }
  }

  /// Returns the number of reports dropped because the channel was full.
  pub fn dropped(&self) -> usize {
    self.dropped
  }
}

impl<V> Observer<V> for ChannelObserver {
  fn observe(&mut self, progress: &Progress<V>) {
    let Some(sender) = &self.sender else {
      return;
    };
    match sender.try_send(progress.into()) {
      Ok(()) => {}
      Err(TrySendError::Full(_)) => {
        self.dropped += 1;
        trace!(
          "progress report of generation {} dropped, channel is full",
          progress.generation
        );
      }
      Err(TrySendError::Disconnected(_)) => self.sender = None,
    }
  }
}

/// A flag for stopping an optimization from another thread.
///
/// The optimizer polls the token at generation boundaries. An evaluation
/// batch in flight is always finished first. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
  cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
  /// Creates a token that is not cancelled.
  pub fn new() -> Self {
    Self::default()
  }

  /// Requests cancellation.
  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
  }

  /// Returns `true` if cancellation was requested.
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }
}
