use crate::job::{ActiveEntry, JobId, PendingRegistration};

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::Instant;

use tokio::sync::oneshot;

/// What a single admission attempt decided to do.
pub(crate) enum Admission {
  /// This job moved to the active set and onto the launch queue.
  Started(JobId),
  /// The queue is idle; these observers must be resolved.
  Idle(Vec<oneshot::Sender<()>>),
  /// Paused, at capacity, or still waiting on active jobs.
  Nothing,
}

/// All mutable scheduler bookkeeping. Only ever touched under the scheduler's lock.
///
/// Admitted jobs are not started by the attempt that admitted them. They go
/// onto `launching`, which exactly one thread at a time drains in admission
/// order, so factories are invoked in the order jobs left the waiting list.
pub(crate) struct SchedulerState<T, E> {
  capacity: usize,
  paused: bool,
  next_job_id: JobId,
  waiting: VecDeque<PendingRegistration<T, E>>,
  active: HashMap<JobId, ActiveEntry>,
  launching: VecDeque<PendingRegistration<T, E>>,
  launcher_busy: bool,
  observers: Vec<oneshot::Sender<()>>,
}

impl<T, E> fmt::Debug for SchedulerState<T, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SchedulerState")
      .field("capacity", &self.capacity)
      .field("paused", &self.paused)
      .field("waiting", &self.waiting.len())
      .field("active", &self.active.len())
      .field("launching", &self.launching.len())
      .field("observers", &self.observers.len())
      .finish_non_exhaustive()
  }
}

impl<T, E> SchedulerState<T, E> {
  pub(crate) fn new(capacity: usize, paused: bool) -> Self {
    Self {
      capacity,
      paused,
      next_job_id: 0,
      waiting: VecDeque::new(),
      active: HashMap::new(),
      launching: VecDeque::new(),
      launcher_busy: false,
      observers: Vec::new(),
    }
  }

  pub(crate) fn allocate_job_id(&mut self) -> JobId {
    let id = self.next_job_id;
    self.next_job_id = self.next_job_id.wrapping_add(1);
    id
  }

  pub(crate) fn enqueue(&mut self, registration: PendingRegistration<T, E>) {
    self.waiting.push_back(registration);
  }

  pub(crate) fn set_paused(&mut self, paused: bool) {
    self.paused = paused;
  }

  pub(crate) fn is_paused(&self) -> bool {
    self.paused
  }

  pub(crate) fn capacity(&self) -> usize {
    self.capacity
  }

  pub(crate) fn pending_count(&self) -> usize {
    self.waiting.len()
  }

  pub(crate) fn active_count(&self) -> usize {
    self.active.len()
  }

  pub(crate) fn is_idle(&self) -> bool {
    self.waiting.is_empty() && self.active.is_empty()
  }

  /// Registers a drain observer, or returns `None` if the queue is already idle.
  pub(crate) fn register_observer(&mut self) -> Option<oneshot::Receiver<()>> {
    if self.is_idle() {
      return None;
    }
    let (tx, rx) = oneshot::channel();
    self.observers.push(tx);
    Some(rx)
  }

  /// Removes a settled job from the active set. Returns the entry if it was tracked.
  pub(crate) fn complete(&mut self, job_id: JobId) -> Option<ActiveEntry> {
    self.active.remove(&job_id)
  }

  /// One admission attempt. Admits at most one job.
  pub(crate) fn next_admission(&mut self) -> Admission {
    if self.paused || self.active.len() >= self.capacity {
      return Admission::Nothing;
    }
    match self.waiting.pop_front() {
      Some(registration) => {
        let job_id = registration.job_id;
        self.active.insert(
          job_id,
          ActiveEntry {
            started_at: Instant::now(),
          },
        );
        self.launching.push_back(registration);
        Admission::Started(job_id)
      }
      None if self.active.is_empty() => Admission::Idle(std::mem::take(&mut self.observers)),
      None => Admission::Nothing,
    }
  }

  /// Claims the launcher role. Returns `false` if another caller already holds it.
  pub(crate) fn claim_launcher(&mut self) -> bool {
    if self.launcher_busy {
      return false;
    }
    self.launcher_busy = true;
    true
  }

  /// Pops the next admitted job to launch. Releases the launcher role when
  /// nothing is left, in the same critical section as the empty check.
  pub(crate) fn next_launch(&mut self) -> Option<PendingRegistration<T, E>> {
    let next = self.launching.pop_front();
    if next.is_none() {
      self.launcher_busy = false;
    }
    next
  }
}
