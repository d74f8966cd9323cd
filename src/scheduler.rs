use crate::config::SchedulerConfig;
use crate::error::{JobError, SchedulerError};
use crate::handle::{IdleWaiter, JobHandle};
use crate::job::{JobFactory, JobFuture, JobId, PendingRegistration, ResultSender};
use crate::state::{Admission, SchedulerState};

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle as TokioHandle;
use tokio::sync::oneshot;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};

struct SchedulerInner<T, E> {
  name: Arc<String>,
  tokio_handle: TokioHandle,
  state: Mutex<SchedulerState<T, E>>,
}

/// Runs at most `capacity` jobs at once and queues the rest in submission order.
///
/// Every trigger (a submission, [`start`](Self::start), or a job settling)
/// performs exactly one admission attempt. An attempt either admits the job
/// at the head of the waiting list, releases drain observers when nothing is
/// waiting or running, or does nothing. Each attempt runs under one lock.
/// Admitted jobs are started by a single launcher in admission order, and no
/// job code runs while the lock is held, so factories and job futures may
/// call back into the scheduler.
///
/// Cloning yields another handle to the same queue. Separately constructed
/// schedulers share no state.
pub struct Scheduler<T, E> {
  inner: Arc<SchedulerInner<T, E>>,
}

impl<T, E> Clone for Scheduler<T, E> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<T, E> fmt::Debug for Scheduler<T, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scheduler")
      .field("name", &self.inner.name)
      .field("state", &*self.inner.state.lock())
      .finish_non_exhaustive()
  }
}

impl<T: Send + 'static, E: Send + 'static> Scheduler<T, E> {
  /// Creates a running scheduler whose jobs are spawned on `tokio_handle`.
  ///
  /// # Panics
  /// Panics if `capacity` is zero. Use [`with_config`](Self::with_config) to
  /// get an error instead.
  pub fn new(capacity: usize, tokio_handle: TokioHandle, name: &str) -> Self {
    assert!(capacity > 0, "Scheduler capacity must be at least 1, got {}", capacity);
    Self::build(SchedulerConfig::new(capacity).name(name), tokio_handle)
  }

  /// Creates a scheduler from a validated configuration.
  ///
  /// # Errors
  /// Returns `SchedulerError::InvalidCapacity` if `config.capacity` is zero.
  pub fn with_config(config: SchedulerConfig, tokio_handle: TokioHandle) -> Result<Self, SchedulerError> {
    config.validate()?;
    Ok(Self::build(config, tokio_handle))
  }

  fn build(config: SchedulerConfig, tokio_handle: TokioHandle) -> Self {
    info!(
      scheduler = %config.name,
      capacity = config.capacity,
      start_paused = config.start_paused,
      "Scheduler created."
    );
    Self {
      inner: Arc::new(SchedulerInner {
        name: Arc::new(config.name),
        tokio_handle,
        state: Mutex::new(SchedulerState::new(config.capacity, config.start_paused)),
      }),
    }
  }

  pub fn name(&self) -> &str {
    &self.inner.name
  }

  pub fn capacity(&self) -> usize {
    self.inner.state.lock().capacity()
  }

  /// Queues `job` and makes one admission attempt.
  ///
  /// The factory is invoked only when the job is admitted, on whichever
  /// thread performs that admission attempt. The returned handle settles with
  /// exactly the value or failure reason the job's future produced; a failing
  /// job has no effect on any other job or on drain observers.
  pub fn submit<F, Fut>(&self, job: F) -> JobHandle<T, E>
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    let factory: JobFactory<T, E> = Box::new(move || -> JobFuture<T, E> { Box::pin(job()) });
    let (result_sender, result_receiver) = oneshot::channel();

    let job_id = {
      let mut state = self.inner.state.lock();
      let job_id = state.allocate_job_id();
      state.enqueue(PendingRegistration {
        job_id,
        factory,
        result_sender,
      });
      trace!(scheduler = %self.inner.name, %job_id, pending = state.pending_count(), "Job queued.");
      job_id
    };

    self.inner.admit_next();

    JobHandle {
      job_id,
      result_receiver,
    }
  }

  /// Submits every job in order. Results are not observed; use [`submit`](Self::submit)
  /// when the outcome matters.
  pub fn submit_all<I, F, Fut>(&self, jobs: I) -> &Self
  where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
  {
    for job in jobs {
      let _ = self.submit(job);
    }
    self
  }

  /// Resumes admission and makes one admission attempt.
  pub fn start(&self) {
    self.inner.state.lock().set_paused(false);
    debug!(scheduler = %self.inner.name, "Scheduler started.");
    self.inner.admit_next();
  }

  /// Stops admitting new jobs. Jobs that are already running are unaffected.
  pub fn pause(&self) {
    self.inner.state.lock().set_paused(true);
    debug!(scheduler = %self.inner.name, "Scheduler paused.");
  }

  pub fn is_paused(&self) -> bool {
    self.inner.state.lock().is_paused()
  }

  /// Number of jobs in the waiting list. Running jobs are not counted.
  pub fn pending_count(&self) -> usize {
    self.inner.state.lock().pending_count()
  }

  /// Number of jobs that have been started and have not yet settled.
  pub fn active_count(&self) -> usize {
    self.inner.state.lock().active_count()
  }

  pub fn is_idle(&self) -> bool {
    self.inner.state.lock().is_idle()
  }

  /// Returns a future that resolves once no job is waiting or running.
  ///
  /// If the queue is idle right now the future is already resolved, whether
  /// or not the scheduler is paused. Otherwise it resolves at the first
  /// admission attempt that finds the queue drained. A paused scheduler makes
  /// no attempts, so its observers wait for [`start`](Self::start). It fails
  /// only with `SchedulerError::SchedulerDropped`, when the scheduler is
  /// dropped while work is still queued.
  pub fn await_idle(&self) -> IdleWaiter {
    let registered = self.inner.state.lock().register_observer();
    match registered {
      Some(receiver) => IdleWaiter::pending(receiver),
      None => IdleWaiter::ready(),
    }
  }
}

impl<T: Send + 'static, E: Send + 'static> SchedulerInner<T, E> {
  /// One admission attempt, then launches whatever has been admitted.
  fn admit_next(self: &Arc<Self>) {
    self.attempt_admission();
    self.drain_launches();
  }

  fn attempt_admission(&self) {
    let admission = self.state.lock().next_admission();
    match admission {
      Admission::Started(job_id) => {
        trace!(scheduler = %self.name, %job_id, "Job admitted.");
      }
      Admission::Idle(observers) => {
        if !observers.is_empty() {
          debug!(scheduler = %self.name, observers = observers.len(), "Queue idle. Releasing drain observers.");
        }
        for observer in observers {
          let _ = observer.send(());
        }
      }
      Admission::Nothing => {
        trace!(scheduler = %self.name, "Admission attempt started nothing.");
      }
    }
  }

  /// Starts admitted jobs in admission order. Only one caller drains at a
  /// time; anyone else returns immediately and the current launcher picks up
  /// what they admitted.
  fn drain_launches(self: &Arc<Self>) {
    if !self.state.lock().claim_launcher() {
      return;
    }
    loop {
      let next = self.state.lock().next_launch();
      match next {
        Some(registration) => self.launch(registration),
        None => break,
      }
    }
  }

  fn launch(self: &Arc<Self>, registration: PendingRegistration<T, E>) {
    let PendingRegistration {
      job_id,
      factory,
      result_sender,
    } = registration;
    debug!(scheduler = %self.name, %job_id, "Starting job.");

    let job_future = match panic::catch_unwind(AssertUnwindSafe(factory)) {
      Ok(job_future) => job_future,
      Err(_panic_payload) => {
        error!(scheduler = %self.name, %job_id, "Job factory panicked.");
        // The launcher loop picks up whatever this admits.
        self.finish(job_id, result_sender, Err(JobError::Panicked));
        return;
      }
    };

    let inner = Arc::clone(self);
    let span = info_span!("scheduled_job", scheduler = %self.name, %job_id);
    self.tokio_handle.spawn(
      async move {
        let outcome = match AssertUnwindSafe(job_future).catch_unwind().await {
          Ok(Ok(value)) => Ok(value),
          Ok(Err(reason)) => Err(JobError::Failed(reason)),
          Err(_panic_payload) => {
            error!(scheduler = %inner.name, %job_id, "Job panicked during execution.");
            Err(JobError::Panicked)
          }
        };
        inner.finish(job_id, result_sender, outcome);
        inner.drain_launches();
      }
      .instrument(span),
    );
  }

  /// Hands the outcome to the caller, frees the slot, then makes one admission attempt.
  fn finish(&self, job_id: JobId, result_sender: ResultSender<T, E>, outcome: Result<T, JobError<E>>) {
    if result_sender.send(outcome).is_err() {
      trace!(scheduler = %self.name, %job_id, "Job handle was dropped; outcome discarded.");
    }

    let entry = self.state.lock().complete(job_id);
    match entry {
      Some(entry) => {
        debug!(
          scheduler = %self.name,
          %job_id,
          elapsed_ms = entry.started_at.elapsed().as_millis() as u64,
          "Job settled."
        );
      }
      None => {
        warn!(scheduler = %self.name, %job_id, "Settled job was not in the active set.");
      }
    }

    self.attempt_admission();
  }
}
