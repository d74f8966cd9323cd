use crate::error::{JobError, SchedulerError};
use crate::job::JobId;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// A handle to a job submitted to a [`Scheduler`](crate::Scheduler).
///
/// Dropping the handle does not stop the job; its result is simply discarded.
#[derive(Debug)]
pub struct JobHandle<T, E> {
  pub(crate) job_id: JobId,
  pub(crate) result_receiver: oneshot::Receiver<Result<T, JobError<E>>>,
}

impl<T, E> JobHandle<T, E> {
  /// Returns the ID this job was given at submission.
  pub fn id(&self) -> JobId {
    self.job_id
  }

  /// Awaits the job's settlement and returns exactly what its future produced.
  ///
  /// # Errors
  /// Returns `JobError::Failed` with the job's own reason if the job failed.
  /// Returns `JobError::Panicked` if the job panicked while starting or running.
  /// Returns `JobError::Abandoned` if the scheduler was dropped before the job started.
  pub async fn await_result(self) -> Result<T, JobError<E>> {
    match self.result_receiver.await {
      Ok(outcome) => outcome,
      Err(_) => {
        tracing::debug!(job_id = %self.job_id, "Result channel closed before the job settled.");
        Err(JobError::Abandoned)
      }
    }
  }
}

/// Future returned by [`Scheduler::await_idle`](crate::Scheduler::await_idle).
///
/// Resolves once both the waiting list and the active set are empty. If the
/// queue was already idle when it was created, it is ready on first poll.
#[derive(Debug)]
#[must_use = "an IdleWaiter does nothing unless awaited"]
pub struct IdleWaiter {
  pub(crate) receiver: Option<oneshot::Receiver<()>>,
}

impl IdleWaiter {
  pub(crate) fn ready() -> Self {
    Self { receiver: None }
  }

  pub(crate) fn pending(receiver: oneshot::Receiver<()>) -> Self {
    Self {
      receiver: Some(receiver),
    }
  }
}

impl Future for IdleWaiter {
  type Output = Result<(), SchedulerError>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match self.receiver.as_mut() {
      None => Poll::Ready(Ok(())),
      Some(rx) => Pin::new(rx)
        .poll(cx)
        .map(|received| received.map_err(|_| SchedulerError::SchedulerDropped)),
    }
  }
}
