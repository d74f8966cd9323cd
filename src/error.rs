use thiserror::Error;

/// Errors raised by the scheduler itself.
///
/// Job failures never show up here; they travel through [`JobError`] to the
/// handle of the job that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
  #[error("Scheduler capacity must be at least 1")]
  InvalidCapacity,

  #[error("Scheduler was dropped before the queue became idle")]
  SchedulerDropped,
}

/// The outcome of a job that did not settle successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError<E> {
  /// The job's own future settled with this failure reason.
  #[error("Job failed: {0}")]
  Failed(E),

  #[error("Job panicked while starting or running")]
  Panicked,

  #[error("Job was abandoned: its scheduler was dropped before the job started")]
  Abandoned,
}

impl<E> JobError<E> {
  /// Returns the job's own failure reason, if that is what this error carries.
  pub fn into_failure(self) -> Option<E> {
    match self {
      JobError::Failed(reason) => Some(reason),
      _ => None,
    }
  }
}
