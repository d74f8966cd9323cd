use crate::error::JobError;

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use tokio::sync::oneshot;

/// Identifier assigned to a job at submission. Unique within one scheduler.
pub type JobId = u64;

/// The type of future a job produces once it has been started.
/// It must be `Send` and `'static`, and settle with either a value or a failure reason.
pub type JobFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

pub(crate) type JobFactory<T, E> = Box<dyn FnOnce() -> JobFuture<T, E> + Send + 'static>;

pub(crate) type ResultSender<T, E> = oneshot::Sender<Result<T, JobError<E>>>;

/// A queued job together with the channel its caller is listening on.
pub(crate) struct PendingRegistration<T, E> {
  pub(crate) job_id: JobId,
  pub(crate) factory: JobFactory<T, E>,
  pub(crate) result_sender: ResultSender<T, E>,
}

/// Bookkeeping for a job that has been started and not yet settled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveEntry {
  pub(crate) started_at: Instant,
}
