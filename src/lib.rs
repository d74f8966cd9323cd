//! A Tokio-based scheduler that runs at most `capacity` jobs concurrently,
//! queues the rest in FIFO order, supports pause/resume, and can signal when
//! the whole batch has drained.

mod config;
mod error;
mod handle;
mod job;
mod scheduler;
mod state;

pub use config::SchedulerConfig;
pub use error::{JobError, SchedulerError};
pub use handle::{IdleWaiter, JobHandle};
pub use job::{JobFuture, JobId};
pub use scheduler::Scheduler;
