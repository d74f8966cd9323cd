use crate::error::SchedulerError;

/// Construction parameters for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
  /// Name attached to every tracing event emitted by the scheduler.
  pub name: String,
  /// Maximum number of jobs running at once. Must be at least 1.
  pub capacity: usize,
  /// When `true`, submitted jobs wait until [`start`](crate::Scheduler::start) is called.
  pub start_paused: bool,
}

impl SchedulerConfig {
  pub const DEFAULT_NAME: &'static str = "scheduler";

  pub fn new(capacity: usize) -> Self {
    Self {
      name: Self::DEFAULT_NAME.to_string(),
      capacity,
      start_paused: false,
    }
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn start_paused(mut self, start_paused: bool) -> Self {
    self.start_paused = start_paused;
    self
  }

  /// Checks the configuration before a scheduler is built from it.
  ///
  /// # Errors
  /// Returns `SchedulerError::InvalidCapacity` if `capacity` is zero.
  pub fn validate(&self) -> Result<(), SchedulerError> {
    if self.capacity == 0 {
      return Err(SchedulerError::InvalidCapacity);
    }
    Ok(())
  }
}
