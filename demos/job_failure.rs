use futures_throttle::{JobError, Scheduler};
use tokio::runtime::Handle;
use tracing::info;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::INFO)
    .with_target(false)
    .init();

  info!("--- Job Failure Example ---");

  let scheduler = Scheduler::<u32, String>::new(1, Handle::current(), "failure_scheduler");

  let failing = scheduler.submit(|| async { Err("upstream returned 503".to_string()) });
  let following = scheduler.submit(|| async { Ok(42) });

  match failing.await_result().await {
    Err(JobError::Failed(reason)) => info!("Failing job reported its own reason: {}", reason),
    other => info!("Unexpected outcome: {:?}", other),
  }
  match following.await_result().await {
    Ok(value) => info!("Next job still ran and returned {}", value),
    Err(e) => info!("Next job errored: {}", e),
  }

  if scheduler.await_idle().await.is_ok() {
    info!("Queue drained despite the failure.");
  }
  info!("--- Job Failure Example End ---");
}
