use futures_throttle::{JobHandle, Scheduler};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::info;

async fn long_job_fn(id: usize) -> Result<String, String> {
  info!("Job {} starting (concurrency demo - should take 1s)", id);
  tokio::time::sleep(Duration::from_secs(1)).await;
  let result = format!("Job {} finished", id);
  info!("{}", result);
  Ok(result)
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  info!("--- Concurrency Limit Example (Limit: 2) ---");

  let capacity = 2;
  let scheduler = Scheduler::<String, String>::new(capacity, Handle::current(), "concurrency_scheduler");

  let num_jobs = 5;
  info!(
    "Submitting {} jobs, each takes 1 sec. With capacity {}, this should take ~{} secs.",
    num_jobs,
    capacity,
    (num_jobs as f32 / capacity as f32).ceil()
  );

  let started = Instant::now();
  let handles: Vec<JobHandle<String, String>> = (0..num_jobs)
    .map(|i| scheduler.submit(move || long_job_fn(i)))
    .collect();

  for handle in handles {
    let job_id = handle.id();
    match handle.await_result().await {
      Ok(result) => info!("Job {} main: Received result: {}", job_id, result),
      Err(e) => info!("Job {} main: Received error: {:?}", job_id, e),
    }
  }

  info!("All jobs processed in {:?}.", started.elapsed());
  info!("--- Concurrency Limit Example End ---");
}
