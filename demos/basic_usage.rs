use futures_throttle::Scheduler;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::info;

async fn fetch_page(id: usize) -> Result<String, String> {
  info!("Job {} started", id);
  tokio::time::sleep(Duration::from_millis(200)).await;
  Ok(format!("page {}", id))
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  info!("--- Basic Usage Example ---");

  let scheduler = Scheduler::<String, String>::new(2, Handle::current(), "basic_scheduler");

  let handles: Vec<_> = (0..4).map(|i| scheduler.submit(move || fetch_page(i))).collect();
  info!(
    "Submitted 4 jobs: {} running, {} waiting.",
    scheduler.active_count(),
    scheduler.pending_count()
  );

  for handle in handles {
    let job_id = handle.id();
    match handle.await_result().await {
      Ok(page) => info!("Job {} main: Received result: {}", job_id, page),
      Err(e) => info!("Job {} main: Received error: {}", job_id, e),
    }
  }

  if let Err(e) = scheduler.await_idle().await {
    tracing::error!("Scheduler did not drain: {}", e);
  }
  info!("--- Basic Usage Example End ---");
}
