use futures_throttle::{Scheduler, SchedulerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::info;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .init();

  info!("--- Pause / Resume Example ---");

  let config = SchedulerConfig::new(1).name("paused_scheduler").start_paused(true);
  let scheduler = Scheduler::<(), String>::with_config(config, Handle::current()).expect("valid config");
  let counter = Arc::new(AtomicUsize::new(0));

  scheduler.submit_all((0..6).map(|i| {
    let counter = counter.clone();
    move || async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      let done = counter.fetch_add(1, Ordering::SeqCst) + 1;
      info!("Job {} done ({} total)", i, done);
      Ok(())
    }
  }));

  info!("Queued {} jobs while paused. Nothing has run yet.", scheduler.pending_count());
  let idle = scheduler.await_idle();

  scheduler.start();
  tokio::time::sleep(Duration::from_millis(120)).await;
  scheduler.pause();
  info!(
    "Paused mid-batch: {} done, {} still waiting.",
    counter.load(Ordering::SeqCst),
    scheduler.pending_count()
  );

  tokio::time::sleep(Duration::from_millis(200)).await;
  info!("Resuming.");
  scheduler.start();

  match idle.await {
    Ok(()) => info!("Queue drained. {} jobs ran.", counter.load(Ordering::SeqCst)),
    Err(e) => tracing::error!("Queue did not drain: {}", e),
  }
  info!("--- Pause / Resume Example End ---");
}
