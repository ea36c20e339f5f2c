//! Background task closing the per-second and per-minute windows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::clock::Clock;
use super::store::MetricStore;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Which windows a scheduler tick closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Second,
    SecondAndMinute,
}

/// Resets the windowed counters of a [`MetricStore`] on wall-clock boundaries.
///
/// Ticks happen whether or not traffic arrives, so idle periods read as zero.
/// The minute window is anchored to the clock's second-of-minute rather than
/// to a count of ticks, which keeps it aligned after a delayed wake-up.
pub struct WindowScheduler {
    store: Arc<MetricStore>,
    clock: Arc<dyn Clock>,
}

impl WindowScheduler {
    pub fn new(store: Arc<MetricStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Performs the resets due at `at`.
    pub fn tick(&self, at: DateTime<Utc>) -> Tick {
        self.store.reset_second();
        if at.second() == 0 {
            self.store.reset_minute();
            debug!(at = %at, "Minute window rolled over.");
            Tick::SecondAndMinute
        } else {
            Tick::Second
        }
    }

    /// Ticks once per second until `shutdown_rx` fires or its sender is dropped.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Window scheduler started.");
        loop {
            let now = self.clock.now();
            let (wait, boundary) = next_boundary(now);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    // A wake-up that reads slightly before the boundary still
                    // belongs to it; a late one uses the actual time.
                    let at = self.clock.now().max(boundary);
                    self.tick(at);
                }
                _ = shutdown_rx.recv() => {
                    info!("Window scheduler shutting down.");
                    return;
                }
            }
        }
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle { shutdown_tx, task }
    }
}

/// Time left until the next full second after `now`, and that second.
fn next_boundary(now: DateTime<Utc>) -> (Duration, DateTime<Utc>) {
    let subsec = now.timestamp_subsec_nanos().min(NANOS_PER_SECOND - 1);
    let remaining = NANOS_PER_SECOND - subsec;
    let boundary = now + TimeDelta::nanoseconds(i64::from(remaining));
    (Duration::from_nanos(u64::from(remaining)), boundary)
}

/// Owner of a running scheduler task.
pub struct SchedulerHandle {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the scheduler and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            error!("Window scheduler task failed: {}", e);
        }
    }
}
