//! "Active Now" live metric refreshed on a fixed period

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Read side of the live metric, cheap to clone into request handlers
#[derive(Debug, Clone, Default)]
pub struct LiveMetric {
    value: Arc<AtomicU64>,
}

impl LiveMetric {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(initial)),
        }
    }

    /// Current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }
}

/// Owns the refresh task; the task stops on [`LiveMetricHandle::stop`] or drop
pub struct LiveMetricHandle {
    task: JoinHandle<()>,
    metric: LiveMetric,
}

impl LiveMetricHandle {
    /// Reader for the refreshed value
    pub fn metric(&self) -> LiveMetric {
        self.metric.clone()
    }

    /// Cancel the refresh task
    pub fn stop(&self) {
        if !self.task.is_finished() {
            log::debug!(target: "txdash::live", "Stopping live metric refresh");
        }
        self.task.abort();
    }
}

impl Drop for LiveMetricHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Random visitor count in the range the dashboard shows
pub fn random_active_now() -> u64 {
    rand::rng().random_range(500..=700)
}

/// Spawn the refresh task
///
/// The metric keeps `initial` until the first full period elapses, then
/// takes a fresh `generator()` value every `period`. Must be called inside a
/// tokio runtime.
pub fn spawn_live_metric<G>(period: Duration, initial: u64, mut generator: G) -> LiveMetricHandle
where
    G: FnMut() -> u64 + Send + 'static,
{
    let metric = LiveMetric::new(initial);
    let writer = metric.clone();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let value = generator();
            writer.set(value);
            log::trace!(target: "txdash::live", "Active now refreshed: {}", value);
        }
    });

    log::info!(target: "txdash::live", "Live metric refresh every {:?}", period);
    LiveMetricHandle { task, metric }
}
