//! Background concurrency sampler.
//!
//! Periodically reads the number of live runtime tasks and publishes it to the
//! `runtime_alive_tasks` gauge. A failed read skips the tick; the loop only ends
//! when its cancellation token fires.

use std::time::Duration;

use pingmeter_core::Gauge;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::metrics::ServiceMetrics;

/// Where the live task count comes from.
pub trait TaskCountSource: Send + Sync + 'static {
    /// `None` when the count cannot be read right now.
    fn task_count(&self) -> Option<usize>;
}

impl<F> TaskCountSource for F
where
    F: Fn() -> Option<usize> + Send + Sync + 'static,
{
    fn task_count(&self) -> Option<usize> {
        self()
    }
}

/// Alive tasks of the tokio runtime the caller is running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTaskCount;

impl TaskCountSource for TokioTaskCount {
    fn task_count(&self) -> Option<usize> {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        Some(handle.metrics().num_alive_tasks())
    }
}

pub struct ConcurrencySampler<S = TokioTaskCount> {
    gauge: Gauge,
    source: S,
    interval: Duration,
}

impl<S: TaskCountSource> ConcurrencySampler<S> {
    pub fn new(gauge: Gauge, source: S, interval: Duration) -> Self {
        Self {
            gauge,
            source,
            // tokio::time::interval rejects a zero period
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Take one reading. Returns false if the source had nothing.
    pub fn sample_once(&self) -> bool {
        match self.source.task_count() {
            Some(n) => {
                self.gauge.set(n as f64);
                true
            }
            None => {
                tracing::debug!(metric = %self.gauge.name(), "task count unavailable, tick skipped");
                false
            }
        }
    }

    /// Sample immediately, then every interval until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut tick = tokio::time::interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "concurrency sampler started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick.tick() => {
                    self.sample_once();
                }
            }
        }
        tracing::info!("concurrency sampler stopped");
    }
}

/// Spawn the production sampler for `metrics` on the current runtime.
pub fn spawn_sampler(
    metrics: &ServiceMetrics,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let sampler = ConcurrencySampler::new(metrics.alive_tasks().clone(), TokioTaskCount, interval);
    tokio::spawn(sampler.run(cancel))
}
