//! A synthetic pipeline that keeps the board's counters moving.
//!
//! Each worker thread reads a batch of fake events, runs every event through
//! the configured actions and commits the survivors to the output batcher,
//! the way a real pipeline's processors would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use pipeboard_sdk::{
    ActionPluginInfo, BatcherStats, CounterStore, EventStatus, MetricHandle, ThroughputCounters,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::settings::DemoSettings;

/// Shared sinks the demo workers write to.
#[derive(Debug, Clone)]
pub struct DemoSinks {
    pub counters: Arc<CounterStore>,
    pub throughput: Arc<ThroughputCounters>,
    pub batcher: Arc<BatcherStats>,
}

impl DemoSinks {
    /// Fresh, zeroed sinks.
    pub fn new() -> Self {
        Self {
            counters: Arc::new(CounterStore::new()),
            throughput: Arc::new(ThroughputCounters::new()),
            batcher: Arc::new(BatcherStats::new()),
        }
    }
}

impl Default for DemoSinks {
    fn default() -> Self {
        Self::new()
    }
}

/// Running demo workers.
#[derive(Debug)]
pub struct DemoPipeline {
    stop: Arc<AtomicBool>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl DemoPipeline {
    /// Spawn the workers.
    pub fn start(
        settings: &DemoSettings,
        actions: &[ActionPluginInfo],
        sinks: &DemoSinks,
    ) -> Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));

        // `None` for untracked actions: they still see events, nothing is counted.
        let stages: Arc<Vec<Option<MetricHandle>>> = Arc::new(
            actions
                .iter()
                .map(|a| a.is_tracked().then(|| sinks.counters.register(&a.metric_name)))
                .collect(),
        );

        let mut workers = Vec::with_capacity(settings.workers);
        for id in 0..settings.workers {
            let worker = Worker {
                stages: stages.clone(),
                throughput: sinks.throughput.clone(),
                batcher: sinks.batcher.clone(),
                stop: stop.clone(),
                tick: Duration::from_millis(settings.tick_ms),
                batch_size: settings.batch_size,
            };
            let handle = thread::Builder::new()
                .name(format!("demo-worker-{}", id))
                .spawn(move || worker.run())
                .context("can't spawn demo worker")?;
            workers.push(handle);
        }

        info!(workers = settings.workers, stages = stages.len(), "demo pipeline started");
        Ok(Self { stop, workers })
    }

    /// Signal the workers and wait for them to finish.
    pub fn shutdown(self) {
        self.stop.store(true, Ordering::Relaxed);
        for worker in self.workers {
            if worker.join().is_err() {
                warn!("demo worker panicked");
            }
        }
        info!("demo pipeline stopped");
    }
}

struct Worker {
    stages: Arc<Vec<Option<MetricHandle>>>,
    throughput: Arc<ThroughputCounters>,
    batcher: Arc<BatcherStats>,
    stop: Arc<AtomicBool>,
    tick: Duration,
    batch_size: usize,
}

impl Worker {
    fn run(self) {
        let mut rng = rand::thread_rng();
        let mut batch_started = Instant::now();

        while !self.stop.load(Ordering::Relaxed) {
            let events = rng.gen_range(1..=self.batch_size.max(1));
            self.throughput.record_read_op();

            let mut delivered = 0u64;
            let mut delivered_bytes = 0u64;
            for _ in 0..events {
                let size = rng.gen_range(64..2048u64);
                self.throughput.record_input(1, size);
                if self.process(&mut rng) {
                    delivered += 1;
                    delivered_bytes += size;
                }
            }

            if delivered > 0 {
                self.throughput.record_output(delivered, delivered_bytes);
                self.batcher.record_commit(batch_started.elapsed());
                batch_started = Instant::now();
            }

            debug!(events, delivered, "demo batch");
            thread::sleep(self.tick);
        }
    }

    /// Run one event through every action; true if it reached the output.
    fn process(&self, rng: &mut impl Rng) -> bool {
        for stage in self.stages.iter() {
            let Some(metric) = stage else {
                continue;
            };
            metric.increment(EventStatus::Received);

            let outcome = match rng.gen_range(0..100) {
                0..=79 => EventStatus::Passed,
                80..=88 => EventStatus::NotMatched,
                89..=95 => EventStatus::Discarded,
                96..=98 => EventStatus::Collapse,
                _ => EventStatus::Hold,
            };
            metric.increment(outcome);

            if !matches!(outcome, EventStatus::Passed | EventStatus::NotMatched) {
                return false;
            }
        }
        true
    }
}
