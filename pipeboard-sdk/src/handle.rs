//! Metric handle for recording action outcomes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use pipeboard_types::EventStatus;

use crate::store::MetricCounters;

/// A handle for recording event outcomes under one metric name.
///
/// This is what an action plugin keeps after it registers its metric with
/// [`CounterStore::register`](crate::CounterStore::register). Clones share
/// the same counters.
///
/// # Example
///
/// ```rust
/// use pipeboard_sdk::{CounterStore, EventStatus};
///
/// let store = CounterStore::new();
/// let geoip = store.register("geoip");
///
/// geoip.increment(EventStatus::Received);
/// geoip.increment(EventStatus::Passed);
///
/// assert_eq!(store.snapshot("geoip").get("passed"), Some(&1));
/// ```
#[derive(Clone)]
pub struct MetricHandle {
    name: Arc<str>,
    counters: Arc<MetricCounters>,
    // Resolved lazily so statuses never seen stay absent from snapshots.
    cached: Arc<[OnceLock<Arc<AtomicU64>>; 6]>,
}

impl MetricHandle {
    pub(crate) fn new(name: &str, counters: Arc<MetricCounters>) -> Self {
        Self {
            name: Arc::from(name),
            counters,
            cached: Arc::new(Default::default()),
        }
    }

    fn status_counter(&self, status: EventStatus) -> &Arc<AtomicU64> {
        self.cached[status as usize].get_or_init(|| self.counters.counter(status.as_str()))
    }

    /// Record one event with the given outcome.
    pub fn increment(&self, status: EventStatus) {
        self.add(status, 1);
    }

    /// Record `count` events with the given outcome.
    pub fn add(&self, status: EventStatus, count: u64) {
        self.status_counter(status).fetch_add(count, Ordering::Relaxed);
    }

    /// Record one event under a custom status tag.
    ///
    /// Custom tags are stored but only the [`EventStatus`] tags appear on
    /// the board.
    pub fn increment_tag(&self, tag: &str) {
        self.counters.add(tag, 1);
    }

    /// Current count of a status.
    pub fn get(&self, status: EventStatus) -> u64 {
        match self.cached[status as usize].get() {
            Some(counter) => counter.load(Ordering::Relaxed),
            None => self.counters.load(status.as_str()).unwrap_or(0),
        }
    }

    /// Get the metric name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MetricHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricHandle")
            .field("name", &self.name)
            .finish()
    }
}
