//! Counter Store: per-metric, per-status increment-only counters.
//!
//! Writers are pipeline workers on arbitrary threads; the reader is the board
//! building a snapshot. Every counter is an `AtomicU64`, so increments and
//! loads never take a lock once the counter exists. The maps themselves are
//! guarded by `RwLock`s that are only write-locked when a metric or status
//! tag is seen for the first time.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::handle::MetricHandle;

/// Counters for one metric name, keyed by event status tag.
#[derive(Debug, Default)]
pub struct MetricCounters {
    statuses: RwLock<BTreeMap<String, Arc<AtomicU64>>>,
}

impl MetricCounters {
    /// Get or create the counter for a status tag.
    pub fn counter(&self, status: &str) -> Arc<AtomicU64> {
        // Fast path: check if it exists
        {
            let statuses = self.statuses.read();
            if let Some(counter) = statuses.get(status) {
                return counter.clone();
            }
        }

        // Slow path: another writer may have inserted it meanwhile
        let mut statuses = self.statuses.write();
        statuses
            .entry(status.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Add `n` to a status counter.
    pub fn add(&self, status: &str, n: u64) {
        self.counter(status).fetch_add(n, Ordering::Relaxed);
    }

    /// Current value of one status, without creating it.
    pub fn load(&self, status: &str) -> Option<u64> {
        self.statuses
            .read()
            .get(status)
            .map(|counter| counter.load(Ordering::Relaxed))
    }

    /// Current value of every status that has ever been touched.
    ///
    /// Each load is atomic; the set of loads is not.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.statuses
            .read()
            .iter()
            .map(|(status, counter)| (status.clone(), counter.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Registry of every metric the pipeline's action plugins declared.
///
/// Construct one when the pipeline starts and share it (behind an `Arc`)
/// with both the plugins and the [`Board`](crate::Board). Metrics are never
/// removed.
#[derive(Debug, Default)]
pub struct CounterStore {
    metrics: RwLock<BTreeMap<String, Arc<MetricCounters>>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric or get the existing one, returning a handle for
    /// worker threads.
    pub fn register(&self, name: &str) -> MetricHandle {
        MetricHandle::new(name, self.get_or_create(name))
    }

    fn get_or_create(&self, name: &str) -> Arc<MetricCounters> {
        // Fast path
        {
            let metrics = self.metrics.read();
            if let Some(counters) = metrics.get(name) {
                return counters.clone();
            }
        }

        // Slow path
        let mut metrics = self.metrics.write();
        metrics
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MetricCounters::default()))
            .clone()
    }

    /// Increment one status counter of a metric by one.
    pub fn increment(&self, metric: &str, status: &str) {
        self.get_or_create(metric).add(status, 1);
    }

    /// Current counts of a metric, by status tag.
    ///
    /// Tags that were never incremented are absent; unknown metrics yield an
    /// empty map.
    pub fn snapshot(&self, metric: &str) -> BTreeMap<String, u64> {
        let counters = self.metrics.read().get(metric).cloned();
        counters.map(|c| c.snapshot()).unwrap_or_default()
    }

    /// Names of all registered metrics, sorted.
    pub fn metric_names(&self) -> Vec<String> {
        self.metrics.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_and_snapshot() {
        let store = CounterStore::new();
        store.increment("geoip", "received");
        store.increment("geoip", "received");
        store.increment("geoip", "passed");

        let counts = store.snapshot("geoip");
        assert_eq!(counts.get("received"), Some(&2));
        assert_eq!(counts.get("passed"), Some(&1));
        assert_eq!(counts.get("discarded"), None);
    }

    #[test]
    fn unknown_metric_is_empty() {
        let store = CounterStore::new();
        store.increment("geoip", "received");
        assert!(store.snapshot("throttle").is_empty());
    }

    #[test]
    fn registered_but_untouched_metric_is_empty() {
        let store = CounterStore::new();
        let _handle = store.register("mask");
        assert!(store.snapshot("mask").is_empty());
        assert_eq!(store.metric_names(), vec!["mask".to_string()]);
    }

    #[test]
    fn counter_returns_same_arc_on_second_call() {
        let counters = MetricCounters::default();

        let c1 = counters.counter("received");
        let c2 = counters.counter("received");
        assert!(Arc::ptr_eq(&c1, &c2));

        c1.fetch_add(3, Ordering::Relaxed);
        assert_eq!(c2.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn metrics_are_isolated_by_name() {
        let store = CounterStore::new();
        store.increment("a", "received");
        store.increment("b", "received");
        store.increment("b", "received");

        assert_eq!(store.snapshot("a").get("received"), Some(&1));
        assert_eq!(store.snapshot("b").get("received"), Some(&2));
        assert_eq!(store.metric_names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        use std::thread;

        let store = Arc::new(CounterStore::new());

        let mut handles = vec![];
        for _ in 0..8 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    store.increment("geoip", "received");
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.snapshot("geoip").get("received"), Some(&8000));
    }
}
