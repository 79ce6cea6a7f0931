//! Batcher Stats: dense wait-bucket reports and a lock-free commit recorder.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pipeboard_types::{BatcherCounter, BatcherInformation, ObservabilityInfo, WaitBucket, WaitTime};

use crate::pipeline::OutputObservability;

/// Dense batcher histogram plus the wait bounds it was reported with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatcherReport {
    pub counters: Vec<BatcherCounter>,
    pub min_wait: WaitTime,
    pub max_wait: WaitTime,
}

/// Reduce a sparse batcher payload over the standard [`WaitBucket`] set.
pub fn reduce(info: &BatcherInformation) -> BatcherReport {
    reduce_with(&WaitBucket::thresholds(), info)
}

/// Reduce a sparse batcher payload over an arbitrary ordered bucket set.
///
/// The result has exactly one row per bucket, in `buckets` order. Buckets
/// missing from the payload, or a payload with no counters at all, report
/// zero. Keys outside `buckets` are ignored.
pub fn reduce_with(buckets: &[u64], info: &BatcherInformation) -> BatcherReport {
    let committed = info.committed_counters.as_ref();
    let counters = buckets
        .iter()
        .map(|&seconds| {
            let count = committed
                .and_then(|c| c.get(&seconds))
                .copied()
                .unwrap_or(0);
            BatcherCounter::new(seconds, count)
        })
        .collect();

    BatcherReport {
        counters,
        min_wait: info.min_wait,
        max_wait: info.max_wait,
    }
}

/// Lock-free batch commit statistics for an output plugin.
///
/// Output workers call [`record_commit`](Self::record_commit) after each
/// flush; the board reads it through [`OutputObservability`].
#[derive(Debug)]
pub struct BatcherStats {
    buckets: [AtomicU64; 7],
    commits: AtomicU64,
    min_wait_us: AtomicU64,
    max_wait_us: AtomicU64,
}

impl Default for BatcherStats {
    fn default() -> Self {
        Self {
            buckets: Default::default(),
            commits: AtomicU64::new(0),
            min_wait_us: AtomicU64::new(u64::MAX),
            max_wait_us: AtomicU64::new(0),
        }
    }
}

impl BatcherStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a batch that waited `wait` before being committed.
    ///
    /// A bucket counts waits at or below its threshold, so partial seconds
    /// round up: 1.5s lands in the 2s bucket.
    pub fn record_commit(&self, wait: Duration) {
        let bucket = WaitBucket::for_wait_secs(ceil_secs(wait));
        self.buckets[bucket.position()].fetch_add(1, Ordering::Relaxed);

        let micros = WaitTime::from(wait).as_micros();
        self.min_wait_us.fetch_min(micros, Ordering::Relaxed);
        self.max_wait_us.fetch_max(micros, Ordering::Relaxed);
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Total batches committed.
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Current payload; counters are `None` until the first commit.
    pub fn information(&self) -> BatcherInformation {
        if self.commits() == 0 {
            return BatcherInformation::default();
        }

        let committed: BTreeMap<u64, u64> = WaitBucket::ALL
            .iter()
            .filter_map(|bucket| {
                let count = self.buckets[bucket.position()].load(Ordering::Relaxed);
                (count > 0).then_some((bucket.seconds(), count))
            })
            .collect();

        let min = self.min_wait_us.load(Ordering::Relaxed);
        BatcherInformation {
            committed_counters: Some(committed),
            min_wait: WaitTime::from_micros(if min == u64::MAX { 0 } else { min }),
            max_wait: WaitTime::from_micros(self.max_wait_us.load(Ordering::Relaxed)),
        }
    }
}

fn ceil_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

impl OutputObservability for BatcherStats {
    fn observability_info(&self) -> ObservabilityInfo {
        ObservabilityInfo {
            batcher_information: self.information(),
        }
    }
}
