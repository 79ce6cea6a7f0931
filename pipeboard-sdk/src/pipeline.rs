//! The pieces of the surrounding pipeline the board reads from.
//!
//! The board never routes or batches events itself. It only sees plugin
//! identities and a few narrow collaborator traits, implemented by the
//! pipeline (or by the ready-made types in this module).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use pipeboard_types::{LogChanges, ObservabilityInfo, PipelineDeltas, PipelineTotals};
use serde::Deserialize;

/// Identity of the pipeline's input plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InputPluginInfo {
    /// Plugin type, e.g. `"file"` or `"kafka"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl InputPluginInfo {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Identity of one action plugin and the metric it reports under.
///
/// An empty `metric_name` means the action is not instrumented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ActionPluginInfo {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metric_name: String,
}

impl ActionPluginInfo {
    /// An action without a metric.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            metric_name: String::new(),
        }
    }

    /// Attach a metric name.
    pub fn with_metric(mut self, metric_name: impl Into<String>) -> Self {
        self.metric_name = metric_name.into();
        self
    }

    pub fn is_tracked(&self) -> bool {
        !self.metric_name.is_empty()
    }
}

/// Identity of the pipeline's output plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct OutputPluginInfo {
    #[serde(rename = "type")]
    pub kind: String,
}

impl OutputPluginInfo {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Source of an output plugin's observability payload.
pub trait OutputObservability: Send + Sync {
    fn observability_info(&self) -> ObservabilityInfo;
}

/// Output plugins without a batcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBatcher;

impl OutputObservability for NoBatcher {
    fn observability_info(&self) -> ObservabilityInfo {
        ObservabilityInfo::default()
    }
}

/// Source of the pipeline's absolute throughput counters.
pub trait PipelineCounters: Send + Sync {
    fn totals(&self) -> PipelineTotals;
}

/// Lock-free throughput counters that pipeline workers bump directly.
#[derive(Debug, Default)]
pub struct ThroughputCounters {
    input_events: AtomicU64,
    input_bytes: AtomicU64,
    output_events: AtomicU64,
    output_bytes: AtomicU64,
    read_ops: AtomicU64,
}

impl ThroughputCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record events accepted by the input.
    pub fn record_input(&self, events: u64, bytes: u64) {
        self.input_events.fetch_add(events, Ordering::Relaxed);
        self.input_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record events handed to the output.
    pub fn record_output(&self, events: u64, bytes: u64) {
        self.output_events.fetch_add(events, Ordering::Relaxed);
        self.output_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record one read operation on the input source.
    pub fn record_read_op(&self) {
        self.read_ops.fetch_add(1, Ordering::Relaxed);
    }
}

impl PipelineCounters for ThroughputCounters {
    fn totals(&self) -> PipelineTotals {
        PipelineTotals {
            input_events: self.input_events.load(Ordering::Relaxed),
            input_bytes: self.input_bytes.load(Ordering::Relaxed),
            output_events: self.output_events.load(Ordering::Relaxed),
            output_bytes: self.output_bytes.load(Ordering::Relaxed),
            read_ops: self.read_ops.load(Ordering::Relaxed),
        }
    }
}

/// Turns per-quantity deltas into the board's log-change summary.
///
/// Called once per snapshot, from the reporting path only.
pub trait LogChangeAggregator: Send {
    fn aggregate(&mut self, deltas: &PipelineDeltas) -> LogChanges;
}

/// Summarizes deltas over the wall-clock time since the previous call.
///
/// The first interval is measured from construction.
#[derive(Debug)]
pub struct IntervalLogChanges {
    since: Instant,
}

impl IntervalLogChanges {
    pub fn new() -> Self {
        Self {
            since: Instant::now(),
        }
    }

    /// Summarize `deltas` as observed at `now`.
    pub fn aggregate_at(&mut self, deltas: &PipelineDeltas, now: Instant) -> LogChanges {
        let interval = now.saturating_duration_since(self.since);
        self.since = now;
        let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        LogChanges::from_deltas(deltas, interval_ms)
    }
}

impl Default for IntervalLogChanges {
    fn default() -> Self {
        Self::new()
    }
}

impl LogChangeAggregator for IntervalLogChanges {
    fn aggregate(&mut self, deltas: &PipelineDeltas) -> LogChanges {
        self.aggregate_at(deltas, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn action_tracking_follows_metric_name() {
        assert!(!ActionPluginInfo::new("discard").is_tracked());
        assert!(ActionPluginInfo::new("geoip").with_metric("geoip").is_tracked());
    }

    #[test]
    fn plugin_infos_deserialize_from_type_field() {
        let action: ActionPluginInfo =
            serde_json::from_str(r#"{"type":"throttle","metric_name":"throttled"}"#).unwrap();
        assert_eq!(action, ActionPluginInfo::new("throttle").with_metric("throttled"));

        let bare: ActionPluginInfo = serde_json::from_str(r#"{"type":"discard"}"#).unwrap();
        assert!(!bare.is_tracked());
    }

    #[test]
    fn throughput_counters_accumulate() {
        let counters = ThroughputCounters::new();
        counters.record_input(10, 1000);
        counters.record_input(5, 500);
        counters.record_output(12, 1200);
        counters.record_read_op();

        assert_eq!(
            counters.totals(),
            PipelineTotals {
                input_events: 15,
                input_bytes: 1500,
                output_events: 12,
                output_bytes: 1200,
                read_ops: 1,
            }
        );
    }

    #[test]
    fn no_batcher_reports_nothing() {
        let info = NoBatcher.observability_info();
        assert!(info.batcher_information.committed_counters.is_none());
    }

    #[test]
    fn interval_log_changes_measure_between_calls() {
        let mut agg = IntervalLogChanges::new();
        let start = agg.since;
        let deltas = PipelineDeltas {
            input_events: 100,
            ..Default::default()
        };

        let changes = agg.aggregate_at(&deltas, start + Duration::from_secs(2));
        assert_eq!(changes.interval_ms, 2000);
        assert_eq!(changes.in_events, 100);
        assert_eq!(changes.in_events_per_sec, 50.0);

        let changes = agg.aggregate_at(&deltas, start + Duration::from_millis(2500));
        assert_eq!(changes.interval_ms, 500);
        assert_eq!(changes.in_events_per_sec, 200.0);
    }
}
