//! BoardSnapshot - a point-in-time view of one pipeline's plugins.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{BatcherCounter, EventStatus, LogChanges, WaitTime};

/// A point-in-time report of a pipeline: its input, its output batcher,
/// every action plugin in pipeline order, and the latest log changes.
///
/// Snapshots are built per request and never mutated afterwards.
///
/// # Example
///
/// ```rust
/// use pipeboard_types::{ActionReport, BoardSnapshot, EventStatus, OutReport};
///
/// let snapshot = BoardSnapshot::builder()
///     .input("file")
///     .output(OutReport::new("kafka"))
///     .action(ActionReport::untracked("discard"))
///     .action(ActionReport::tracked("geoip", "geoip", |status| match status {
///         EventStatus::Received => 10,
///         _ => 0,
///     }))
///     .build();
///
/// assert_eq!(snapshot.actions.len(), 2);
/// assert_eq!(snapshot.tracked_actions().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardSnapshot {
    #[cfg_attr(feature = "serde", serde(rename = "in"))]
    pub input: InReport,

    #[cfg_attr(feature = "serde", serde(rename = "out"))]
    pub output: OutReport,

    /// One entry per configured action, in pipeline order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<ActionReport>,

    pub log_changes: LogChanges,
}

impl BoardSnapshot {
    pub fn builder() -> BoardSnapshotBuilder {
        BoardSnapshotBuilder::default()
    }

    /// Actions that declared a metric name.
    pub fn tracked_actions(&self) -> impl Iterator<Item = &ActionReport> {
        self.actions.iter().filter(|a| a.tracked)
    }

    /// Total batches the output has committed across all wait buckets.
    pub fn total_batches_committed(&self) -> u64 {
        self.output
            .batcher_counters
            .iter()
            .map(|c| c.batches_committed)
            .sum()
    }
}

/// Input plugin identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InReport {
    pub plugin_name: String,
}

/// Output plugin identity plus its batcher histogram.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutReport {
    pub plugin_name: String,

    /// Dense histogram, one row per wait bucket.
    #[cfg_attr(feature = "serde", serde(default))]
    pub batcher_counters: Vec<BatcherCounter>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub batcher_min_wait: WaitTime,

    #[cfg_attr(feature = "serde", serde(default))]
    pub batcher_max_wait: WaitTime,
}

impl OutReport {
    /// An output report with no batcher data attached yet.
    pub fn new(plugin_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            ..Default::default()
        }
    }
}

/// Per-action report.
///
/// Untracked actions carry only their plugin name; `metric_name` and
/// `statuses` are left empty and omitted from the JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub plugin_name: String,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "String::is_empty")
    )]
    pub metric_name: String,

    pub tracked: bool,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub statuses: Vec<ActionStatus>,
}

impl ActionReport {
    /// An action that has no metric attached.
    pub fn untracked(plugin_name: impl Into<String>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            ..Default::default()
        }
    }

    /// A tracked action with one status row per [`EventStatus`], counts
    /// supplied by `count_of`.
    pub fn tracked<F>(plugin_name: impl Into<String>, metric_name: impl Into<String>, count_of: F) -> Self
    where
        F: Fn(EventStatus) -> u64,
    {
        Self {
            plugin_name: plugin_name.into(),
            metric_name: metric_name.into(),
            tracked: true,
            statuses: EventStatus::ALL
                .iter()
                .map(|&status| ActionStatus::new(status, count_of(status)))
                .collect(),
        }
    }

    /// Count for a status, if this action is tracked.
    pub fn count(&self, status: EventStatus) -> Option<u64> {
        self.statuses
            .iter()
            .find(|s| s.name == status)
            .map(|s| s.count)
    }
}

/// One status row of a tracked action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionStatus {
    pub name: EventStatus,
    pub count: u64,
    pub color: String,
}

impl ActionStatus {
    pub fn new(name: EventStatus, count: u64) -> Self {
        Self {
            name,
            count,
            color: String::from(name.color()),
        }
    }
}

/// Builder for `BoardSnapshot` instances.
#[derive(Debug, Default)]
pub struct BoardSnapshotBuilder {
    snapshot: BoardSnapshot,
}

impl BoardSnapshotBuilder {
    pub fn input(mut self, plugin_name: impl Into<String>) -> Self {
        self.snapshot.input.plugin_name = plugin_name.into();
        self
    }

    pub fn output(mut self, report: OutReport) -> Self {
        self.snapshot.output = report;
        self
    }

    /// Append an action; call in pipeline order.
    pub fn action(mut self, report: ActionReport) -> Self {
        self.snapshot.actions.push(report);
        self
    }

    pub fn log_changes(mut self, changes: LogChanges) -> Self {
        self.snapshot.log_changes = changes;
        self
    }

    pub fn build(self) -> BoardSnapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geoip_counts(status: EventStatus) -> u64 {
        match status {
            EventStatus::Received => 10,
            EventStatus::Discarded => 2,
            EventStatus::Passed => 8,
            _ => 0,
        }
    }

    #[test]
    fn tracked_action_has_all_six_statuses_in_order() {
        let action = ActionReport::tracked("geoip", "geoip", geoip_counts);

        assert!(action.tracked);
        assert_eq!(action.statuses.len(), 6);
        let names: Vec<_> = action.statuses.iter().map(|s| s.name).collect();
        assert_eq!(names, EventStatus::ALL.to_vec());
        assert_eq!(action.count(EventStatus::Passed), Some(8));
        assert_eq!(action.count(EventStatus::Hold), Some(0));
    }

    #[test]
    fn untracked_action_is_bare() {
        let action = ActionReport::untracked("discard");
        assert!(!action.tracked);
        assert!(action.metric_name.is_empty());
        assert!(action.statuses.is_empty());
        assert_eq!(action.count(EventStatus::Received), None);
    }

    #[test]
    fn builder_preserves_action_order() {
        let snapshot = BoardSnapshot::builder()
            .input("http")
            .output(OutReport::new("devnull"))
            .action(ActionReport::untracked("a"))
            .action(ActionReport::untracked("b"))
            .action(ActionReport::untracked("c"))
            .build();

        let names: Vec<_> = snapshot.actions.iter().map(|a| a.plugin_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(snapshot.input.plugin_name, "http");
        assert_eq!(snapshot.output.plugin_name, "devnull");
    }

    #[test]
    fn total_batches_sums_histogram() {
        let mut out = OutReport::new("kafka");
        out.batcher_counters = vec![BatcherCounter::new(0, 4), BatcherCounter::new(1, 6)];
        let snapshot = BoardSnapshot::builder().output(out).build();
        assert_eq!(snapshot.total_batches_committed(), 10);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let mut out = OutReport::new("kafka");
        out.batcher_counters = vec![BatcherCounter::new(1, 0), BatcherCounter::new(5, 3)];
        out.batcher_max_wait = WaitTime::from_millis(4200);

        let snapshot = BoardSnapshot::builder()
            .input("file")
            .output(out)
            .action(ActionReport::untracked("discard"))
            .action(ActionReport::tracked("geoip", "geoip", geoip_counts))
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn roundtrip_keeps_uneven_rates_exact() {
        use crate::PipelineDeltas;

        let deltas = PipelineDeltas {
            input_events: 1031,
            input_bytes: 77_777,
            output_events: 1001,
            output_bytes: 31_000,
            read_ops: 17,
        };

        for interval_ms in [3, 7, 13, 17, 997, 1003, 1234, 3333] {
            let mut out = OutReport::new("kafka");
            out.batcher_counters = vec![BatcherCounter::new(1, 2), BatcherCounter::new(5, 9)];
            out.batcher_min_wait = WaitTime::from_micros(812_345);
            out.batcher_max_wait = WaitTime::from_micros(4_200_017);

            let snapshot = BoardSnapshot::builder()
                .input("file")
                .output(out)
                .action(ActionReport::tracked("geoip", "geoip", geoip_counts))
                .log_changes(LogChanges::from_deltas(&deltas, interval_ms))
                .build();

            let json = serde_json::to_string(&snapshot).unwrap();
            let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, snapshot, "interval {}ms", interval_ms);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_field_names() {
        let snapshot = BoardSnapshot::builder()
            .input("file")
            .output(OutReport::new("kafka"))
            .action(ActionReport::untracked("discard"))
            .action(ActionReport::tracked("geoip", "geoip", geoip_counts))
            .build();

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["in"]["plugin_name"], "file");
        assert_eq!(value["out"]["plugin_name"], "kafka");
        assert!(value["out"]["batcher_counters"].is_array());
        assert!(value["log_changes"].is_object());

        let untracked = &value["actions"][0];
        assert_eq!(untracked["tracked"], false);
        assert!(untracked.get("metric_name").is_none());
        assert!(untracked.get("statuses").is_none());

        let first = &value["actions"][1]["statuses"][0];
        assert_eq!(first["name"], "received");
        assert_eq!(first["count"], 10);
        assert_eq!(first["color"], "#0d8bf0");
    }
}
