//! The Board: builds point-in-time snapshots of a running pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use pipeboard_types::{ActionReport, BoardSnapshot, InReport, LogChanges, OutReport, PipelineTotals};
use tracing::trace;

use crate::batcher;
use crate::delta::PipelineDeltaTrackers;
use crate::pipeline::{
    ActionPluginInfo, InputPluginInfo, IntervalLogChanges, LogChangeAggregator, NoBatcher,
    OutputObservability, OutputPluginInfo, PipelineCounters,
};
use crate::store::CounterStore;

/// Reporting-side state that advances on every snapshot.
struct ReportWindow {
    trackers: PipelineDeltaTrackers,
    log_changes: Box<dyn LogChangeAggregator>,
}

impl ReportWindow {
    fn advance(&mut self, totals: &PipelineTotals) -> LogChanges {
        let deltas = self.trackers.next(totals);
        self.log_changes.aggregate(&deltas)
    }
}

/// Assembles [`BoardSnapshot`]s from the pipeline's live counters.
///
/// Workers keep mutating the counters while a snapshot is built; no lock is
/// held across the individual reads, so a snapshot is a near-simultaneous
/// view rather than a consistent cut.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use pipeboard_sdk::{ActionPluginInfo, Board, CounterStore, EventStatus};
///
/// let counters = Arc::new(CounterStore::new());
/// let geoip = counters.register("geoip");
///
/// let board = Board::builder()
///     .input("file")
///     .action(ActionPluginInfo::new("discard"))
///     .action(ActionPluginInfo::new("geoip").with_metric("geoip"))
///     .output("kafka")
///     .counters(counters)
///     .build();
///
/// geoip.add(EventStatus::Received, 10);
///
/// let snapshot = board.snapshot();
/// assert!(!snapshot.actions[0].tracked);
/// assert_eq!(snapshot.actions[1].count(EventStatus::Received), Some(10));
/// ```
pub struct Board {
    input: InputPluginInfo,
    actions: Vec<ActionPluginInfo>,
    output: OutputPluginInfo,
    counters: Arc<CounterStore>,
    output_info: Arc<dyn OutputObservability>,
    totals: Option<Arc<dyn PipelineCounters>>,
    window: Mutex<ReportWindow>,
}

impl Board {
    /// Create a builder for configuring the board.
    pub fn builder() -> BoardBuilder {
        BoardBuilder::new()
    }

    /// The counter store action plugins register their metrics in.
    pub fn counters(&self) -> &Arc<CounterStore> {
        &self.counters
    }

    /// Configured action plugins, in pipeline order.
    pub fn actions(&self) -> &[ActionPluginInfo] {
        &self.actions
    }

    /// Build a fresh snapshot.
    ///
    /// Reading the pipeline totals advances the delta window, so the log
    /// changes in each snapshot cover the time since the previous one.
    pub fn snapshot(&self) -> BoardSnapshot {
        let totals = self
            .totals
            .as_ref()
            .map(|t| t.totals())
            .unwrap_or_default();
        let log_changes = self.window.lock().advance(&totals);

        let info = self.output_info.observability_info();
        let report = batcher::reduce(&info.batcher_information);

        let output = OutReport {
            plugin_name: self.output.kind.clone(),
            batcher_counters: report.counters,
            batcher_min_wait: report.min_wait,
            batcher_max_wait: report.max_wait,
        };

        let actions = self
            .actions
            .iter()
            .map(|action| self.action_report(action))
            .collect();

        trace!(actions = self.actions.len(), "built board snapshot");

        BoardSnapshot {
            input: InReport {
                plugin_name: self.input.kind.clone(),
            },
            output,
            actions,
            log_changes,
        }
    }

    fn action_report(&self, action: &ActionPluginInfo) -> ActionReport {
        if !action.is_tracked() {
            return ActionReport::untracked(action.kind.clone());
        }

        let counts = self.counters.snapshot(&action.metric_name);
        ActionReport::tracked(action.kind.clone(), action.metric_name.clone(), |status| {
            counts.get(status.as_str()).copied().unwrap_or(0)
        })
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("input", &self.input)
            .field("actions", &self.actions)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a Board.
///
/// Anything left unset falls back to an empty default: no batcher, zero
/// pipeline totals, a fresh counter store, and wall-clock log changes.
#[derive(Default)]
pub struct BoardBuilder {
    input: InputPluginInfo,
    actions: Vec<ActionPluginInfo>,
    output: OutputPluginInfo,
    counters: Option<Arc<CounterStore>>,
    output_info: Option<Arc<dyn OutputObservability>>,
    totals: Option<Arc<dyn PipelineCounters>>,
    log_changes: Option<Box<dyn LogChangeAggregator>>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input plugin type.
    pub fn input(mut self, kind: impl Into<String>) -> Self {
        self.input = InputPluginInfo::new(kind);
        self
    }

    /// Append an action plugin. Call in pipeline order.
    pub fn action(mut self, action: ActionPluginInfo) -> Self {
        self.actions.push(action);
        self
    }

    /// Append several action plugins in order.
    pub fn actions(mut self, actions: impl IntoIterator<Item = ActionPluginInfo>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Set the output plugin type.
    pub fn output(mut self, kind: impl Into<String>) -> Self {
        self.output = OutputPluginInfo::new(kind);
        self
    }

    /// Share an existing counter store.
    pub fn counters(mut self, counters: Arc<CounterStore>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Where the output's batcher payload comes from.
    pub fn output_observability(mut self, source: Arc<dyn OutputObservability>) -> Self {
        self.output_info = Some(source);
        self
    }

    /// Where the pipeline's absolute throughput counters come from.
    pub fn pipeline_counters(mut self, source: Arc<dyn PipelineCounters>) -> Self {
        self.totals = Some(source);
        self
    }

    /// Replace the log-change aggregator.
    pub fn log_changes(mut self, aggregator: Box<dyn LogChangeAggregator>) -> Self {
        self.log_changes = Some(aggregator);
        self
    }

    /// Build the board.
    pub fn build(self) -> Board {
        Board {
            input: self.input,
            actions: self.actions,
            output: self.output,
            counters: self.counters.unwrap_or_default(),
            output_info: self.output_info.unwrap_or_else(|| Arc::new(NoBatcher)),
            totals: self.totals,
            window: Mutex::new(ReportWindow {
                trackers: PipelineDeltaTrackers::new(),
                log_changes: self
                    .log_changes
                    .unwrap_or_else(|| Box::new(IntervalLogChanges::new())),
            }),
        }
    }
}
