//! Delta Tracker: turns absolute counters into "since last look" deltas.

use pipeboard_types::{PipelineDeltas, PipelineTotals};
use tracing::debug;

/// Remembers the last absolute value of one monotonic counter.
///
/// The first call measures against an implicit baseline of zero, so it
/// returns the absolute value itself. Owned by a single reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaTracker {
    last: u64,
}

impl DeltaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change since the previous call; the baseline moves to `absolute`.
    ///
    /// A counter that went backwards (its owner restarted) yields zero and
    /// re-baselines at the lower value.
    pub fn next(&mut self, absolute: u64) -> u64 {
        let delta = match absolute.checked_sub(self.last) {
            Some(delta) => delta,
            None => {
                debug!(
                    last = self.last,
                    current = absolute,
                    "counter regressed, re-baselining"
                );
                0
            }
        };
        self.last = absolute;
        delta
    }

    /// The last absolute value observed.
    pub fn last(&self) -> u64 {
        self.last
    }
}

/// One tracker per pipeline-level quantity.
#[derive(Debug, Clone, Default)]
pub struct PipelineDeltaTrackers {
    input_events: DeltaTracker,
    input_bytes: DeltaTracker,
    output_events: DeltaTracker,
    output_bytes: DeltaTracker,
    read_ops: DeltaTracker,
}

impl PipelineDeltaTrackers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every tracker to `totals`.
    pub fn next(&mut self, totals: &PipelineTotals) -> PipelineDeltas {
        PipelineDeltas {
            input_events: self.input_events.next(totals.input_events),
            input_bytes: self.input_bytes.next(totals.input_bytes),
            output_events: self.output_events.next(totals.output_events),
            output_bytes: self.output_bytes.next(totals.output_bytes),
            read_ops: self.read_ops.next(totals.read_ops),
        }
    }
}
