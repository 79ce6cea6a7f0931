//! Pipeline-level throughput totals and their per-interval deltas.

/// Absolute, monotonically increasing pipeline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineTotals {
    pub input_events: u64,
    pub input_bytes: u64,
    pub output_events: u64,
    pub output_bytes: u64,
    pub read_ops: u64,
}

/// Change of each [`PipelineTotals`] field since the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineDeltas {
    pub input_events: u64,
    pub input_bytes: u64,
    pub output_events: u64,
    pub output_bytes: u64,
    pub read_ops: u64,
}

impl PipelineDeltas {
    /// True when nothing moved during the interval.
    pub fn is_idle(&self) -> bool {
        *self == PipelineDeltas::default()
    }
}

/// Summary of how the pipeline's log flow changed over one reporting interval.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogChanges {
    /// Length of the interval the deltas cover.
    pub interval_ms: u64,
    pub in_events: u64,
    pub in_bytes: u64,
    pub out_events: u64,
    pub out_bytes: u64,
    pub reads: u64,
    pub in_events_per_sec: f64,
    pub out_events_per_sec: f64,
    pub in_bytes_per_sec: f64,
    pub out_bytes_per_sec: f64,
}

impl LogChanges {
    /// Build a summary from deltas observed over `interval_ms` milliseconds.
    ///
    /// Rates are zero for an empty interval.
    pub fn from_deltas(deltas: &PipelineDeltas, interval_ms: u64) -> Self {
        let rate = |v: u64| {
            if interval_ms == 0 {
                0.0
            } else {
                v as f64 * 1000.0 / interval_ms as f64
            }
        };

        Self {
            interval_ms,
            in_events: deltas.input_events,
            in_bytes: deltas.input_bytes,
            out_events: deltas.output_events,
            out_bytes: deltas.output_bytes,
            reads: deltas.read_ops,
            in_events_per_sec: rate(deltas.input_events),
            out_events_per_sec: rate(deltas.output_events),
            in_bytes_per_sec: rate(deltas.input_bytes),
            out_bytes_per_sec: rate(deltas.output_bytes),
        }
    }
}
