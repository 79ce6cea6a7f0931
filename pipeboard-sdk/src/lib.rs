//! # pipeboard-sdk
//!
//! Live observability board for a streaming pipeline.
//!
//! Pipeline workers bump lock-free counters; on every request the [`Board`]
//! reads them into one [`BoardSnapshot`] and hands it to a presentation
//! adapter: JSON for machines, an HTML dashboard for humans.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pipeboard_sdk::{
//!     ActionPluginInfo, BatcherStats, Board, BoardServer, CounterStore, EventStatus,
//!     ServerConfig, ThroughputCounters,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let counters = Arc::new(CounterStore::new());
//!     let throughput = Arc::new(ThroughputCounters::new());
//!     let batcher = Arc::new(BatcherStats::new());
//!
//!     let board = Board::builder()
//!         .input("file")
//!         .action(ActionPluginInfo::new("geoip").with_metric("geoip"))
//!         .output("kafka")
//!         .counters(counters.clone())
//!         .pipeline_counters(throughput.clone())
//!         .output_observability(batcher.clone())
//!         .build();
//!
//!     // Hand these to the pipeline workers
//!     let geoip = counters.register("geoip");
//!     geoip.increment(EventStatus::Received);
//!     throughput.record_input(1, 128);
//!     batcher.record_commit(Duration::from_millis(300));
//!
//!     BoardServer::new(ServerConfig::default(), Arc::new(board))
//!         .run()
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Consistency
//!
//! Each counter read is atomic, but a snapshot reads many counters without
//! a common lock. Counts from different plugins may be a few events apart.

mod batcher;
mod board;
mod delta;
mod error;
mod handle;
mod pipeline;
mod render;
mod store;

#[cfg(feature = "server")]
mod server;

pub use batcher::{reduce, reduce_with, BatcherReport, BatcherStats};
pub use board::{Board, BoardBuilder};
pub use delta::{DeltaTracker, PipelineDeltaTrackers};
pub use error::BoardError;
pub use handle::MetricHandle;
pub use pipeline::{
    ActionPluginInfo, InputPluginInfo, IntervalLogChanges, LogChangeAggregator, NoBatcher,
    OutputObservability, OutputPluginInfo, PipelineCounters, ThroughputCounters,
};
pub use render::{
    render_dashboard, render_json, render_or_report, EmbeddedTemplate, ErrorPolicy, FileTemplate,
    Rendered, Surface, TemplateSource, DEFAULT_TEMPLATE, INDEX_HELPER,
};
pub use store::{CounterStore, MetricCounters};

#[cfg(feature = "server")]
pub use server::{BoardServer, ServerConfig, ServerConfigBuilder};

// Re-export types for convenience
pub use pipeboard_types::{
    ActionReport, ActionStatus, BatcherCounter, BatcherInformation, BoardSnapshot, EventStatus,
    InReport, LogChanges, ObservabilityInfo, OutReport, PipelineDeltas, PipelineTotals,
    WaitBucket, WaitTime,
};
