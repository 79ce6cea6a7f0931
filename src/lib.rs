//! # pipeboard
//!
//! Runs a live observability board for a streaming pipeline.
//!
//! The binary wires [`pipeboard_sdk`] together: it loads [`Settings`],
//! installs logging, builds a [`Board`] over the configured pipeline and
//! serves it over HTTP. Until a real pipeline is attached, a
//! [`DemoPipeline`] keeps the counters moving.
//!
//! ```text
//!  demo workers ──▶ CounterStore / ThroughputCounters / BatcherStats
//!                                   │
//!                                   ▼
//!                      Board::snapshot() per request
//!                                   │
//!                  ┌────────────────┴───────────────┐
//!                  ▼                                ▼
//!        GET /pipeline/info.json          GET /pipeline/info
//! ```

pub mod demo;
pub mod logging;
pub mod settings;

use pipeboard_sdk::Board;

pub use demo::{DemoPipeline, DemoSinks};
pub use settings::{DemoSettings, PipelineSettings, Settings};

/// Build a board over the configured pipeline, reading from `sinks`.
pub fn build_board(pipeline: &PipelineSettings, sinks: &DemoSinks) -> Board {
    Board::builder()
        .input(pipeline.input.kind.clone())
        .actions(pipeline.actions.iter().cloned())
        .output(pipeline.output.kind.clone())
        .counters(sinks.counters.clone())
        .pipeline_counters(sinks.throughput.clone())
        .output_observability(sinks.batcher.clone())
        .build()
}
