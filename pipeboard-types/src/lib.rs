//! # pipeboard-types
//!
//! Snapshot types for the pipeline observability board. A [`BoardSnapshot`]
//! describes one pipeline at one point in time: which input feeds it, how
//! the output's batcher is committing, what each action plugin did with the
//! events it saw, and how the log flow changed since the last look.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON (or any serde format) encoding of snapshots
//!
//! ## Example
//!
//! ```rust
//! use pipeboard_types::{ActionReport, BoardSnapshot, EventStatus, OutReport, WaitBucket};
//!
//! let snapshot = BoardSnapshot::builder()
//!     .input("kafka")
//!     .output(OutReport::new("elasticsearch"))
//!     .action(ActionReport::tracked("throttle", "throttled", |s| {
//!         if s == EventStatus::Discarded { 42 } else { 0 }
//!     }))
//!     .build();
//!
//! assert_eq!(snapshot.actions[0].count(EventStatus::Discarded), Some(42));
//! assert_eq!(WaitBucket::ALL.len(), 7);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod batcher;
mod bucket;
mod changes;
mod duration;
mod snapshot;
mod status;

pub use batcher::*;
pub use bucket::*;
pub use changes::*;
pub use duration::*;
pub use snapshot::*;
pub use status::*;
