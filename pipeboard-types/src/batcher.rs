//! Batcher observability payloads.

use alloc::collections::BTreeMap;

use crate::WaitTime;

/// What an output plugin exposes about its batcher.
///
/// `committed_counters` maps a bucket threshold (seconds) to the number of
/// batches committed in that bucket. It is `None` when the output has no
/// batcher or has not committed anything yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatcherInformation {
    #[cfg_attr(feature = "serde", serde(default))]
    pub committed_counters: Option<BTreeMap<u64, u64>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_wait: WaitTime,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_wait: WaitTime,
}

/// Observability payload of an output plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservabilityInfo {
    pub batcher_information: BatcherInformation,
}

/// One dense histogram row: batches committed within `seconds` of waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatcherCounter {
    pub seconds: u64,
    pub batches_committed: u64,
}

impl BatcherCounter {
    pub const fn new(seconds: u64, batches_committed: u64) -> Self {
        Self {
            seconds,
            batches_committed,
        }
    }
}
