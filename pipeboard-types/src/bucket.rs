//! Wait-time buckets for the output batcher histogram.

/// Upper bound (in seconds) of a batch-commit wait bucket.
///
/// A batch lands in the smallest bucket whose threshold is not below its
/// wait. The last bucket also takes every longer wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WaitBucket {
    Immediate,
    OneSecond,
    TwoSeconds,
    FiveSeconds,
    TenSeconds,
    ThirtySeconds,
    OneMinute,
}

impl WaitBucket {
    /// Every bucket in report order.
    pub const ALL: [WaitBucket; 7] = [
        WaitBucket::Immediate,
        WaitBucket::OneSecond,
        WaitBucket::TwoSeconds,
        WaitBucket::FiveSeconds,
        WaitBucket::TenSeconds,
        WaitBucket::ThirtySeconds,
        WaitBucket::OneMinute,
    ];

    /// Threshold in seconds.
    pub const fn seconds(&self) -> u64 {
        match self {
            WaitBucket::Immediate => 0,
            WaitBucket::OneSecond => 1,
            WaitBucket::TwoSeconds => 2,
            WaitBucket::FiveSeconds => 5,
            WaitBucket::TenSeconds => 10,
            WaitBucket::ThirtySeconds => 30,
            WaitBucket::OneMinute => 60,
        }
    }

    /// Position in [`WaitBucket::ALL`].
    pub const fn position(&self) -> usize {
        *self as usize
    }

    /// Bucket for a wait of `secs` whole seconds.
    pub fn for_wait_secs(secs: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| secs <= b.seconds())
            .unwrap_or(WaitBucket::OneMinute)
    }

    /// Thresholds of every bucket, in report order.
    pub fn thresholds() -> [u64; 7] {
        Self::ALL.map(|b| b.seconds())
    }
}
