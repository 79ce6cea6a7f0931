//! Batcher wait durations.
//!
//! Waits are carried as whole microseconds so the JSON encoding stays an
//! integer regardless of the consumer's language.

use core::time::Duration;

/// How long a batch waited before it was committed, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WaitTime(pub u64);

impl WaitTime {
    /// Zero wait.
    pub const ZERO: WaitTime = WaitTime(0);

    /// Create from microseconds.
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Create from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis * 1000)
    }

    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Milliseconds, truncated.
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1000
    }

    /// Whole seconds, truncated.
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }
}

impl From<Duration> for WaitTime {
    fn from(d: Duration) -> Self {
        // Saturate instead of wrapping for absurdly long waits.
        Self(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
    }
}

impl From<WaitTime> for Duration {
    fn from(w: WaitTime) -> Self {
        Duration::from_micros(w.0)
    }
}

impl core::fmt::Display for WaitTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let micros = self.0;
        if micros >= 1_000_000 {
            write!(f, "{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1000)
        } else if micros >= 1000 {
            write!(f, "{}ms", micros / 1000)
        } else {
            write!(f, "{}us", micros)
        }
    }
}
