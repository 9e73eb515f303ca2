#![forbid(unsafe_code)]

//! Timestamp source for mutation history.
//!
//! Production code stamps entries with wall-clock time from `web_time`.
//! Tests use a [`LabClock`] to get reproducible timestamps.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use web_time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(u64);

impl Timestamp {
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A manually-advanceable clock for deterministic tests.
///
/// All clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct LabClock {
    now_ms: Rc<Cell<u64>>,
}

impl LabClock {
    /// Create a lab clock reading `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let ms = delta.as_millis().min(u128::from(u64::MAX)) as u64;
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        Timestamp(self.now_ms.get())
    }
}

/// Where timestamps come from.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    /// Real wall-clock time.
    #[default]
    System,
    /// Deterministic lab clock.
    Lab(LabClock),
}

impl Clock {
    #[must_use]
    pub fn now(&self) -> Timestamp {
        match self {
            Self::System => {
                // Clock set before 1970: report the epoch rather than fail.
                let ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0, |d| d.as_millis().min(u128::from(u64::MAX)) as u64);
                Timestamp(ms)
            }
            Self::Lab(clock) => clock.now(),
        }
    }
}

impl From<LabClock> for Clock {
    fn from(clock: LabClock) -> Self {
        Self::Lab(clock)
    }
}
