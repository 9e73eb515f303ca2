#![forbid(unsafe_code)]

//! Mutation recorder.
//!
//! One [`MutationLog`] exists per reactive root. Every wrapper derived from
//! that root appends to it before the observer runs.
//!
//! # Invariants
//!
//! 1. Entries are appended in write order and never removed or reordered.
//! 2. `sequence` starts at 0 and increments by exactly 1 per entry.
//! 3. Timestamps never decrease across entries, even if the wall clock steps
//!    backwards.
//! 4. [`MutationLog::snapshot`] returns an independent copy; later writes do
//!    not change it.

use std::cell::RefCell;

use crate::clock::{Clock, Timestamp};
use crate::value::Value;

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MutationLogEntry {
    /// Qualified path of the written property.
    pub property: String,
    /// Value before the write; `None` if the property was absent.
    pub old_value: Option<Value>,
    /// Value written.
    pub new_value: Value,
    /// When the write happened.
    pub timestamp: Timestamp,
    /// Position in the log.
    pub sequence: u64,
}

/// Append-only, write-ordered log shared by every wrapper of one root.
#[derive(Debug)]
pub struct MutationLog {
    entries: RefCell<Vec<MutationLogEntry>>,
    clock: Clock,
}

impl MutationLog {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            clock,
        }
    }

    /// Record a write and return its sequence number.
    pub fn append(&self, property: String, old_value: Option<Value>, new_value: Value) -> u64 {
        let mut entries = self.entries.borrow_mut();
        let sequence = entries.len() as u64;
        let now = self.clock.now();
        let timestamp = entries.last().map_or(now, |last| last.timestamp.max(now));
        entries.push(MutationLogEntry {
            property,
            old_value,
            new_value,
            timestamp,
            sequence,
        });
        sequence
    }

    /// Copy of every entry recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MutationLogEntry> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Render entries as JSON lines, one entry per line.
///
/// # Errors
///
/// Returns an error if an entry fails to serialize.
#[cfg(feature = "serde")]
pub fn to_jsonl(entries: &[MutationLogEntry]) -> serde_json::Result<String> {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    Ok(out)
}
