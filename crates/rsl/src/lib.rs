#![forbid(unsafe_code)]

//! Deep reactive state trees.
//!
//! Wrap a nested value tree once, then read and write it through
//! [`Reactive`] wrappers: every write, at any depth, is applied to the shared
//! tree, optionally recorded in a mutation history, and reported to a single
//! observer before the write returns.
//!
//! - [`create_reactive`] / [`ReactiveHandle::builder`]: create a root.
//! - [`Reactive::get`] / [`Reactive::set`]: intercepted reads and writes.
//!   Nested objects become reactive only when read.
//! - [`ReactiveHandle::state_history`]: point-in-time copy of the log.
//!
//! State is single-threaded (`Rc`/`RefCell`); handles and wrappers are
//! neither `Send` nor `Sync`.

pub mod clock;
pub mod config;
pub mod error;
pub mod handle;
pub mod history;
pub mod reactive;
pub mod value;

pub use clock::{Clock, LabClock, Timestamp};
pub use config::{PathScheme, ReactiveConfig};
pub use error::{ConfigError, InvalidArgument, ObserverError, ObserverResult, ReactiveError};
pub use handle::{ReactiveBuilder, ReactiveHandle, create_reactive};
pub use history::{MutationLog, MutationLogEntry};
pub use reactive::{Field, Reactive};
pub use value::{MAX_ARRAY_GAP, Node, Put, Value, ValueKind};
