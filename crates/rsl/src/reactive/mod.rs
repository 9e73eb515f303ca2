#![forbid(unsafe_code)]

//! Reactive wrappers over shared state trees.
//!
//! - [`Reactive`]: an interception layer over one [`Node`](crate::Node).
//!   Reads lazily wrap nested nodes; writes mutate, record, then notify.
//! - [`Field`]: the result of a read: missing, a primitive, or a nested
//!   wrapper.
//!
//! # Architecture
//!
//! Every wrapper holds a handle to its node plus an `Rc` to the root's
//! shared context (observer, optional mutation log, path scheme). Reading a
//! nested node builds a fresh wrapper over the same node and context; no
//! wrapper is cached, and wrapper identity never affects behavior.
//!
//! # Invariants
//!
//! 1. A write runs read-old → assign → append → notify, in that order,
//!    before returning.
//! 2. The observer receives the unqualified property name and the value
//!    written.
//! 3. No node or log borrow is held while the observer runs, so observers
//!    may read or write the same tree.
//! 4. Every write notifies, even when the new value equals the old one.
//!
//! # Failure Modes
//!
//! - Observer returns an error: handed back by `set`; the write stays
//!   applied and recorded.
//! - Observer panics: unwinds through `set`, same guarantees.

mod field;
mod proxy;

pub use field::Field;
pub use proxy::Reactive;

pub(crate) use proxy::{Context, ObserverFn};
