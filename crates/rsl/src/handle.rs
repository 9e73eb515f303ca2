#![forbid(unsafe_code)]

//! Reactive state roots.
//!
//! [`create_reactive`] is the one-call entry point. [`ReactiveHandle::builder`]
//! exposes the same construction with a config, a custom clock, or a fallible
//! observer.
//!
//! # Usage
//!
//! ```
//! use rsl::{Value, create_reactive};
//!
//! let state = create_reactive(
//!     Value::object([("user", Value::object([("name", "Alice")]))]),
//!     |property, value| println!("{property} updated to: {value}"),
//! )?;
//!
//! let user = state.proxy().child("user").expect("user object");
//! user.set("name", "Bob")?;
//!
//! let history = state.state_history().expect("history enabled by default");
//! assert_eq!(history[0].property, "nested.name");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::rc::Rc;

use crate::clock::Clock;
use crate::config::ReactiveConfig;
use crate::error::{InvalidArgument, ObserverResult, ReactiveError};
use crate::history::{MutationLog, MutationLogEntry};
use crate::reactive::{Context, ObserverFn, Reactive};
use crate::value::Value;

/// Create reactive state over `initial_state`, notifying `on_change` on every
/// write anywhere in the tree.
///
/// History tracking follows [`ReactiveConfig::default`].
///
/// # Errors
///
/// Returns [`InvalidArgument::NonObjectState`] if `initial_state` is null or
/// a primitive.
pub fn create_reactive(
    initial_state: impl Into<Value>,
    on_change: impl Fn(&str, &Value) + 'static,
) -> Result<ReactiveHandle, ReactiveError> {
    ReactiveHandle::builder(initial_state)
        .observer(on_change)
        .build()
}

/// A reactive root: the root wrapper plus access to its mutation history.
///
/// Cloning a handle shares the same tree, observer and history.
#[derive(Clone)]
pub struct ReactiveHandle {
    root: Reactive,
    ctx: Rc<Context>,
}

impl ReactiveHandle {
    /// Start building a reactive root over `initial_state`.
    pub fn builder(initial_state: impl Into<Value>) -> ReactiveBuilder {
        ReactiveBuilder {
            initial_state: initial_state.into(),
            observer: None,
            config: ReactiveConfig::default(),
            clock: Clock::default(),
        }
    }

    /// The root wrapper.
    #[must_use]
    pub fn proxy(&self) -> Reactive {
        self.root.clone()
    }

    /// Borrow the root wrapper without cloning.
    #[must_use]
    pub fn root(&self) -> &Reactive {
        &self.root
    }

    /// Copy of the mutation log, or `None` when history tracking is off.
    #[must_use]
    pub fn state_history(&self) -> Option<Vec<MutationLogEntry>> {
        self.ctx.history.as_ref().map(MutationLog::snapshot)
    }

    /// Number of recorded writes, or `None` when history tracking is off.
    #[must_use]
    pub fn history_len(&self) -> Option<usize> {
        self.ctx.history.as_ref().map(MutationLog::len)
    }

    #[must_use]
    pub fn config(&self) -> ReactiveConfig {
        self.ctx.config
    }

    /// The current history as JSON lines. Empty when history tracking is off.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry fails to serialize.
    #[cfg(feature = "serde")]
    pub fn history_jsonl(&self) -> serde_json::Result<String> {
        match &self.ctx.history {
            Some(log) => crate::history::to_jsonl(&log.snapshot()),
            None => Ok(String::new()),
        }
    }
}

impl fmt::Debug for ReactiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveHandle")
            .field("root", &self.root.node())
            .field("config", &self.ctx.config)
            .field("history_len", &self.history_len())
            .finish()
    }
}

/// Builder for [`ReactiveHandle`].
#[must_use]
pub struct ReactiveBuilder {
    initial_state: Value,
    observer: Option<ObserverFn>,
    config: ReactiveConfig,
    clock: Clock,
}

impl ReactiveBuilder {
    /// Observer called as `(property, new_value)` after every write.
    pub fn observer(mut self, on_change: impl Fn(&str, &Value) + 'static) -> Self {
        self.observer = Some(Rc::new(move |property: &str, value: &Value| {
            on_change(property, value);
            Ok(())
        }));
        self
    }

    /// Observer that may fail. Its error is returned from the write that
    /// triggered it.
    pub fn fallible_observer(
        mut self,
        on_change: impl Fn(&str, &Value) -> ObserverResult + 'static,
    ) -> Self {
        self.observer = Some(Rc::new(on_change));
        self
    }

    pub fn config(mut self, config: ReactiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Timestamp source for history entries.
    pub fn clock(mut self, clock: impl Into<Clock>) -> Self {
        self.clock = clock.into();
        self
    }

    /// Validate inputs and create the root.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgument::NonObjectState`] if the initial state is null or
    ///   a primitive.
    /// - [`InvalidArgument::NonCallableObserver`] if no observer was set.
    pub fn build(self) -> Result<ReactiveHandle, ReactiveError> {
        let node = match self.initial_state {
            Value::Node(node) => node,
            other => {
                let found = other.kind();
                tracing::warn!(message = "reactive.create.rejected", found = found.as_str());
                return Err(InvalidArgument::NonObjectState { found }.into());
            }
        };
        let Some(observer) = self.observer else {
            tracing::warn!(message = "reactive.create.rejected", reason = "no observer");
            return Err(InvalidArgument::NonCallableObserver.into());
        };

        tracing::debug!(
            message = "reactive.create",
            root_kind = node.kind().as_str(),
            track_history = self.config.track_history
        );

        let ctx = Rc::new(Context {
            observer,
            history: self
                .config
                .track_history
                .then(|| MutationLog::new(self.clock)),
            config: self.config,
        });
        Ok(ReactiveHandle {
            root: Reactive::root(node, Rc::clone(&ctx)),
            ctx,
        })
    }
}

impl fmt::Debug for ReactiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveBuilder")
            .field("initial_state", &self.initial_state)
            .field("has_observer", &self.observer.is_some())
            .field("config", &self.config)
            .finish()
    }
}
