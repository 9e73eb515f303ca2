#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

use super::Field;
use crate::config::ReactiveConfig;
use crate::error::ObserverResult;
use crate::history::MutationLog;
use crate::value::{Node, Put, Value, ValueKind};

/// Observer callback: `(property, new_value)`.
pub(crate) type ObserverFn = Rc<dyn Fn(&str, &Value) -> ObserverResult>;

/// State shared by every wrapper derived from one root.
pub(crate) struct Context {
    pub(crate) observer: ObserverFn,
    pub(crate) history: Option<MutationLog>,
    pub(crate) config: ReactiveConfig,
}

/// Interception layer over one node of a state tree.
///
/// Cloning a `Reactive` creates another wrapper over the **same** node,
/// observer and history.
///
/// # Invariants
///
/// 1. Reads and writes always go to the wrapped node; the wrapper holds no
///    copy of its data.
/// 2. `path` is the chain of property names from the root to this node;
///    empty for the root wrapper.
#[derive(Clone)]
pub struct Reactive {
    node: Node,
    ctx: Rc<Context>,
    path: Vec<String>,
}

impl Reactive {
    pub(crate) fn root(node: Node, ctx: Rc<Context>) -> Self {
        Self {
            node,
            ctx,
            path: Vec::new(),
        }
    }

    fn wrap_child(&self, property: &str, node: Node) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend(self.path.iter().cloned());
        path.push(property.to_owned());
        Self {
            node,
            ctx: Rc::clone(&self.ctx),
            path,
        }
    }

    /// Read a property.
    ///
    /// Nested objects and arrays come back wrapped, so writes through the
    /// result are intercepted too. Each call builds a fresh wrapper.
    #[must_use]
    pub fn get(&self, property: &str) -> Field {
        match self.node.get(property) {
            None => Field::Missing,
            Some(Value::Node(node)) => Field::Reactive(self.wrap_child(property, node)),
            Some(value) => Field::Value(value),
        }
    }

    /// Read a nested object or array, wrapped.
    ///
    /// Returns `None` if the property is missing or primitive.
    #[must_use]
    pub fn child(&self, property: &str) -> Option<Self> {
        self.get(property).into_reactive()
    }

    /// Write a property, record it, and notify the observer.
    ///
    /// # Errors
    ///
    /// Returns the observer's error unchanged. The write has been applied
    /// and recorded by then.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> ObserverResult {
        let value = value.into();
        let old_value = match self.node.put(property, value.clone()) {
            Put::Stored(old) => old,
            Put::Unaddressable => {
                tracing::warn!(
                    message = "reactive.set.unaddressable",
                    property,
                    kind = self.node.kind().as_str()
                );
                None
            }
        };
        let qualified = self.ctx.config.path_scheme.qualify(&self.path, property);
        tracing::trace!(
            message = "reactive.set",
            property,
            qualified = qualified.as_str(),
            depth = self.path.len()
        );

        if let Some(log) = &self.ctx.history {
            let sequence = log.append(qualified, old_value, value.clone());
            tracing::trace!(message = "reactive.history.append", sequence);
        }

        (self.ctx.observer)(property, &value)
    }

    /// Read-modify-write: `f` receives the current field and returns the
    /// value to store. Exactly one write and one notification.
    ///
    /// # Errors
    ///
    /// Returns the observer's error, as [`set`](Self::set) does.
    pub fn update<V: Into<Value>>(
        &self,
        property: &str,
        f: impl FnOnce(Field) -> V,
    ) -> ObserverResult {
        let next = f(self.get(property));
        self.set(property, next)
    }

    /// Property names of the wrapped node.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.node.keys()
    }

    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.node.contains(property)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.node.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.node.kind()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of property hops from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Property names from the root to this node.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The wrapped node. Writes made directly on it bypass interception.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Whether two wrappers wrap the same underlying node.
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }

    /// JSON copy of the wrapped subtree.
    #[cfg(feature = "serde")]
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(&Value::Node(self.node.clone()))
    }
}

impl fmt::Debug for Reactive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("path", &self.path)
            .field("node", &self.node)
            .finish()
    }
}
