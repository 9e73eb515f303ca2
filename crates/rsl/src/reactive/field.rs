#![forbid(unsafe_code)]

use std::fmt;

use super::Reactive;
use crate::value::Value;

/// Result of reading a property through a [`Reactive`] wrapper.
#[derive(Clone)]
pub enum Field {
    /// The property does not exist.
    Missing,
    /// A primitive (or null), returned as-is.
    Value(Value),
    /// A structured value, wrapped so further access is intercepted.
    Reactive(Reactive),
}

impl Field {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The primitive value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn as_reactive(&self) -> Option<&Reactive> {
        match self {
            Self::Reactive(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_reactive(self) -> Option<Reactive> {
        match self {
            Self::Reactive(r) => Some(r),
            _ => None,
        }
    }

    /// The underlying value. A wrapped node comes back as a handle to the
    /// same shared node, not a copy.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Missing => None,
            Self::Value(v) => Some(v),
            Self::Reactive(r) => Some(Value::Node(r.node().clone())),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Reactive(r) => f.debug_tuple("Reactive").field(r.node()).finish(),
        }
    }
}

impl PartialEq<Value> for Field {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Missing, _) => false,
            (Self::Value(v), other) => v == other,
            (Self::Reactive(r), Value::Node(node)) => r.node() == node,
            (Self::Reactive(_), _) => false,
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Missing, Self::Missing) => true,
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Reactive(a), Self::Reactive(b)) => a.node() == b.node(),
            _ => false,
        }
    }
}
