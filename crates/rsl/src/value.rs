#![forbid(unsafe_code)]

//! Shared state trees.
//!
//! A state tree is made of [`Value`]s. Leaves are primitives (null, bool,
//! number, string); interior values are [`Node`]s, shared handles over a
//! string-keyed map or an index-addressed list.
//!
//! # Sharing
//!
//! Cloning a [`Node`] (or a `Value` holding one) clones the handle, never the
//! data. Every holder of the same node observes every mutation made through
//! any other holder, including mutations made through a
//! [`Reactive`](crate::Reactive) wrapper.
//!
//! # Invariants
//!
//! 1. A `Node` never changes shape: a map stays a map, a list stays a list.
//! 2. Map keys iterate in sorted order.
//! 3. Writing a list index at or past the end grows the list, filling any gap
//!    with [`Value::Null`].
//!
//! # Failure Modes
//!
//! - **Cycles**: storing a node inside itself is allowed (the tree becomes a
//!   graph) but leaks the cycle and makes `Debug`, `PartialEq` and
//!   serialization recurse without bound.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Coarse classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl ValueKind {
    /// Whether values of this kind can be wrapped reactively.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    /// Lowercase name used in error messages and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value in a state tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A shared object or array node.
    Node(Node),
}

impl Value {
    /// Build an object value from key/value pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Node(Node::object(entries))
    }

    /// Build an array value from items.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Node(Node::array(items))
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Node(node) => node.kind(),
        }
    }

    /// Whether this value is an object or array (eligible for wrapping).
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as an integer, if it has no fractional part.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => fmt_number(*n, f),
            Self::String(s) => f.write_str(s),
            Self::Node(node) => fmt::Display::fmt(node, f),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(f64::from(n))
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, u8, u16, u32, f32, f64);

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Self::array(items)
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::object(map)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum NodeData {
    Map(BTreeMap<String, Value>),
    List(Vec<Value>),
}

/// Outcome of a raw write on a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Put {
    /// The value was stored. Carries the previous value, if any.
    Stored(Option<Value>),
    /// The property is not addressable on this node: a non-index key on a
    /// list, or an index more than [`MAX_ARRAY_GAP`] past its end. Nothing
    /// was stored.
    Unaddressable,
}

/// A shared, mutable object or array.
///
/// Cloning a `Node` creates a new handle to the **same** data.
#[derive(Clone)]
pub struct Node {
    inner: Rc<RefCell<NodeData>>,
}

impl Node {
    /// An empty object node.
    #[must_use]
    pub fn new_object() -> Self {
        Self::from_data(NodeData::Map(BTreeMap::new()))
    }

    /// An empty array node.
    #[must_use]
    pub fn new_array() -> Self {
        Self::from_data(NodeData::List(Vec::new()))
    }

    /// An object node holding `entries`.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_data(NodeData::Map(map))
    }

    /// An array node holding `items`.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::from_data(NodeData::List(items.into_iter().map(Into::into).collect()))
    }

    fn from_data(data: NodeData) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// [`ValueKind::Object`] or [`ValueKind::Array`].
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match &*self.inner.borrow() {
            NodeData::Map(_) => ValueKind::Object,
            NodeData::List(_) => ValueKind::Array,
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == ValueKind::Array
    }

    /// Whether both handles point at the same underlying data.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Read a property. Lists are addressed by decimal index.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<Value> {
        match &*self.inner.borrow() {
            NodeData::Map(map) => map.get(property).cloned(),
            NodeData::List(items) => parse_index(property).and_then(|i| items.get(i).cloned()),
        }
    }

    /// Write a property, returning what was there before.
    pub fn put(&self, property: &str, value: Value) -> Put {
        match &mut *self.inner.borrow_mut() {
            NodeData::Map(map) => Put::Stored(map.insert(property.to_owned(), value)),
            NodeData::List(items) => {
                let Some(index) = parse_index(property) else {
                    return Put::Unaddressable;
                };
                if index < items.len() {
                    Put::Stored(Some(std::mem::replace(&mut items[index], value)))
                } else if index - items.len() > MAX_ARRAY_GAP {
                    Put::Unaddressable
                } else {
                    items.resize(index, Value::Null);
                    items.push(value);
                    Put::Stored(None)
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        match &*self.inner.borrow() {
            NodeData::Map(map) => map.contains_key(property),
            NodeData::List(items) => parse_index(property).is_some_and(|i| i < items.len()),
        }
    }

    /// Property names: map keys in sorted order, or list indices.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match &*self.inner.borrow() {
            NodeData::Map(map) => map.keys().cloned().collect(),
            NodeData::List(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &*self.inner.borrow() {
            NodeData::Map(map) => map.len(),
            NodeData::List(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Largest run of `Null` holes a single list write may create.
pub const MAX_ARRAY_GAP: usize = 1 << 16;

/// Canonical decimal index: no sign, no leading zeros (except `"0"`).
fn parse_index(property: &str) -> Option<usize> {
    if property.is_empty() || (property.len() > 1 && property.starts_with('0')) {
        return None;
    }
    if !property.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    property.parse().ok()
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner.borrow() {
            NodeData::Map(map) => f.debug_map().entries(map.iter()).finish(),
            NodeData::List(items) => f.debug_list().entries(items.iter()).finish(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner.borrow() {
            NodeData::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            NodeData::List(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON interop
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
mod json {
    use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::{Node, NodeData, Value};

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Number(n) => {
                    if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.007_199_254_740_992e15 {
                        serializer.serialize_i64(*n as i64)
                    } else {
                        serializer.serialize_f64(*n)
                    }
                }
                Self::String(s) => serializer.serialize_str(s),
                Self::Node(node) => node.serialize(serializer),
            }
        }
    }

    impl Serialize for Node {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match &*self.inner.borrow() {
                NodeData::Map(map) => {
                    let mut out = serializer.serialize_map(Some(map.len()))?;
                    for (k, v) in map {
                        out.serialize_entry(k, v)?;
                    }
                    out.end()
                }
                NodeData::List(items) => {
                    let mut out = serializer.serialize_seq(Some(items.len()))?;
                    for v in items {
                        out.serialize_element(v)?;
                    }
                    out.end()
                }
            }
        }
    }

    impl From<serde_json::Value> for Value {
        fn from(json: serde_json::Value) -> Self {
            match json {
                serde_json::Value::Null => Self::Null,
                serde_json::Value::Bool(b) => Self::Bool(b),
                serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
                serde_json::Value::String(s) => Self::String(s),
                serde_json::Value::Array(items) => Self::array(items),
                serde_json::Value::Object(map) => Self::object(map),
            }
        }
    }

    impl From<&Value> for serde_json::Value {
        fn from(value: &Value) -> Self {
            serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
        }
    }
}
