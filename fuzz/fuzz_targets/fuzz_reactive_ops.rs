#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rsl::{Field, MAX_ARRAY_GAP, Reactive, Value, create_reactive};

#[derive(Arbitrary, Debug)]
enum Leaf {
    Null,
    Bool(bool),
    Number(i32),
    Text(String),
}

impl From<Leaf> for Value {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Null => Value::Null,
            Leaf::Bool(b) => Value::from(b),
            Leaf::Number(n) => Value::from(n),
            Leaf::Text(s) => Value::from(s),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum Op {
    /// Descend into a child (or stay put if it is not structured).
    Enter(u8),
    /// Back to the root.
    Reset,
    Read(u8),
    Write(u8, Leaf),
    /// Replace a property with a fresh object.
    WriteObject(u8),
    /// Replace a property with a fresh array.
    WriteArray(u8),
    /// Write an arbitrary decimal index.
    WriteIndex(u64, Leaf),
}

/// Small key space so ops collide on the same properties.
fn key(k: u8) -> String {
    match k % 6 {
        0 => "a".into(),
        1 => "b".into(),
        2 => "c".into(),
        n => (n - 3).to_string(),
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let notified = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&notified);
    let Ok(handle) = create_reactive(
        Value::object([("a", Value::object([("b", Value::array([1, 2]))]))]),
        move |_, _| sink.set(sink.get() + 1),
    ) else {
        return;
    };

    let mut cursor: Reactive = handle.proxy();
    let mut writes = 0usize;
    for op in ops.into_iter().take(256) {
        match op {
            Op::Enter(k) => {
                if let Field::Reactive(child) = cursor.get(&key(k)) {
                    cursor = child;
                }
            }
            Op::Reset => cursor = handle.proxy(),
            Op::Read(k) => {
                let _ = cursor.get(&key(k));
            }
            Op::Write(k, leaf) => {
                let value = Value::from(leaf);
                let name = key(k);
                let _ = cursor.set(&name, value.clone());
                writes += 1;
                let addressable = !cursor.node().is_array() || name.parse::<usize>().is_ok();
                if addressable {
                    assert_eq!(cursor.get(&name), value);
                }
            }
            Op::WriteObject(k) => {
                let _ = cursor.set(&key(k), Value::object([("a", 0)]));
                writes += 1;
            }
            Op::WriteArray(k) => {
                let _ = cursor.set(&key(k), Value::array([0]));
                writes += 1;
            }
            Op::WriteIndex(index, leaf) => {
                let value = Value::from(leaf);
                let name = index.to_string();
                let len_before = cursor.len();
                let _ = cursor.set(&name, value.clone());
                writes += 1;
                if !cursor.node().is_array() {
                    assert_eq!(cursor.get(&name), value);
                } else if usize::try_from(index).is_ok_and(|i| i <= len_before + MAX_ARRAY_GAP) {
                    assert_eq!(cursor.get(&name), value);
                } else {
                    assert_eq!(cursor.len(), len_before);
                }
            }
        }
    }

    assert_eq!(notified.get(), writes);
    assert_eq!(handle.history_len(), Some(writes));
});
