#![forbid(unsafe_code)]

//! E2E tests for JSON interop and history export.
//!
//! Validates that:
//! 1. A state tree built from JSON behaves like one built in code.
//! 2. `history_jsonl` emits one valid JSON object per write with the
//!    required fields.
//! 3. `to_json` reflects writes made at any depth.
//! 4. Config documents load with defaults for missing fields.

use rsl::{LabClock, PathScheme, ReactiveConfig, ReactiveHandle, Value};
use web_time::Duration;

fn user_state() -> Value {
    Value::from(serde_json::json!({
        "user": {"name": "Alice", "age": 25, "tags": ["admin"]},
        "count": 0
    }))
}

#[test]
fn history_jsonl_has_required_fields() {
    let clock = LabClock::new(1_700_000_000_000);
    let h = ReactiveHandle::builder(user_state())
        .observer(|_, _| {})
        .clock(clock.clone())
        .build()
        .expect("object state");

    let user = h.proxy().child("user").expect("user");
    user.set("name", "Bob").expect("observer ok");
    clock.advance(Duration::from_millis(3));
    user.update("age", |v| v.as_f64().unwrap_or(0.0) + 1.0)
        .expect("observer ok");
    h.proxy().set("count", 1).expect("observer ok");

    let jsonl = h.history_jsonl().expect("serializable");
    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(lines.len(), 3);

    for (i, line) in lines.iter().enumerate() {
        let parsed: serde_json::Value =
            serde_json::from_str(line).unwrap_or_else(|_| panic!("line {i} is not valid JSON"));
        for field in ["property", "old_value", "new_value", "timestamp", "sequence"] {
            assert!(parsed.get(field).is_some(), "line {i} missing {field}");
        }
        assert_eq!(parsed["sequence"], i);
    }

    let second: serde_json::Value = serde_json::from_str(lines[1]).expect("valid JSON");
    assert_eq!(second["property"], "nested.age");
    assert_eq!(second["old_value"], 25);
    assert_eq!(second["new_value"], 26);
    assert_eq!(second["timestamp"], 1_700_000_000_003u64);

    let third: serde_json::Value = serde_json::from_str(lines[2]).expect("valid JSON");
    assert_eq!(third["property"], "count");
}

#[test]
fn to_json_reflects_nested_writes() {
    let h = ReactiveHandle::builder(user_state())
        .observer(|_, _| {})
        .build()
        .expect("object state");

    let tags = h
        .proxy()
        .child("user")
        .and_then(|u| u.child("tags"))
        .expect("tags array");
    tags.set("1", "editor").expect("observer ok");

    assert_eq!(
        h.proxy().to_json(),
        serde_json::json!({
            "user": {"name": "Alice", "age": 25, "tags": ["admin", "editor"]},
            "count": 0
        })
    );
}

#[test]
fn disabled_history_exports_nothing() {
    let h = ReactiveHandle::builder(user_state())
        .observer(|_, _| {})
        .config(ReactiveConfig::default().with_history(false))
        .build()
        .expect("object state");
    h.proxy().set("count", 5).expect("observer ok");
    assert_eq!(h.history_jsonl().expect("serializable"), "");
}

#[test]
fn full_paths_from_json_config() {
    let config = ReactiveConfig::from_json_str(r#"{"path_scheme": "full"}"#).expect("valid");
    assert_eq!(config.path_scheme, PathScheme::Full);

    let h = ReactiveHandle::builder(user_state())
        .observer(|_, _| {})
        .config(config)
        .build()
        .expect("object state");
    h.proxy()
        .child("user")
        .and_then(|u| u.child("tags"))
        .expect("tags")
        .set("0", "owner")
        .expect("observer ok");

    let history = h.state_history().expect("tracked");
    assert_eq!(history[0].property, "user.tags.0");
}
