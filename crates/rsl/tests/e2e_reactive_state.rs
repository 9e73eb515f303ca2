#![forbid(unsafe_code)]

//! End-to-end scenarios for reactive state roots.
//!
//! Covers the counter, nested-user and action-logging flows an application
//! would drive, plus construction validation and history snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use rsl::{
    Field, InvalidArgument, Node, ObserverError, ReactiveConfig, ReactiveError, ReactiveHandle,
    Value, create_reactive,
};

// ============================================================================
// Helpers
// ============================================================================

type Calls = Rc<RefCell<Vec<(String, Value)>>>;

fn recorder() -> (Calls, impl Fn(&str, &Value) + 'static) {
    let calls: Calls = Rc::default();
    let sink = Rc::clone(&calls);
    (calls, move |prop: &str, value: &Value| {
        sink.borrow_mut().push((prop.to_owned(), value.clone()));
    })
}

fn increment(field: Field) -> f64 {
    field.as_f64().unwrap_or(0.0) + 1.0
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn counter_increments_notify_in_order() {
    let (calls, observer) = recorder();
    let h = create_reactive(Value::object([("count", 0)]), observer).expect("object state");

    for _ in 0..3 {
        h.proxy().update("count", increment).expect("observer ok");
    }

    assert_eq!(
        calls.borrow().as_slice(),
        &[
            ("count".to_owned(), Value::from(1)),
            ("count".to_owned(), Value::from(2)),
            ("count".to_owned(), Value::from(3)),
        ]
    );
    assert_eq!(h.proxy().get("count"), Value::from(3));
}

#[test]
fn nested_user_updates_are_recorded() {
    let (calls, observer) = recorder();
    let h = create_reactive(
        Value::object([(
            "user",
            Value::object([("name", Value::from("Alice")), ("age", Value::from(25))]),
        )]),
        observer,
    )
    .expect("object state");

    h.proxy()
        .child("user")
        .expect("user")
        .set("name", "Bob")
        .expect("observer ok");
    h.proxy()
        .child("user")
        .expect("user")
        .update("age", increment)
        .expect("observer ok");

    let history = h.state_history().expect("tracked by default");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].property, "nested.name");
    assert_eq!(history[0].old_value, Some(Value::from("Alice")));
    assert_eq!(history[0].new_value, Value::from("Bob"));
    assert_eq!(history[1].property, "nested.age");
    assert_eq!(history[1].old_value, Some(Value::from(25)));
    assert_eq!(history[1].new_value, Value::from(26));

    // Observer sees unqualified names.
    let names: Vec<String> = calls.borrow().iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(names, vec!["name", "age"]);
}

#[test]
fn action_logging_formats_each_change() {
    let lines: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&lines);
    let h = create_reactive(Value::object([("action", "none")]), move |prop, value| {
        sink.borrow_mut()
            .push(format!("Action '{prop}' set to: {value}"));
    })
    .expect("object state");

    h.proxy().set("action", "clicked").expect("observer ok");
    h.proxy().set("action", "submitted").expect("observer ok");

    assert_eq!(
        lines.borrow().as_slice(),
        &[
            "Action 'action' set to: clicked".to_owned(),
            "Action 'action' set to: submitted".to_owned(),
        ]
    );
}

#[test]
fn lazy_nested_write_then_read() {
    let (calls, observer) = recorder();
    let h = create_reactive(Value::object([("a", Value::object([("b", 1)]))]), observer)
        .expect("object state");

    h.proxy()
        .child("a")
        .expect("nested")
        .set("b", 2)
        .expect("observer ok");

    assert_eq!(calls.borrow().as_slice(), &[("b".to_owned(), Value::from(2))]);
    let b = h.proxy().child("a").expect("nested").get("b");
    assert_eq!(b, Value::from(2));
}

#[test]
fn construction_validation() {
    let (_, observer) = recorder();
    assert!(matches!(
        create_reactive(Value::Null, observer),
        Err(ReactiveError::InvalidArgument(InvalidArgument::NonObjectState { .. }))
    ));

    let (_, observer) = recorder();
    assert!(matches!(
        create_reactive(42, observer),
        Err(ReactiveError::InvalidArgument(InvalidArgument::NonObjectState { .. }))
    ));

    assert!(matches!(
        ReactiveHandle::builder(Node::new_object()).build(),
        Err(ReactiveError::InvalidArgument(InvalidArgument::NonCallableObserver))
    ));
}

#[test]
fn writes_are_visible_to_other_holders_of_the_tree() {
    let user = Node::object([("name", "Alice")]);
    let (_, observer) = recorder();
    let h = create_reactive(Value::object([("user", user.clone())]), observer)
        .expect("object state");

    h.proxy()
        .child("user")
        .expect("user")
        .set("name", "Carol")
        .expect("observer ok");
    assert_eq!(user.get("name"), Some(Value::from("Carol")));

    // And the other way round: raw writes show through the wrapper.
    user.put("name", Value::from("Dave"));
    assert_eq!(
        h.proxy().child("user").expect("user").get("name"),
        Value::from("Dave")
    );
}

#[test]
fn snapshot_does_not_change_after_more_writes() {
    let (_, observer) = recorder();
    let h = create_reactive(Value::object([("n", 0)]), observer).expect("object state");
    h.proxy().set("n", 1).expect("observer ok");
    h.proxy().set("n", 2).expect("observer ok");

    let snapshot = h.state_history().expect("tracked");
    h.proxy().set("n", 3).expect("observer ok");
    h.proxy().set("n", 4).expect("observer ok");

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[1].new_value, Value::from(2));
    assert_eq!(h.history_len(), Some(4));
}

#[test]
fn new_property_records_missing_old_value() {
    let (_, observer) = recorder();
    let h = create_reactive(Value::object([("a", 1)]), observer).expect("object state");
    h.proxy().set("b", true).expect("observer ok");
    let history = h.state_history().expect("tracked");
    assert_eq!(history[0].old_value, None);
    assert_eq!(h.proxy().get("b").as_bool(), Some(true));
}

#[test]
fn deep_writes_share_legacy_prefix() {
    let (calls, observer) = recorder();
    let h = create_reactive(
        Value::object([(
            "a",
            Value::object([("x", Value::from(0)), ("b", Value::object([("x", 0)]))]),
        )]),
        observer,
    )
    .expect("object state");

    let a = h.proxy().child("a").expect("a");
    a.set("x", 1).expect("observer ok");
    a.child("b").expect("b").set("x", 2).expect("observer ok");

    let history = h.state_history().expect("tracked");
    assert_eq!(history[0].property, "nested.x");
    assert_eq!(history[1].property, "nested.x");
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn failing_observer_does_not_roll_back() {
    let h = ReactiveHandle::builder(Value::object([("name", "Alice")]))
        .fallible_observer(|prop, _| Err(ObserverError::new(format!("ui for {prop} is gone"))))
        .build()
        .expect("valid");

    let err = h.proxy().set("name", "Bob").expect_err("observer fails");
    assert_eq!(err.to_string(), "ui for name is gone");
    assert_eq!(h.proxy().get("name"), Value::from("Bob"));
    let history = h.state_history().expect("tracked");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].new_value, Value::from("Bob"));
}

#[test]
fn panicking_observer_propagates_and_keeps_the_write() {
    let h = create_reactive(Value::object([("n", 0)]), |_, _| panic!("observer exploded"))
        .expect("valid");
    let proxy = h.proxy();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = proxy.set("n", 1);
    }));
    assert!(result.is_err());
    assert_eq!(h.proxy().get("n"), Value::from(1));
    assert_eq!(h.history_len(), Some(1));
}

#[test]
fn history_disabled_root_still_notifies() {
    let (calls, observer) = recorder();
    let h = ReactiveHandle::builder(Value::object([("n", 0)]))
        .observer(observer)
        .config(ReactiveConfig::default().with_history(false))
        .build()
        .expect("valid");
    h.proxy().set("n", 1).expect("observer ok");
    assert_eq!(calls.borrow().len(), 1);
    assert!(h.state_history().is_none());
}
