//! Integration tests for common cuke workflows.
//!
//! A miniature runner drives the lifecycle events while formatter-style
//! handlers observe them.

use cuke::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

// =============================================================================
// Helpers
// =============================================================================

fn lifecycle_bus() -> Bus {
    Bus::builder(lifecycle::registry().unwrap())
        .log_events(false)
        .build()
}

fn feature_steps() -> Vec<Step> {
    let location = |line| Location::new("features/users.feature", line);
    let table = DataTable::from_cells(vec![vec!["name", "age"], vec!["alice", "30"]]).unwrap();
    let body = DocString::new("{\"ok\": true}", "application/json");

    vec![
        Step::new("en", location(3), "Given ", "these users:").with_multiline_arg(table),
        Step::new("en", location(6), "When ", "I request the user list"),
        Step::new("en", location(7), "Then ", "the response is:").with_multiline_arg(body),
    ]
}

/// Emits the events a runner would publish for one scenario.
fn run_scenario(bus: &Bus, name: &str, steps: &[Step], failing_line: Option<u32>) {
    bus.emit("test_run_started", values![vec![Value::from(name)]])
        .unwrap();
    bus.emit("test_case_started", values![name]).unwrap();

    let mut status = "passed";
    for step in steps {
        bus.emit("test_step_started", values![step.clone()]).unwrap();
        let result = if status != "passed" {
            "skipped"
        } else if Some(step.location().line) == failing_line {
            status = "failed";
            "failed"
        } else {
            "passed"
        };
        bus.emit("test_step_finished", values![step.clone(), Value::symbol(result)])
            .unwrap();
    }

    bus.emit("test_case_finished", values![name, Value::symbol(status)])
        .unwrap();
    bus.emit("test_run_finished", values![]).unwrap();
}

/// Formatter that tallies step results.
#[derive(Default)]
struct Summary {
    results: RefCell<BTreeMap<String, usize>>,
}

impl Handler for Summary {
    fn call(&self, args: &[Value]) -> HandlerResult {
        let result = args
            .get(1)
            .and_then(Value::as_symbol)
            .ok_or_else(|| HandlerError::BadArguments("expected a result symbol".into()))?;
        *self
            .results
            .borrow_mut()
            .entry(result.to_string())
            .or_default() += 1;
        Ok(())
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_full_run_reaches_formatters_in_order() {
    let mut bus = lifecycle_bus();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for event_type in lifecycle::all() {
        let sink = Rc::clone(&seen);
        let id = event_type.event_id().clone();
        bus.on_fn(event_type, move |_| {
            sink.borrow_mut().push(id.to_string());
            Ok(())
        })
        .unwrap();
    }

    run_scenario(&bus, "listing users", &feature_steps(), None);

    assert_eq!(
        *seen.borrow(),
        vec![
            "test_run_started",
            "test_case_started",
            "test_step_started",
            "test_step_finished",
            "test_step_started",
            "test_step_finished",
            "test_step_started",
            "test_step_finished",
            "test_case_finished",
            "test_run_finished",
        ]
    );
}

#[test]
fn test_summary_formatter_counts_results() {
    let mut bus = lifecycle_bus();
    let summary = Rc::new(Summary::default());
    bus.on(&lifecycle::TEST_STEP_FINISHED, Rc::clone(&summary))
        .unwrap();

    run_scenario(&bus, "listing users", &feature_steps(), Some(6));

    let results = summary.results.borrow();
    assert_eq!(results.get("passed"), Some(&1));
    assert_eq!(results.get("failed"), Some(&1));
    assert_eq!(results.get("skipped"), Some(&1));
}

#[test]
fn test_multiline_arguments_survive_dispatch() {
    let mut bus = lifecycle_bus();
    let tables = Rc::new(Cell::new(0));
    let docs = Rc::new(RefCell::new(Vec::new()));

    let table_count = Rc::clone(&tables);
    let doc_sink = Rc::clone(&docs);
    bus.on_fn("test_step_started", move |args| {
        let step = args[0]
            .as_step()
            .ok_or_else(|| HandlerError::BadArguments("expected a step".into()))?;
        match step.multiline_arg() {
            MultilineArgument::DataTable(table) => {
                assert_eq!(table.transpose().rows()[0], vec!["name", "alice"]);
                table_count.set(table_count.get() + 1);
            }
            MultilineArgument::DocString(doc) => doc_sink.borrow_mut().push(doc.clone()),
            MultilineArgument::None => {}
        }
        Ok(())
    })
    .unwrap();

    run_scenario(&bus, "listing users", &feature_steps(), None);

    assert_eq!(tables.get(), 1);
    let docs = docs.borrow();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content_type(), "application/json");
    assert_eq!(docs[0], "{\"ok\": true}");
}

#[test]
fn test_events_render_as_json() {
    let mut bus = lifecycle_bus();
    let lines = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&lines);
    bus.on_fn(&lifecycle::TEST_CASE_FINISHED, move |args| {
        let event = lifecycle::TEST_CASE_FINISHED
            .instantiate(args.to_vec())
            .map_err(|e| HandlerError::Other(Box::new(e)))?;
        sink.borrow_mut().push(event.to_json());
        Ok(())
    })
    .unwrap();

    run_scenario(&bus, "listing users", &feature_steps(), None);

    let lines = lines.borrow();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["event_id"], "test_case_finished");
    assert_eq!(lines[0]["attributes"]["test_case"], "listing users");
    assert_eq!(lines[0]["attributes"]["result"], "passed");
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_formatter_error_surfaces_at_emit() {
    let mut bus = lifecycle_bus();
    bus.on(&lifecycle::TEST_STEP_FINISHED, Summary::default())
        .unwrap();

    let err = bus
        .emit("test_step_finished", values!["step", 42])
        .unwrap_err();

    assert_eq!(err.as_label(), "handler_failed");
    assert!(err.to_string().contains("test_step_finished"));
}

#[test]
fn test_runner_typos_are_caught() {
    let mut bus = lifecycle_bus();

    assert!(matches!(
        bus.emit("test_steps_finished", values![]),
        Err(BusError::UnknownEventIdentifier(_))
    ));
    assert!(matches!(
        bus.on_fn("test_case_begun", |_| Ok(())),
        Err(BusError::UnknownEventIdentifier(_))
    ));
    assert!(matches!(
        bus.emit("test_case_started", values![]),
        Err(BusError::Event(_))
    ));
}

#[test]
fn test_custom_events_alongside_lifecycle() {
    event_type!(static STEP_DEFINITION_MATCHED = StepDefinitionMatched(step, pattern));

    let mut types: Vec<&'static EventType> = lifecycle::all().to_vec();
    types.push(&STEP_DEFINITION_MATCHED);
    let mut bus = Bus::builder(Registry::from_types(types).unwrap())
        .dispatch(DispatchPolicy::ContinueOnError)
        .log_events(false)
        .build();

    let patterns = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&patterns);
    bus.on_fn("step_definition_matched", move |args| {
        sink.borrow_mut()
            .push(args[1].as_str().unwrap_or_default().to_string());
        Ok(())
    })
    .unwrap();

    let step = feature_steps().remove(1);
    bus.emit("step_definition_matched", values![step, "I request the user list"])
        .unwrap();

    assert_eq!(*patterns.borrow(), vec!["I request the user list"]);
    assert!(bus.handles("test_run_finished"));
}
