//! Standard test-run lifecycle events
//!
//! The event types a runner publishes while reading sources, compiling test
//! cases and executing them. [`registry`] builds the table a bus needs to
//! accept them.
//!
//! ```rust
//! use cuke_events::{lifecycle, values, Bus};
//!
//! let bus = Bus::new(lifecycle::registry().unwrap());
//! bus.emit("test_run_finished", values![]).unwrap();
//! assert!(bus.handles("test_step_finished"));
//! ```

use crate::event_type;
use crate::event::EventType;
use crate::registry::{Registry, RegistryError};

event_type!(
    /// A feature file was read from disk.
    pub static GHERKIN_SOURCE_READ = GherkinSourceRead(path, body)
);
event_type!(
    /// A feature file was parsed into a document.
    pub static GHERKIN_SOURCE_PARSED = GherkinSourceParsed(gherkin_document)
);
event_type!(
    /// A pickle was compiled into a test case.
    pub static TEST_CASE_CREATED = TestCaseCreated(test_case, pickle)
);
event_type!(
    /// A pickle step was compiled into a test step.
    pub static TEST_STEP_CREATED = TestStepCreated(test_step, pickle_step)
);
event_type!(pub static TEST_RUN_STARTED = TestRunStarted(test_cases));
event_type!(pub static TEST_CASE_STARTED = TestCaseStarted(test_case));
event_type!(pub static TEST_STEP_STARTED = TestStepStarted(test_step));
event_type!(pub static TEST_STEP_FINISHED = TestStepFinished(test_step, result));
event_type!(pub static TEST_CASE_FINISHED = TestCaseFinished(test_case, result));
event_type!(pub static TEST_RUN_FINISHED = TestRunFinished());

/// Every lifecycle event type, in the order a run emits them.
pub fn all() -> [&'static EventType; 10] {
    [
        &GHERKIN_SOURCE_READ,
        &GHERKIN_SOURCE_PARSED,
        &TEST_CASE_CREATED,
        &TEST_STEP_CREATED,
        &TEST_RUN_STARTED,
        &TEST_CASE_STARTED,
        &TEST_STEP_STARTED,
        &TEST_STEP_FINISHED,
        &TEST_CASE_FINISHED,
        &TEST_RUN_FINISHED,
    ]
}

/// Registry of all lifecycle events.
pub fn registry() -> Result<Registry, RegistryError> {
    Registry::from_types(all())
}
