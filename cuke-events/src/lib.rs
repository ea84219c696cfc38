//! Event bus for cucumber test runs
//!
//! Parsers, compilers, runners and formatters talk to each other through
//! lifecycle events ("test step finished", "test case started") without
//! knowing about one another.
//!
//! ## Pieces
//!
//! - [`EventType`] - a `static` event definition: declared name plus ordered
//!   attribute names. Its [`EventId`] is derived from the name
//!   (`TestStepFinished` → `test_step_finished`).
//! - [`Registry`] - the fixed set of definitions a bus accepts.
//! - [`Bus`] - validates subscriptions and broadcasts against the registry and
//!   calls handlers synchronously, in subscription order.
//!
//! ## Quick Start
//!
//! ```rust
//! use cuke_events::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! event_type!(static TEST_EVENT = TestEvent(some_attribute));
//! event_type!(static ANOTHER_TEST_EVENT = AnotherTestEvent());
//!
//! let registry = Registry::from_types([&TEST_EVENT, &ANOTHER_TEST_EVENT]).unwrap();
//! let mut bus = Bus::new(registry);
//!
//! let received = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&received);
//! bus.on_fn("test_event", move |args| {
//!     *sink.borrow_mut() = Some(args[0].clone());
//!     Ok(())
//! })
//! .unwrap();
//!
//! bus.emit("test_event", values![Value::symbol("some_attribute")]).unwrap();
//! assert_eq!(*received.borrow(), Some(Value::symbol("some_attribute")));
//! ```
//!
//! ## Handler objects
//!
//! ```rust
//! use cuke_events::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct StepCounter {
//!     finished: Cell<usize>,
//! }
//!
//! impl Handler for StepCounter {
//!     fn call(&self, _args: &[Value]) -> HandlerResult {
//!         self.finished.set(self.finished.get() + 1);
//!         Ok(())
//!     }
//! }
//!
//! let mut bus = Bus::new(lifecycle::registry().unwrap());
//! let counter = Rc::new(StepCounter { finished: Cell::new(0) });
//! bus.on(&lifecycle::TEST_STEP_FINISHED, Rc::clone(&counter)).unwrap();
//!
//! bus.emit("test_step_finished", values!["step", Value::symbol("passed")]).unwrap();
//! assert_eq!(counter.finished.get(), 1);
//! ```
//!
//! ## Errors
//!
//! Unknown identifiers, unregistered definitions and wrong arity are reported
//! at the offending call. A handler error stops the current dispatch unless
//! the bus was built with [`DispatchPolicy::ContinueOnError`].
//!
//! ```rust
//! use cuke_events::*;
//!
//! let bus = Bus::new(lifecycle::registry().unwrap());
//! match bus.emit("some_unrecognized_identifier", values![]) {
//!     Err(BusError::UnknownEventIdentifier(id)) => assert_eq!(id, "some_unrecognized_identifier"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
pub mod event_id;
pub mod handler;
pub mod lifecycle;
pub mod registry;
pub mod value;

pub use bus::{Bus, BusBuilder, EventRef};
pub use config::{BusConfig, ConfigError, DispatchPolicy};
pub use error::{BusError, Result};
pub use event::{Event, EventError, EventType};
pub use event_id::EventId;
pub use handler::{FnHandler, Handler, HandlerError, HandlerResult, handler_fn};
pub use registry::{Registry, RegistryError};
pub use value::Value;

pub use cuke_types::{DataTable, DocString, Location, MultilineArgument, Step};
