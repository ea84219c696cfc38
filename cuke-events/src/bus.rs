//! Event Bus implementation

use crate::config::{BusConfig, DispatchPolicy};
use crate::error::{BusError, Result};
use crate::event::{Event, EventType};
use crate::event_id::EventId;
use crate::handler::{Handler, HandlerResult, handler_fn};
use crate::registry::Registry;
use crate::value::Value;
use cuke_log::{debug, error, trace, warn};
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

const TARGET: &str = "cuke::bus";

/// What a subscription or count refers to: an identifier or a definition.
#[derive(Debug, Clone)]
pub enum EventRef<'a> {
    Id(Cow<'a, str>),
    Type(&'static EventType),
}

impl<'a> From<&'a str> for EventRef<'a> {
    fn from(id: &'a str) -> Self {
        EventRef::Id(Cow::Borrowed(id))
    }
}

impl From<String> for EventRef<'_> {
    fn from(id: String) -> Self {
        EventRef::Id(Cow::Owned(id))
    }
}

impl<'a> From<&'a EventId> for EventRef<'a> {
    fn from(id: &'a EventId) -> Self {
        EventRef::Id(Cow::Borrowed(id.as_str()))
    }
}

impl From<&'static EventType> for EventRef<'_> {
    fn from(event_type: &'static EventType) -> Self {
        EventRef::Type(event_type)
    }
}

/// Why an event reference is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Subscribe,
    Count,
}

impl Lookup {
    fn rejection(self, err: &BusError) -> String {
        let action = match self {
            Lookup::Subscribe => "Rejected subscription",
            Lookup::Count => "Rejected subscriber count",
        };
        format!("{} ({}): {}", action, err.as_label(), err)
    }
}

/// Synchronous event bus
///
/// Dispatches events to handlers on the caller's thread, in subscription
/// order. Only event types present in the bus's [`Registry`] are accepted.
///
/// # Examples
///
/// ```rust
/// use cuke_events::{values, Bus, EventType, Registry};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// static TEST_CASE_STARTED: EventType = EventType::new("TestCaseStarted", &["test_case"]);
///
/// let mut bus = Bus::new(Registry::from_types([&TEST_CASE_STARTED]).unwrap());
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = Rc::clone(&seen);
/// bus.on_fn(&TEST_CASE_STARTED, move |args| {
///     sink.borrow_mut().push(args[0].clone());
///     Ok(())
/// })
/// .unwrap();
///
/// bus.emit("test_case_started", values!["scenario 1"]).unwrap();
/// assert_eq!(seen.borrow().len(), 1);
/// ```
pub struct Bus {
    registry: Registry,
    handlers: HashMap<EventId, Vec<Box<dyn Handler>>>,
    config: BusConfig,
}

impl Bus {
    /// Create a bus accepting the events in `registry`.
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, BusConfig::default())
    }

    /// Create a bus with custom config
    pub fn with_config(registry: Registry, config: BusConfig) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
            config,
        }
    }

    pub fn builder(registry: Registry) -> BusBuilder {
        BusBuilder::new(registry)
    }

    /// Subscribe a handler to an event, by identifier or by definition.
    ///
    /// Nothing is recorded when the event is unknown to this bus.
    pub fn on<'a, H>(&mut self, event_ref: impl Into<EventRef<'a>>, handler: H) -> Result<()>
    where
        H: Handler + 'static,
    {
        let event_id = self.resolve(event_ref.into(), Lookup::Subscribe)?;

        if self.config.log_events {
            debug!(target: TARGET, "Subscribed {} to {}", handler.name(), event_id);
        }

        self.handlers
            .entry(event_id)
            .or_default()
            .push(Box::new(handler));
        Ok(())
    }

    /// Subscribe a closure.
    pub fn on_fn<'a, F>(&mut self, event_ref: impl Into<EventRef<'a>>, f: F) -> Result<()>
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        self.on(event_ref, handler_fn(f))
    }

    /// Dispatch an event instance to its handlers.
    ///
    /// The instance's definition must be registered on this bus; a
    /// look-alike definition with the same identifier is rejected.
    pub fn broadcast(&self, event: &Event) -> Result<()> {
        if !self.registry.contains_type(event.event_type()) {
            if self.config.log_events {
                warn!(
                    target: TARGET,
                    "Rejected {}: event type {} is not registered",
                    event.event_id(),
                    event.event_type().name()
                );
            }
            return Err(BusError::InvalidArgument(format!(
                "{} is not an instance of a registered event type",
                event.event_type().name()
            )));
        }

        self.dispatch(event)
    }

    /// Dispatch a type-erased value, which must be an [`Event`].
    pub fn broadcast_any(&self, value: &dyn Any) -> Result<()> {
        if let Some(event) = value.downcast_ref::<Event>() {
            return self.broadcast(event);
        }

        let event_type = value
            .downcast_ref::<EventType>()
            .or_else(|| value.downcast_ref::<&'static EventType>().copied());
        let message = match event_type {
            Some(event_type) => format!(
                "expected an event instance, got the event type {}",
                event_type.name()
            ),
            None => "expected an event instance".to_string(),
        };

        if self.config.log_events {
            warn!(target: TARGET, "Rejected broadcast: {}", message);
        }
        Err(BusError::InvalidArgument(message))
    }

    /// Build an event from positional values and dispatch it.
    ///
    /// Equivalent to instantiating the registered definition for `id` and
    /// calling [`Bus::broadcast`].
    pub fn emit(&self, id: &str, values: Vec<Value>) -> Result<()> {
        let event_type = self.registry.get(id).ok_or_else(|| {
            if self.config.log_events {
                warn!(target: TARGET, "Rejected emit: unknown event identifier {}", id);
            }
            BusError::UnknownEventIdentifier(EventId::from(id))
        })?;

        let event = event_type.instantiate(values)?;
        self.broadcast(&event)
    }

    /// Whether `id` is registered.
    pub fn handles(&self, id: &str) -> bool {
        self.registry.contains_id(id)
    }

    /// The registry this bus was built with.
    pub fn event_types(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Number of handlers subscribed to an event.
    pub fn subscriber_count<'a>(&self, event_ref: impl Into<EventRef<'a>>) -> Result<usize> {
        let event_id = self.resolve(event_ref.into(), Lookup::Count)?;
        Ok(self.handlers.get(&event_id).map_or(0, Vec::len))
    }

    fn resolve(&self, event_ref: EventRef<'_>, lookup: Lookup) -> Result<EventId> {
        let resolved = match event_ref {
            EventRef::Id(id) => match self.registry.get(&id) {
                Some(event_type) => Ok(event_type.event_id().clone()),
                None => Err(BusError::UnknownEventIdentifier(EventId::from(id.into_owned()))),
            },
            EventRef::Type(event_type) if self.registry.contains_type(event_type) => {
                Ok(event_type.event_id().clone())
            }
            EventRef::Type(event_type) => {
                Err(BusError::UnregisteredEventType(event_type.event_id().clone()))
            }
        };

        if let Err(err) = &resolved {
            if self.config.log_events {
                warn!(target: TARGET, "{}", lookup.rejection(err));
            }
        }
        resolved
    }

    fn dispatch(&self, event: &Event) -> Result<()> {
        let event_id = event.event_id();

        let handlers = match self.handlers.get(event_id) {
            Some(handlers) => handlers,
            None => {
                if self.config.log_events {
                    trace!(target: TARGET, "No handlers registered for {}", event_id);
                }
                return Ok(());
            }
        };

        if self.config.log_events {
            debug!(
                target: TARGET,
                "Dispatching {} to {} handler(s)",
                event_id,
                handlers.len()
            );
        }

        let args = event.attributes();
        match self.config.dispatch {
            DispatchPolicy::FailFast => {
                for handler in handlers {
                    if let Err(source) = handler.call(args) {
                        if self.config.log_events {
                            error!(target: TARGET, "{} failed on {}: {}", handler.name(), event_id, source);
                        }
                        return Err(BusError::HandlerFailed {
                            event_id: event_id.clone(),
                            source,
                        });
                    }
                }
                Ok(())
            }
            DispatchPolicy::ContinueOnError => {
                let mut errors = Vec::new();
                for handler in handlers {
                    if let Err(e) = handler.call(args) {
                        if self.config.log_events {
                            error!(target: TARGET, "{} failed on {}: {}", handler.name(), event_id, e);
                        }
                        errors.push(e);
                    }
                }
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(BusError::HandlersFailed {
                        event_id: event_id.clone(),
                        errors,
                    })
                }
            }
        }
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&EventId, usize> =
            self.handlers.iter().map(|(id, hs)| (id, hs.len())).collect();
        f.debug_struct("Bus")
            .field("registry", &self.registry)
            .field("handlers", &counts)
            .field("config", &self.config)
            .finish()
    }
}

/// Event bus builder
pub struct BusBuilder {
    registry: Registry,
    config: BusConfig,
}

impl BusBuilder {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            config: BusConfig::default(),
        }
    }

    /// Enable/disable logging
    pub fn log_events(mut self, enabled: bool) -> Self {
        self.config.log_events = enabled;
        self
    }

    /// Set the handler failure policy
    pub fn dispatch(mut self, policy: DispatchPolicy) -> Self {
        self.config.dispatch = policy;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Bus {
        Bus::with_config(self.registry, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerError;
    use crate::values;
    use std::cell::RefCell;
    use std::rc::Rc;

    static TEST_EVENT: EventType = EventType::new("TestEvent", &["some_attribute"]);
    static ANOTHER_TEST_EVENT: EventType = EventType::new("AnotherTestEvent", &[]);
    static UNREGISTERED_EVENT: EventType = EventType::new("UnregisteredEvent", &[]);

    fn bus() -> Bus {
        let registry = Registry::from_types([&TEST_EVENT, &ANOTHER_TEST_EVENT]).unwrap();
        Bus::builder(registry).log_events(false).build()
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn Handler>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |label: &str| -> Box<dyn Handler> {
            let sink = Rc::clone(&sink);
            let label = label.to_string();
            Box::new(handler_fn(move |_| {
                sink.borrow_mut().push(label.clone());
                Ok(())
            }))
        };
        (log, make)
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let mut bus = bus();
        let (log, make) = recorder();
        bus.on("test_event", make("first")).unwrap();
        bus.on(&TEST_EVENT, make("second")).unwrap();
        bus.on("test_event", make("third")).unwrap();

        bus.emit("test_event", values!["x"]).unwrap();

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handler_receives_unpacked_values() {
        let mut bus = bus();
        let received = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&received);
        bus.on_fn(&TEST_EVENT, move |args| {
            *sink.borrow_mut() = Some(args.to_vec());
            Ok(())
        })
        .unwrap();

        bus.emit("test_event", values![Value::symbol("some_attribute")]).unwrap();

        assert_eq!(*received.borrow(), Some(vec![Value::symbol("some_attribute")]));
    }

    #[test]
    fn test_failed_subscription_leaves_table_untouched() {
        let mut bus = bus();
        let (_, make) = recorder();

        assert!(matches!(
            bus.on("some_unknown_event", make("x")),
            Err(BusError::UnknownEventIdentifier(id)) if id == "some_unknown_event"
        ));
        assert!(matches!(
            bus.on(&UNREGISTERED_EVENT, make("x")),
            Err(BusError::UnregisteredEventType(_))
        ));
        assert_eq!(bus.subscriber_count("test_event").unwrap(), 0);
        assert!(bus.handlers.is_empty());
    }

    #[test]
    fn test_emit_checks_arity() {
        let bus = bus();
        let err = bus.emit("test_event", values![]).unwrap_err();
        assert_eq!(err.as_label(), "arity_mismatch");
    }

    #[test]
    fn test_broadcast_without_handlers_is_ok() {
        let bus = bus();
        let event = ANOTHER_TEST_EVENT.instantiate(values![]).unwrap();
        assert!(bus.broadcast(&event).is_ok());
    }

    #[test]
    fn test_fail_fast_stops_dispatch() {
        let mut bus = bus();
        let (log, make) = recorder();
        bus.on("test_event", make("before")).unwrap();
        bus.on_fn("test_event", |_| Err(HandlerError::failed("boom")))
            .unwrap();
        bus.on("test_event", make("after")).unwrap();

        let err = bus.emit("test_event", values![1]).unwrap_err();

        assert!(matches!(err, BusError::HandlerFailed { ref event_id, .. } if event_id == "test_event"));
        assert_eq!(*log.borrow(), vec!["before"]);
    }

    #[test]
    fn test_continue_on_error_runs_everything() {
        let registry = Registry::from_types([&TEST_EVENT]).unwrap();
        let mut bus = Bus::builder(registry)
            .log_events(false)
            .dispatch(DispatchPolicy::ContinueOnError)
            .build();
        let (log, make) = recorder();
        bus.on_fn("test_event", |_| Err(HandlerError::failed("one"))).unwrap();
        bus.on("test_event", make("runs")).unwrap();
        bus.on_fn("test_event", |_| Err(HandlerError::failed("two"))).unwrap();

        match bus.emit("test_event", values![1]) {
            Err(BusError::HandlersFailed { errors, .. }) => assert_eq!(errors.len(), 2),
            other => panic!("expected HandlersFailed, got {other:?}"),
        }
        assert_eq!(*log.borrow(), vec!["runs"]);
    }

    #[test]
    fn test_broadcast_any_rejects_non_events() {
        let bus = bus();
        let err = bus.broadcast_any(&42u8).unwrap_err();
        assert!(matches!(err, BusError::InvalidArgument(_)));

        let err = bus.broadcast_any(&ANOTHER_TEST_EVENT).unwrap_err();
        assert!(err.to_string().contains("AnotherTestEvent"));

        let definition: &'static EventType = &TEST_EVENT;
        let err = bus.broadcast_any(&definition).unwrap_err();
        assert!(err.to_string().contains("got the event type TestEvent"));
    }

    #[test]
    fn test_rejections_name_the_lookup() {
        let err = BusError::UnknownEventIdentifier(EventId::from("nope"));
        assert_eq!(
            Lookup::Subscribe.rejection(&err),
            "Rejected subscription (unknown_event_identifier): Unknown event identifier: nope"
        );
        assert_eq!(
            Lookup::Count.rejection(&err),
            "Rejected subscriber count (unknown_event_identifier): Unknown event identifier: nope"
        );

        let bus = bus();
        assert!(matches!(
            bus.subscriber_count("nope"),
            Err(BusError::UnknownEventIdentifier(_))
        ));
    }

    #[test]
    fn test_introspection() {
        let mut bus = bus();
        assert!(bus.handles("test_event"));
        assert!(!bus.handles("unregistered_event"));
        assert_eq!(bus.event_types().len(), 2);

        bus.on_fn("another_test_event", |_| Ok(())).unwrap();
        assert_eq!(bus.subscriber_count(&ANOTHER_TEST_EVENT).unwrap(), 1);
        assert!(bus.subscriber_count("nope").is_err());
        assert!(format!("{bus:?}").contains("another_test_event"));
    }
}
