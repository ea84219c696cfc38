//! Event definitions and instances

use crate::event_id::EventId;
use crate::value::Value;
use once_cell::sync::OnceCell;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ptr;

/// Event definition error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("{event_id} takes {expected} attribute(s), got {actual}")]
    ArityMismatch {
        event_id: EventId,
        expected: usize,
        actual: usize,
    },
}

/// Shape of a named event: its declared name and ordered attribute names.
///
/// Definitions are `static` items and are compared by address, so two
/// definitions with the same name and attributes are still different types.
///
/// ```rust
/// use cuke_events::{values, EventType};
///
/// static TEST_STEP_FINISHED: EventType =
///     EventType::new("TestStepFinished", &["test_step", "result"]);
///
/// let event = TEST_STEP_FINISHED.instantiate(values!["step-1", "passed"]).unwrap();
/// assert_eq!(event.event_id(), "test_step_finished");
/// assert_eq!(event.get("result").and_then(|v| v.as_str()), Some("passed"));
/// ```
pub struct EventType {
    name: &'static str,
    attributes: &'static [&'static str],
    id: OnceCell<EventId>,
}

impl EventType {
    /// Declare an event type. `name` may be namespaced (`Events::TestCaseStarted`).
    pub const fn new(name: &'static str, attributes: &'static [&'static str]) -> Self {
        Self {
            name,
            attributes,
            id: OnceCell::new(),
        }
    }

    /// Declared name as given to [`EventType::new`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last segment of the declared name.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn attribute_names(&self) -> &'static [&'static str] {
        self.attributes
    }

    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    /// Snake_case identifier derived from the declared name, computed once.
    pub fn event_id(&self) -> &EventId {
        self.id.get_or_init(|| EventId::from_type_name(self.name))
    }

    /// Whether `other` is this very definition.
    pub fn is(&self, other: &EventType) -> bool {
        ptr::eq(self, other)
    }

    /// Build an instance from positional values.
    pub fn instantiate(&'static self, values: Vec<Value>) -> Result<Event, EventError> {
        if values.len() != self.arity() {
            return Err(EventError::ArityMismatch {
                event_id: self.event_id().clone(),
                expected: self.arity(),
                actual: values.len(),
            });
        }
        Ok(Event {
            event_type: self,
            values,
        })
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for EventType {}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Declare a `static` [`EventType`] from a type-like name.
///
/// ```rust
/// use cuke_events::event_type;
///
/// event_type!(pub static TEST_CASE_STARTED = TestCaseStarted(test_case));
/// event_type!(static RUN_FINISHED = TestRunFinished());
///
/// assert_eq!(TEST_CASE_STARTED.event_id(), "test_case_started");
/// assert_eq!(RUN_FINISHED.arity(), 0);
/// ```
#[macro_export]
macro_rules! event_type {
    ($(#[$meta:meta])* $vis:vis static $ident:ident = $name:ident ( $($attr:ident),* $(,)? ) $(;)?) => {
        $(#[$meta])*
        $vis static $ident: $crate::EventType =
            $crate::EventType::new(::std::stringify!($name), &[$(::std::stringify!($attr)),*]);
    };
}

/// An immutable event instance.
#[derive(Clone)]
pub struct Event {
    event_type: &'static EventType,
    values: Vec<Value>,
}

impl Event {
    pub fn event_type(&self) -> &'static EventType {
        self.event_type
    }

    pub fn event_id(&self) -> &'static EventId {
        self.event_type.event_id()
    }

    /// Attribute values in declaration order.
    pub fn attributes(&self) -> &[Value] {
        &self.values
    }

    pub fn into_attributes(self) -> Vec<Value> {
        self.values
    }

    /// Attribute value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.event_type
            .attributes
            .iter()
            .position(|attr| *attr == name)
            .and_then(|index| self.values.get(index))
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.event_type.attributes.iter().copied().zip(&self.values)
    }

    /// Attribute names mapped to their values.
    pub fn to_map(&self) -> BTreeMap<&'static str, &Value> {
        self.fields().collect()
    }

    /// `{"event_id": ..., "attributes": {...}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.event_type.is(other.event_type) && self.values == other.values
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.event_type.short_name());
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

struct Fields<'a>(&'a Event);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len()))?;
        for (name, value) in self.0.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Event", 2)?;
        s.serialize_field("event_id", self.event_id())?;
        s.serialize_field("attributes", &Fields(self))?;
        s.end()
    }
}
