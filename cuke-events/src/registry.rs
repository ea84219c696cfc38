//! The fixed table of event types a bus accepts

use crate::event::EventType;
use crate::event_id::EventId;
use std::collections::BTreeMap;

/// Registry construction error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Key {key} does not match the identifier {derived} of {type_name}")]
    IdentifierMismatch {
        key: EventId,
        derived: EventId,
        type_name: &'static str,
    },

    #[error("Identifier {0} is registered more than once")]
    DuplicateIdentifier(EventId),
}

/// Immutable mapping from identifier to event definition.
///
/// Keys always equal the derived identifier of their definition, so a type
/// and its identifier resolve to the same subscriber list.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: BTreeMap<EventId, &'static EventType>,
}

impl Registry {
    /// Build from explicit `(identifier, definition)` pairs.
    ///
    /// Listing the same definition twice is harmless; a different definition
    /// under an already used identifier is an error.
    pub fn new<K, I>(entries: I) -> Result<Self, RegistryError>
    where
        K: Into<EventId>,
        I: IntoIterator<Item = (K, &'static EventType)>,
    {
        let mut types: BTreeMap<EventId, &'static EventType> = BTreeMap::new();
        for (key, event_type) in entries {
            let key = key.into();
            let derived = event_type.event_id();
            if &key != derived {
                return Err(RegistryError::IdentifierMismatch {
                    key,
                    derived: derived.clone(),
                    type_name: event_type.name(),
                });
            }
            match types.get(&key) {
                Some(registered) if !registered.is(event_type) => {
                    return Err(RegistryError::DuplicateIdentifier(key));
                }
                Some(_) => {}
                None => {
                    types.insert(key, event_type);
                }
            }
        }
        Ok(Self { types })
    }

    /// Build from definitions, keying each by its derived identifier.
    pub fn from_types<I>(types: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'static EventType>,
    {
        Self::new(types.into_iter().map(|t| (t.event_id().clone(), t)))
    }

    pub fn get(&self, id: &str) -> Option<&'static EventType> {
        self.types.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    /// Membership by definition identity, not by name.
    pub fn contains_type(&self, event_type: &EventType) -> bool {
        self.types
            .get(event_type.event_id().as_str())
            .is_some_and(|registered| registered.is(event_type))
    }

    pub fn ids(&self) -> impl Iterator<Item = &EventId> {
        self.types.keys()
    }

    pub fn types(&self) -> impl Iterator<Item = &'static EventType> + '_ {
        self.types.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventId, &'static EventType)> {
        self.types.iter().map(|(id, t)| (id, *t))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_EVENT: EventType = EventType::new("TestEvent", &["some_attribute"]);
    static ANOTHER_TEST_EVENT: EventType = EventType::new("AnotherTestEvent", &[]);
    static IMPOSTOR: EventType = EventType::new("Other::TestEvent", &["some_attribute"]);

    #[test]
    fn test_from_types() {
        let registry = Registry::from_types([&TEST_EVENT, &ANOTHER_TEST_EVENT]).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains_id("test_event"));
        assert!(registry.get("another_test_event").is_some_and(|t| t.is(&ANOTHER_TEST_EVENT)));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_explicit_keys() {
        let registry = Registry::new([("test_event", &TEST_EVENT)]).unwrap();
        assert!(registry.contains_type(&TEST_EVENT));
    }

    #[test]
    fn test_mismatched_key_rejected() {
        let err = Registry::new([("wrong_key", &TEST_EVENT)]).unwrap_err();
        assert!(matches!(err, RegistryError::IdentifierMismatch { .. }));
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let err = Registry::from_types([&TEST_EVENT, &IMPOSTOR]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateIdentifier(EventId::from("test_event")));
    }

    #[test]
    fn test_repeated_definition_is_accepted() {
        let registry = Registry::from_types([&TEST_EVENT, &TEST_EVENT]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains_type(&TEST_EVENT));
    }

    #[test]
    fn test_membership_is_by_identity() {
        let registry = Registry::from_types([&TEST_EVENT]).unwrap();
        assert!(registry.contains_type(&TEST_EVENT));
        assert!(!registry.contains_type(&IMPOSTOR));
        assert!(!registry.contains_type(&ANOTHER_TEST_EVENT));
    }

    #[test]
    fn test_ids_are_sorted() {
        let registry = Registry::from_types([&TEST_EVENT, &ANOTHER_TEST_EVENT]).unwrap();
        let ids: Vec<_> = registry.ids().map(EventId::as_str).collect();
        assert_eq!(ids, vec!["another_test_event", "test_event"]);
    }
}
