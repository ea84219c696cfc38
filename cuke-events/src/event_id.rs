//! Event identifiers
//!
//! Every event type is keyed by a snake_case identifier derived from its
//! declared name. Registries built elsewhere rely on the exact derivation, so
//! [`underscore`] must stay byte-for-byte stable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid word pattern"));

/// Snake_case key of an event type (`test_case_started`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Derive the identifier for a declared type name.
    ///
    /// Namespaced names (`Cucumber::Core::Events::TestCaseStarted`) only
    /// contribute their last segment.
    pub fn from_type_name(name: &str) -> Self {
        EventId(underscore(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Convert a (possibly namespaced) CamelCase type name to snake_case.
///
/// ```rust
/// use cuke_events::event_id::underscore;
///
/// assert_eq!(underscore("HTTPRequestSent"), "http_request_sent");
/// assert_eq!(underscore("Cucumber::Core::Events::TestCaseStarted"), "test_case_started");
/// ```
pub fn underscore(name: &str) -> String {
    let last = name.rsplit("::").next().unwrap_or(name);
    let split_acronyms = ACRONYM_BOUNDARY.replace_all(last, "${1}_${2}");
    let split_words = WORD_BOUNDARY.replace_all(&split_acronyms, "${1}_${2}");
    split_words.replace('-', "_").to_lowercase()
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        EventId(id)
    }
}

impl PartialEq<str> for EventId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EventId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
