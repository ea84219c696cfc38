//! Attribute values carried by events

use cuke_types::{DataTable, DocString, Step};
use serde::Serialize;
use std::time::Duration;

/// A single attribute value.
///
/// Events are declared with attribute names only, so values are dynamically
/// typed. Conversions exist from the usual Rust types; build positional
/// argument lists with [`values!`](crate::values).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Short tag such as a result status (`passed`, `failed`).
    Symbol(String),
    Duration(Duration),
    List(Vec<Value>),
    Json(serde_json::Value),
    Step(Step),
    DataTable(DataTable),
    DocString(DocString),
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Text or symbol contents.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Symbol(s) => Some(s),
            Value::DocString(doc) => Some(doc.content()),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_step(&self) -> Option<&Step> {
        match self {
            Value::Step(step) => Some(step),
            _ => None,
        }
    }

    pub fn as_data_table(&self) -> Option<&DataTable> {
        match self {
            Value::DataTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_doc_string(&self) -> Option<&DocString> {
        match self {
            Value::DocString(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::Json(json)
    }
}

impl From<Step> for Value {
    fn from(step: Step) -> Self {
        Value::Step(step)
    }
}

impl From<DataTable> for Value {
    fn from(table: DataTable) -> Self {
        Value::DataTable(table)
    }
}

impl From<DocString> for Value {
    fn from(doc: DocString) -> Self {
        Value::DocString(doc)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

/// Build a positional argument list for [`Bus::emit`](crate::Bus::emit).
///
/// ```rust
/// use cuke_events::{values, Value};
///
/// let args = values!["features/a.feature", 3, Value::symbol("passed")];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[1], Value::Integer(3));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
