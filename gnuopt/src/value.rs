use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::AccessError;

/// Key under which positional arguments appear in serialized output.
pub const POSITIONAL_KEY: &str = "$";

/// A coerced option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Number(f64),
    Integer(i64),
    /// Occurrence counter of a `switch`.
    Count(u64),
    List(Vec<Value>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

// ============================================================================
// FromValue: typed retrieval
// ============================================================================

pub trait FromValue: Sized {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError>;
}

fn mismatch(name: &str, expected: &'static str) -> AccessError {
    AccessError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}

impl FromValue for String {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            _ => Err(mismatch(name, "string")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::Number(n) => Ok(*n),
            Value::Integer(n) => Ok(*n as f64),
            _ => Err(mismatch(name, "number")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::Integer(n) => Ok(*n),
            Value::Count(n) => i64::try_from(*n).map_err(|_| mismatch(name, "integer")),
            _ => Err(mismatch(name, "integer")),
        }
    }
}

impl FromValue for u64 {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::Count(n) => Ok(*n),
            _ => Err(mismatch(name, "switch")),
        }
    }
}

impl FromValue for bool {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::Count(n) => Ok(*n > 0),
            _ => Err(mismatch(name, "switch")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(name: &str, v: &Value) -> Result<Self, AccessError> {
        match v {
            Value::List(items) => items.iter().map(|i| T::from_value(name, i)).collect(),
            _ => Err(mismatch(name, "list")),
        }
    }
}

// ============================================================================
// Parsed: the result object
// ============================================================================

/// Result of one parse call.
///
/// Options keep the order in which they were first seen. An option maps to
/// `None` when its flag was given but no value ever reached it, which can
/// only happen to a non-final flag inside a short cluster (`-ab x`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    positional: Vec<String>,
    options: IndexMap<String, Option<Value>>,
}

impl Parsed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments in encounter order.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name).and_then(|v| v.as_ref())
    }

    /// Whether the flag appeared at all, with or without a value.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.positional.is_empty()
    }

    /// Number of times a `switch` was given, 0 if never.
    pub fn count(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(Value::Count(n)) => *n,
            _ => 0,
        }
    }

    /// Get a typed value by resolved option name.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, AccessError> {
        match self.options.get(name) {
            Some(Some(v)) => T::from_value(name, v),
            Some(None) => Err(AccessError::Missing(name.to_string())),
            None => Err(AccessError::NotFound(name.to_string())),
        }
    }
}

impl Parsed {
    pub(crate) fn push_positional(&mut self, arg: String) {
        self.positional.push(arg);
    }

    pub(crate) fn declare(&mut self, name: &str) {
        self.options.insert(name.to_string(), None);
    }

    pub(crate) fn set(&mut self, name: &str, value: Value) {
        self.options.insert(name.to_string(), Some(value));
    }

    /// Bump a switch counter, starting it at 1. Returns the new count.
    pub(crate) fn increment(&mut self, name: &str) -> u64 {
        let slot = self.options.entry(name.to_string()).or_insert(None);
        let next = match slot {
            Some(Value::Count(n)) => *n + 1,
            _ => 1,
        };
        *slot = Some(Value::Count(next));
        next
    }

    /// Append to a list-valued option, creating the list on first use.
    pub(crate) fn append(&mut self, name: &str, value: Value) {
        let slot = self.options.entry(name.to_string()).or_insert(None);
        match slot {
            Some(Value::List(items)) => items.push(value),
            Some(other) => {
                let first = std::mem::replace(other, Value::List(Vec::new()));
                *other = Value::List(vec![first, value]);
            }
            None => *slot = Some(Value::List(vec![value])),
        }
    }
}

impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.options.len() + 1))?;
        map.serialize_entry(POSITIONAL_KEY, &self.positional)?;
        for (k, v) in &self.options {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
