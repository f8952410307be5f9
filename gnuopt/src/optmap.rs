//! Declarative option map.
//!
//! Each flag name maps to a descriptor written in a small grammar:
//!
//! - `string`, `number`, `integer`, `switch`: a builtin type
//! - `*type`: repeatable, values accumulate into a list
//! - `~type`: slurp, every remaining token becomes a value
//! - `&name`: alias, resolution continues at `name`
//!
//! The `-` key supplies the descriptor for any undeclared flag.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::BoxError;
use crate::value::Value;

/// Map key holding the fallback descriptor.
pub const WILDCARD: &str = "-";

/// Signature of a caller supplied coercion: `(raw, origin) -> value`.
pub type CoerceFn = dyn Fn(&str, &str) -> Result<Value, BoxError> + Send + Sync + 'static;

/// A caller supplied type handler.
#[derive(Clone)]
pub struct Coercer {
    label: String,
    func: Arc<CoerceFn>,
}

impl Coercer {
    pub fn new<F>(label: &str, func: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Coercer {
            label: label.to_string(),
            func: Arc::new(func),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn call(&self, raw: &str, origin: &str) -> Result<Value, BoxError> {
        (self.func)(raw, origin)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Coercer").field(&self.label).finish()
    }
}

// ============================================================================
// Sign / TypeKind / Descriptor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// `*`: may repeat, values accumulate.
    Repeat,
    /// `~`: consumes every following token.
    Slurp,
}

impl Sign {
    pub fn as_char(self) -> char {
        match self {
            Sign::Repeat => '*',
            Sign::Slurp => '~',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Sign::Repeat),
            '~' => Some(Sign::Slurp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    String,
    Number,
    Integer,
    Switch,
    Custom(Coercer),
    /// A type name that is not a builtin. Fails only when a value has to be
    /// coerced.
    Unknown(String),
}

impl TypeKind {
    pub fn is_switch(&self) -> bool {
        matches!(self, TypeKind::Switch)
    }

    fn from_name(name: &str) -> Self {
        match name {
            "string" => TypeKind::String,
            "number" => TypeKind::Number,
            "integer" => TypeKind::Integer,
            "switch" => TypeKind::Switch,
            other => TypeKind::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::String => f.write_str("string"),
            TypeKind::Number => f.write_str("number"),
            TypeKind::Integer => f.write_str("integer"),
            TypeKind::Switch => f.write_str("switch"),
            TypeKind::Custom(c) => f.write_str(c.label()),
            TypeKind::Unknown(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Descriptor {
    Alias(String),
    Typed { sign: Option<Sign>, kind: TypeKind },
}

impl Descriptor {
    pub fn typed(kind: TypeKind) -> Self {
        Descriptor::Typed { sign: None, kind }
    }

    pub fn custom<F>(label: &str, func: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Descriptor::typed(TypeKind::Custom(Coercer::new(label, func)))
    }

    /// Replace the sign of a typed descriptor. Aliases are returned as is.
    pub fn with_sign(self, sign: Sign) -> Self {
        match self {
            Descriptor::Typed { kind, .. } => Descriptor::Typed {
                sign: Some(sign),
                kind,
            },
            alias => alias,
        }
    }

    pub fn alias_target(&self) -> Option<&str> {
        match self {
            Descriptor::Alias(target) => Some(target),
            Descriptor::Typed { .. } => None,
        }
    }
}

impl FromStr for Descriptor {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(target) = s.strip_prefix('&') {
            return Ok(Descriptor::Alias(target.to_string()));
        }
        let mut chars = s.chars();
        let (sign, rest) = match chars.next().and_then(Sign::from_char) {
            Some(sign) => (Some(sign), chars.as_str()),
            None => (None, s),
        };
        Ok(Descriptor::Typed {
            sign,
            kind: TypeKind::from_name(rest),
        })
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(d) => d,
            Err(never) => match never {},
        }
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Descriptor::from(s.as_str())
    }
}

impl From<TypeKind> for Descriptor {
    fn from(kind: TypeKind) -> Self {
        Descriptor::typed(kind)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Alias(target) => write!(f, "&{}", target),
            Descriptor::Typed { sign, kind } => {
                if let Some(sign) = sign {
                    write!(f, "{}", sign.as_char())?;
                }
                write!(f, "{}", kind)
            }
        }
    }
}

// ============================================================================
// OptionMap
// ============================================================================

/// Read-only input to a parse call. Safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct OptionMap {
    entries: HashMap<String, Descriptor>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, descriptor: impl Into<Descriptor>) -> Self {
        self.insert(name, descriptor);
        self
    }

    pub fn custom<F>(self, name: &str, label: &str, func: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.entry(name, Descriptor::custom(label, func))
    }

    pub fn wildcard(self, descriptor: impl Into<Descriptor>) -> Self {
        self.entry(WILDCARD, descriptor)
    }

    pub fn insert(&mut self, name: &str, descriptor: impl Into<Descriptor>) {
        self.entries.insert(name.to_string(), descriptor.into());
    }

    /// Explicitly declared descriptor for `name`. The wildcard is not consulted.
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn wildcard_descriptor(&self) -> Option<&Descriptor> {
        self.entries.get(WILDCARD)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a JSON object of `name -> descriptor string`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for OptionMap
where
    K: AsRef<str>,
    V: Into<Descriptor>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v);
        }
        map
    }
}

impl<K, V> Extend<(K, V)> for OptionMap
where
    K: AsRef<str>,
    V: Into<Descriptor>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k.as_ref(), v);
        }
    }
}
