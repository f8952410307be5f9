/// Boxed failure raised by a custom coercer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failed parse. Every variant aborts the whole parse call.
///
/// `option` is always the flag name as the user typed it, before any
/// alias was followed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A token failed coercion, a flag was left without its value, or a
    /// value was given to a `switch`.
    #[error("\"{}\" is invalid for \"{option}\" ({ty})", display_or_undefined(.value.as_deref()))]
    InvalidValue {
        option: String,
        ty: String,
        value: Option<String>,
        #[source]
        inner: Option<BoxError>,
    },

    /// A flag without `*` or `~` appeared a second time.
    #[error("\"{option}\" is unallowed to appear multiple times")]
    InvalidRepetition { option: String },

    /// No map entry (and no wildcard), an alias to an undeclared key, or
    /// a type name that is not a builtin.
    #[error("\"{}\" is undefined type", display_or_undefined(.ty.as_deref()))]
    UndefinedType { option: String, ty: Option<String> },

    /// Alias resolution came back to a name it had already visited.
    #[error("\"{option}\" has circular reference: {}", .route.join(" -> "))]
    CircularReference { option: String, route: Vec<String> },
}

fn display_or_undefined(s: Option<&str>) -> &str {
    s.unwrap_or("undefined")
}

impl ParseError {
    /// Stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::InvalidValue { .. } => "InvalidValue",
            ParseError::InvalidRepetition { .. } => "InvalidRepetition",
            ParseError::UndefinedType { .. } => "UndefinedType",
            ParseError::CircularReference { .. } => "CircularReference",
        }
    }

    /// The originally typed flag name.
    pub fn option(&self) -> &str {
        match self {
            ParseError::InvalidValue { option, .. }
            | ParseError::InvalidRepetition { option }
            | ParseError::UndefinedType { option, .. }
            | ParseError::CircularReference { option, .. } => option,
        }
    }

    pub(crate) fn missing_value(option: &str, ty: impl ToString) -> Self {
        ParseError::InvalidValue {
            option: option.to_string(),
            ty: ty.to_string(),
            value: None,
            inner: None,
        }
    }

    pub(crate) fn invalid_value(option: &str, ty: impl ToString, value: &str) -> Self {
        ParseError::InvalidValue {
            option: option.to_string(),
            ty: ty.to_string(),
            value: Some(value.to_string()),
            inner: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Failure to read a value back out of a [`Parsed`](crate::Parsed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("option not found: {0}")]
    NotFound(String),

    #[error("option \"{0}\" was given without a value")]
    Missing(String),

    #[error("type mismatch for \"{name}\": expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },
}
