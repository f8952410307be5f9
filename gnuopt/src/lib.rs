//! GNU/POSIX style command-line parsing driven by a declarative option map.
//!
//! ```
//! use gnuopt::{parse, OptionMap, Value};
//!
//! let map = OptionMap::new()
//!     .entry("a", "switch")
//!     .entry("b", "switch")
//!     .entry("c", "string");
//! let parsed = parse(["able", "baker", "-abc", "charlie"], &map).unwrap();
//! assert_eq!(parsed.positional(), ["able", "baker"]);
//! assert_eq!(parsed.count("a"), 1);
//! assert_eq!(parsed.get("c"), Some(&Value::from("charlie")));
//! ```
//!
//! Supported:
//! - short flags and clusters (`-abc`)
//! - long flags with or without `=value`
//! - repeatable (`*type`) and slurp (`~type`) options
//! - aliases (`&name`) with circular reference detection
//! - a wildcard (`-`) entry for undeclared flags
//! - custom coercion functions

pub mod coerce;
pub mod error;
pub mod optmap;
pub mod parse;
pub mod resolve;
pub mod tokens;
pub mod value;

pub use coerce::coerce;
pub use error::{AccessError, BoxError, ParseError, Result};
pub use optmap::{Coercer, Descriptor, OptionMap, Sign, TypeKind, WILDCARD};
pub use parse::{parse, parse_env, Driver};
pub use resolve::{resolve, Resolved};
pub use tokens::gnu_args;
pub use value::{FromValue, Parsed, Value, POSITIONAL_KEY};
