use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar fact value or a coerced literal.
///
/// Deserializes untagged from JSON: integers that fit in `i64` become `Int`,
/// other numbers `Float`, strings `String`. Booleans, null, arrays and
/// objects are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

/// The data a rule is evaluated against, keyed by field name.
pub type Facts = HashMap<String, Value>;

impl Value {
    /// Coerce the raw text of a literal into a value.
    ///
    /// One leading and one trailing `'` are stripped when both are present.
    /// Text containing `.` is tried as a float, anything else as an integer;
    /// when parsing fails the text is kept as a string.
    pub fn coerce_literal(raw: &str) -> Self {
        let text = raw
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(raw);

        if text.contains('.') {
            if let Ok(f) = text.parse::<f64>() {
                return Self::Float(f);
            }
        } else if let Ok(i) = text.parse::<i64>() {
            return Self::Int(i);
        }
        Self::String(text.to_owned())
    }

    /// Returns a string representation of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Structural equality; numbers compare across `Int` and `Float`, values
    /// of unrelated types are simply unequal.
    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    pub(crate) fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }

    /// Natural ordering between two values, or `None` when the types have no
    /// common ordering (number vs string) or a float is `NaN`.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn ordering(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}
