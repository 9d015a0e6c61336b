//! Rule parameters.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::ValidationContext;
use crate::value::Value;

/// Predicate used by the `callback` validator.
pub type Predicate = Arc<dyn Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync>;

/// The parameter attached to a rule.
#[derive(Clone)]
pub enum Param {
    /// Plain on/off directive (`required`, `email`). `Flag(false)` disables the rule.
    Flag(bool),
    /// Length bound for `minLength`/`maxLength`.
    Length(usize),
    /// Compiled pattern for `pattern`.
    Pattern(Regex),
    /// Name of a sibling field (`equalToControl`).
    Field(String),
    /// Predicate for `callback`.
    Callback(Predicate),
    /// Arbitrary parameter for custom validators.
    Value(Value),
}

impl Param {
    /// Wrap a closure as a callback parameter.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        Param::Callback(Arc::new(f))
    }

    /// Returns `true` unless this is `Flag(false)`.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Param::Flag(false))
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Param::Callback(_))
    }

    /// Returns the kind name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Param::Flag(_) => "flag",
            Param::Length(_) => "length",
            Param::Pattern(_) => "pattern",
            Param::Field(_) => "field",
            Param::Callback(_) => "callback",
            Param::Value(_) => "value",
        }
    }

    /// Value equality used to detect rule changes.
    ///
    /// Callbacks compare equal to any other callback: they are assumed stable.
    pub fn same_as(&self, other: &Param) -> bool {
        match (self, other) {
            (Param::Flag(a), Param::Flag(b)) => a == b,
            (Param::Length(a), Param::Length(b)) => a == b,
            (Param::Pattern(a), Param::Pattern(b)) => a.as_str() == b.as_str(),
            (Param::Field(a), Param::Field(b)) => a == b,
            (Param::Callback(_), Param::Callback(_)) => true,
            (Param::Value(a), Param::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Flag(v) => f.debug_tuple("Flag").field(v).finish(),
            Param::Length(v) => f.debug_tuple("Length").field(v).finish(),
            Param::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Param::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Param::Callback(_) => f.write_str("Callback(..)"),
            Param::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Flag(v)
    }
}

impl From<usize> for Param {
    fn from(v: usize) -> Self {
        Param::Length(v)
    }
}

impl From<Regex> for Param {
    fn from(v: Regex) -> Self {
        Param::Pattern(v)
    }
}

impl From<Value> for Param {
    fn from(v: Value) -> Self {
        Param::Value(v)
    }
}
