//! Value enum for dynamic field values

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The value map of a form, keyed by field name.
pub type Model = BTreeMap<String, Value>;

/// A dynamic value that a form field can hold.
///
/// `Value::Null` is the "absent" value. Every built-in validator except
/// `required` treats it as trivially valid.
///
/// # Example
///
/// ```
/// use formstate::Value;
///
/// let name = Value::from("Contoso");
/// let age = Value::from(42i64);
/// let subscribed = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/absent value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Ordered list of values (multi-selects, tag inputs).
    List(Vec<Value>),
    /// Structured value.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Number of characters in the stringified value.
    pub fn char_len(&self) -> usize {
        match self {
            Value::String(s) => s.chars().count(),
            other => other.to_string().chars().count(),
        }
    }
}

/// Stringification used by the length and pattern validators.
///
/// Lists are joined with `,` and maps are rendered as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringification() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(12i64).to_string(), "12");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a,b");
        assert_eq!(Value::from(false).to_string(), "false");
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Value::from("héllo").char_len(), 5);
        assert_eq!(Value::from(1234i64).char_len(), 4);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({ "name": "foo", "tags": ["a", 1], "age": 3, "ratio": 0.5 });
        let Value::Map(map) = Value::from(json) else {
            panic!("expected a map");
        };
        assert_eq!(map["name"], Value::from("foo"));
        assert_eq!(map["tags"], Value::List(vec![Value::from("a"), Value::Int(1)]));
        assert_eq!(map["age"], Value::Int(3));
        assert_eq!(map["ratio"], Value::Float(0.5));
    }

    #[test]
    fn test_untagged_deserialize() {
        let value: Value = serde_json::from_str(r#"[null, true, "x"]"#).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::Null, Value::Bool(true), Value::from("x")])
        );
    }
}
