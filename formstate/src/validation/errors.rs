//! Error sets produced by validators.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error sets of every field, keyed by field name.
pub type FormErrors = BTreeMap<String, Errors>;

/// The set of failed validator names for one field.
///
/// An empty set means "no errors". On the wire the set is a map of
/// `name -> true`, e.g. `{"required": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    keys: BTreeSet<String>,
}

impl Errors {
    /// Create an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error set holding a single key.
    pub fn single(key: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(key);
        errors
    }

    /// Add a failed key.
    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Merge every key of `other` into this set.
    pub fn extend(&mut self, other: Errors) {
        self.keys.extend(other.keys);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterate over the failed keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Errors {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for Errors {
    fn from(keys: [&str; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.iter().collect();
        f.write_str(&keys.join(", "))
    }
}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for key in &self.keys {
            map.serialize_entry(key, &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Errors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ErrorsVisitor;

        impl<'de> Visitor<'de> for ErrorsVisitor {
            type Value = Errors;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of error names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Errors, A::Error> {
                let mut errors = Errors::new();
                while let Some((key, flagged)) = access.next_entry::<String, bool>()? {
                    if flagged {
                        errors.insert(key);
                    }
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(ErrorsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let errors = Errors::from(["required", "minLength"]);
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"minLength":true,"required":true}"#);
    }

    #[test]
    fn test_deserialize_drops_false_flags() {
        let errors: Errors = serde_json::from_str(r#"{"notUnique":true,"stale":false}"#).unwrap();
        assert!(errors.contains("notUnique"));
        assert!(!errors.contains("stale"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_extend_merges() {
        let mut errors = Errors::single("required");
        errors.extend(Errors::from(["required", "email"]));
        assert_eq!(errors.iter().collect::<Vec<_>>(), vec!["email", "required"]);
    }
}
