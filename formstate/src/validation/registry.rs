//! Named validator registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use super::builtin;
use super::errors::Errors;
use super::param::Param;
use super::ValidationContext;
use crate::lock;
use crate::value::Value;

/// A validator: returns `None` when the value passes, or the failed keys.
pub type ValidatorFn =
    Arc<dyn Fn(&Value, &Param, &ValidationContext<'_>) -> Option<Errors> + Send + Sync>;

/// Registry mapping validator names to validator functions.
///
/// The registry is a cheap-to-clone handle; clones share the same table.
/// Forms use [`ValidatorRegistry::global`] unless a registry is passed in
/// through [`FormOptions::registry`](crate::FormOptions::registry).
///
/// # Example
///
/// ```
/// use formstate::validation::{Errors, Param, ValidatorRegistry};
///
/// let registry = ValidatorRegistry::with_builtins();
/// registry.add("notEqual", |value, param, _cx| match param {
///     Param::Value(other) if value == other => Some(Errors::single("notEqual")),
///     _ => None,
/// });
/// assert!(registry.has("notEqual"));
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    inner: Arc<RwLock<HashMap<String, ValidatorFn>>>,
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in validators.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtin::install(&registry);
        registry
    }

    /// The process-wide registry.
    ///
    /// Seeded with the built-ins on first access and never reset afterwards.
    pub fn global() -> &'static ValidatorRegistry {
        static GLOBAL: OnceLock<ValidatorRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ValidatorRegistry::with_builtins)
    }

    /// Register a validator, replacing any existing one with the same name.
    pub fn add<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value, &Param, &ValidationContext<'_>) -> Option<Errors> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registering validator '{}'", name);
        lock::write(&self.inner).insert(name, Arc::new(f));
    }

    /// Remove a validator. Returns whether it was registered.
    pub fn delete(&self, name: &str) -> bool {
        lock::write(&self.inner).remove(name).is_some()
    }

    /// Look up a validator by name.
    pub fn get(&self, name: &str) -> Option<ValidatorFn> {
        lock::read(&self.inner).get(name).cloned()
    }

    /// Returns `true` if a validator is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        lock::read(&self.inner).contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock::read(&self.inner).keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
