//! Declarative rule lists for a single field.

use std::collections::BTreeSet;

use regex::Regex;

use super::builtin;
use super::param::Param;
use super::registry::ValidatorRegistry;
use super::ValidationContext;
use crate::error::{FormError, FormResult};
use crate::value::Value;

/// One `{validator name, parameter}` pair.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    param: Param,
}

impl Rule {
    pub fn new(name: impl Into<String>, param: impl Into<Param>) -> Self {
        Self {
            name: name.into(),
            param: param.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> &Param {
        &self.param
    }
}

/// Ordered list of rules declared on a control.
///
/// Each validator name appears at most once; declaring it again replaces the
/// parameter in place.
///
/// # Example
///
/// ```
/// use formstate::validation::Rules;
///
/// let rules = Rules::new()
///     .required()
///     .min_length(3)
///     .max_length(20);
/// assert_eq!(rules.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rules {
    entries: Vec<Rule>,
}

impl Rules {
    /// Create an empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule for any registered validator.
    pub fn rule(mut self, name: impl Into<String>, param: impl Into<Param>) -> Self {
        self.push(Rule::new(name, param));
        self
    }

    /// Require a non-empty value.
    pub fn required(self) -> Self {
        self.rule(builtin::REQUIRED, true)
    }

    /// Require at least `min` characters.
    pub fn min_length(self, min: usize) -> Self {
        self.rule(builtin::MIN_LENGTH, min)
    }

    /// Require at most `max` characters.
    pub fn max_length(self, max: usize) -> Self {
        self.rule(builtin::MAX_LENGTH, max)
    }

    /// Require the value to match a compiled pattern.
    pub fn pattern(self, pattern: Regex) -> Self {
        self.rule(builtin::PATTERN, pattern)
    }

    /// Compile `pattern` and require the value to match it.
    pub fn try_pattern(self, pattern: &str) -> FormResult<Self> {
        let re = Regex::new(pattern)?;
        Ok(self.pattern(re))
    }

    /// Require a valid email address.
    pub fn email(self) -> Self {
        self.rule(builtin::EMAIL, true)
    }

    /// Require the value to equal the current value of another field.
    pub fn equal_to_control(self, field: impl Into<String>) -> Self {
        self.rule(builtin::EQUAL_TO_CONTROL, Param::Field(field.into()))
    }

    /// Require `predicate` to hold for the value.
    pub fn callback<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.rule(builtin::CALLBACK, Param::callback(predicate))
    }

    fn push(&mut self, rule: Rule) {
        match self.entries.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => existing.param = rule.param,
            None => self.entries.push(rule),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.entries.iter().find(|r| r.name == name).map(|r| &r.param)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail on the first rule whose validator is not registered.
    pub fn check(&self, registry: &ValidatorRegistry) -> FormResult<()> {
        match self.entries.iter().find(|rule| !registry.has(&rule.name)) {
            Some(rule) => Err(FormError::unknown_validator(&rule.name)),
            None => Ok(()),
        }
    }

    /// Whether switching from `self` to `next` requires re-validation.
    ///
    /// A different set of names always counts as a change. Otherwise only
    /// non-callback parameters are compared.
    pub fn differs_from(&self, next: &Rules) -> bool {
        let old_names: BTreeSet<&str> = self.entries.iter().map(|r| r.name.as_str()).collect();
        let new_names: BTreeSet<&str> = next.entries.iter().map(|r| r.name.as_str()).collect();
        if old_names != new_names {
            return true;
        }

        self.entries.iter().any(|rule| {
            if rule.param.is_callback() {
                return false;
            }
            next.get(&rule.name).is_none_or(|param| !rule.param.same_as(param))
        })
    }
}
