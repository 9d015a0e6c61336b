//! Validation primitives.
//!
//! Validators are registered by name in a [`ValidatorRegistry`]. A control
//! declares which of them apply through an explicit [`Rules`] list, and
//! [`evaluate`] runs every applicable rule and merges the failures into one
//! [`Errors`] set.
//!
//! # Example
//!
//! ```
//! use formstate::prelude::*;
//! use formstate::validation::evaluate;
//!
//! let form = Form::new(FormOptions::new());
//! let registry = ValidatorRegistry::with_builtins();
//! let rules = Rules::new().required().min_length(5);
//! let cx = ValidationContext::new(&form, "username");
//!
//! let errors = evaluate(&registry, &rules, &Value::from("bob"), &cx);
//! assert_eq!(errors, Errors::from(["minLength"]));
//! ```

pub mod builtin;

mod errors;
mod evaluator;
mod param;
mod registry;
mod rules;

pub use errors::{Errors, FormErrors};
pub use evaluator::evaluate;
pub use param::{Param, Predicate};
pub use registry::{ValidatorFn, ValidatorRegistry};
pub use rules::{Rule, Rules};

use crate::form::Form;
use crate::value::Value;

/// What a validator can see besides the value: the owning form and the
/// name of the field being validated.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    form: &'a Form,
    field: &'a str,
}

impl<'a> ValidationContext<'a> {
    pub fn new(form: &'a Form, field: &'a str) -> Self {
        Self { form, field }
    }

    /// The form owning the field.
    pub fn form(&self) -> &'a Form {
        self.form
    }

    /// Name of the field being validated.
    pub fn field(&self) -> &'a str {
        self.field
    }

    /// Current form value of another field.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.form.value(name)
    }
}
