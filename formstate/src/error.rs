//! Error types for misuse of the form API.
//!
//! Validation failures are never errors: they end up as data in
//! [`Errors`](crate::validation::Errors). `FormError` only covers integration
//! bugs such as validating a field that was never registered.

use thiserror::Error;

/// Errors returned by [`Form`](crate::Form) and [`Control`](crate::Control) operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// The named field has no registered control.
    #[error("Control '{field}' is not registered")]
    NotFound { field: String },

    /// A control with the same name is already registered.
    #[error("Control '{field}' is already registered")]
    AlreadyRegistered { field: String },

    /// A rule names a validator the registry does not know.
    #[error("Validator '{name}' is not registered")]
    UnknownValidator { name: String },

    /// A `pattern` rule could not be compiled.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Default values could not be parsed.
    #[error("Invalid default value: {0}")]
    InvalidDefaults(#[from] serde_json::Error),
}

impl FormError {
    /// Creates a new not-found error.
    pub fn not_found(field: impl Into<String>) -> Self {
        Self::NotFound {
            field: field.into(),
        }
    }

    /// Creates a new already-registered error.
    pub fn already_registered(field: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            field: field.into(),
        }
    }

    /// Creates a new unknown-validator error.
    pub fn unknown_validator(name: impl Into<String>) -> Self {
        Self::UnknownValidator { name: name.into() }
    }
}

pub type FormResult<T> = Result<T, FormError>;
