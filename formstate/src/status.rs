//! Field validation status.

use serde::Deserialize;
use serde::Serialize;

use crate::validation::Errors;

/// Validation status of a single field.
///
/// A field starts in `Init` and only leaves it through validation. It never
/// returns to `Init` unless it is removed from the form and registered again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Declared but never validated.
    #[default]
    Init,
    /// An async validation hook is in flight.
    Pending,
    /// Last validation produced no errors.
    Valid,
    /// Last validation produced at least one error.
    Invalid,
}

impl Status {
    /// Status derived from a validation result.
    pub fn from_errors(errors: &Errors) -> Self {
        if errors.is_empty() {
            Status::Valid
        } else {
            Status::Invalid
        }
    }

    pub fn is_init(self) -> bool {
        self == Status::Init
    }

    pub fn is_pending(self) -> bool {
        self == Status::Pending
    }

    pub fn is_valid(self) -> bool {
        self == Status::Valid
    }

    pub fn is_invalid(self) -> bool {
        self == Status::Invalid
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Init => "INIT",
            Status::Pending => "PENDING",
            Status::Valid => "VALID",
            Status::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}
