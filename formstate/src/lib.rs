//! Form state engine.
//!
//! `formstate` tracks values, validation status and error sets for a set of
//! named fields ("controls") that register with a [`Form`]. Controls send
//! commands to the form; the form owns the authoritative state and pushes a
//! read-only [`FieldSnapshot`](control::FieldSnapshot) back to each control
//! whenever something visible changes.
//!
//! # Example
//!
//! ```
//! use formstate::prelude::*;
//!
//! let form = Form::new(FormOptions::new().default_value([("email", "john@doe.com")]));
//! let email = Control::new(&form, "email", Rules::new().required().email()).unwrap();
//! assert!(email.is_valid());
//!
//! email.on_change("johndoe").unwrap();
//! assert!(email.errors().contains("email"));
//! ```

pub mod control;
pub mod error;
pub mod form;
pub mod status;
pub mod validation;
pub mod value;
pub mod wakeup;

mod lock;

pub use control::{Control, ControlHandle, ControlId, FieldSnapshot};
pub use error::{FormError, FormResult};
pub use form::{Form, FormOptions, FormSnapshot, SubmitOutcome};
pub use status::Status;
pub use value::{Model, Value};

pub mod prelude {
    pub use crate::control::{Control, FieldSnapshot};
    pub use crate::error::{FormError, FormResult};
    pub use crate::form::{Form, FormOptions, FormSnapshot, SubmitOutcome};
    pub use crate::status::Status;
    pub use crate::validation::{
        Errors, FormErrors, Param, Rules, ValidationContext, ValidatorRegistry,
    };
    pub use crate::value::{Model, Value};
}
