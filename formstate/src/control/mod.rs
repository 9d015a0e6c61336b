//! Control - the runtime handle of a single named field.
//!
//! A control never owns its value. It forwards changes to the [`Form`] and
//! reads back whatever snapshot the form last pushed to it.

mod handle;

pub use handle::{AsyncValidator, ControlHandle, ControlId, FieldSnapshot};

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use handle::ControlShared;

use crate::error::FormResult;
use crate::form::Form;
use crate::status::Status;
use crate::validation::{Errors, Rules};
use crate::value::Value;

/// A named field registered with a form.
///
/// Creating a control registers it; [`detach`](Control::detach) or dropping
/// it deregisters it again, exactly once.
///
/// # Example
///
/// ```
/// use formstate::prelude::*;
///
/// let form = Form::new(FormOptions::new());
/// let name = Control::new(&form, "name", Rules::new().required().min_length(3)).unwrap();
/// assert!(name.is_init());
///
/// name.on_change("Al").unwrap();
/// assert!(name.errors().contains("minLength"));
///
/// name.on_change("Alice").unwrap();
/// assert!(name.is_valid());
/// ```
pub struct Control {
    name: String,
    form: Form,
    shared: Arc<ControlShared>,
    attached: bool,
}

impl Control {
    /// Create a control and register it with `form`.
    ///
    /// Fails if a rule names an unknown validator or the name is taken.
    pub fn new(form: &Form, name: impl Into<String>, rules: Rules) -> FormResult<Self> {
        let name = name.into();
        rules.check(form.registry())?;

        let shared = Arc::new(ControlShared::new(rules));
        form.add_control(&name, shared.clone())?;

        Ok(Self {
            name,
            form: form.clone(),
            shared,
            attached: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> ControlId {
        self.shared.id()
    }

    /// The owning form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The last state pushed by the form.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.shared.snapshot()
    }

    pub fn value(&self) -> Value {
        self.shared.snapshot().value
    }

    pub fn status(&self) -> Status {
        self.shared.snapshot().status
    }

    pub fn errors(&self) -> Errors {
        self.shared.snapshot().errors
    }

    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    /// Anything that is not `Valid`, including `Init` and `Pending`.
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn is_init(&self) -> bool {
        self.status().is_init()
    }

    pub fn is_pending(&self) -> bool {
        self.status().is_pending()
    }

    pub fn is_touched(&self) -> bool {
        self.shared.is_touched()
    }

    pub fn is_untouched(&self) -> bool {
        !self.is_touched()
    }

    /// Mark as touched. A no-op if already touched.
    pub fn mark_as_touched(&self) {
        self.shared.set_touched(true);
    }

    /// Mark as untouched. A no-op if already untouched.
    pub fn mark_as_untouched(&self) {
        self.shared.set_touched(false);
    }

    /// Whether anything visible changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.shared.is_dirty()
    }

    pub fn clear_dirty(&self) {
        self.shared.clear_dirty();
    }

    /// Forward a new value to the form.
    pub fn on_change(&self, value: impl Into<Value>) -> FormResult<()> {
        self.form.set_value(&self.name, value)
    }

    /// Forward a new value and run the async hook if the sync rules pass.
    pub async fn on_change_async(&self, value: impl Into<Value>) -> FormResult<Status> {
        self.form.set_value_async(&self.name, value.into()).await?;
        Ok(self.status())
    }

    /// Ask the form to validate this field now.
    pub fn validate(&self) -> FormResult<Status> {
        self.form.validate_control(&self.name)
    }

    pub fn rules(&self) -> Rules {
        self.shared.rules()
    }

    /// Replace the rules.
    ///
    /// Re-validates only when the set of rule names or a non-callback
    /// parameter changed. Returns whether a re-validation ran.
    pub fn set_rules(&self, rules: Rules) -> FormResult<bool> {
        rules.check(self.form.registry())?;
        let previous = self.shared.replace_rules(rules.clone());
        if !previous.differs_from(&rules) {
            return Ok(false);
        }
        log::debug!("Rules of '{}' changed, re-validating", self.name);
        self.form.validate_control(&self.name)?;
        Ok(true)
    }

    /// Install the async validation hook.
    pub fn set_async_validator<F, Fut>(&self, hook: F)
    where
        F: Fn(Value, Form) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Errors> + Send + 'static,
    {
        let boxed: AsyncValidator =
            Arc::new(move |value: Value, form: Form| -> BoxFuture<'static, Errors> {
                Box::pin(hook(value, form))
            });
        self.shared.set_async_validator(Some(boxed));
    }

    pub fn clear_async_validator(&self) {
        self.shared.set_async_validator(None);
    }

    /// Deregister from the form.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if !self.form.deregister(&self.name, self.shared.id()) {
            log::debug!(
                "Control '{}' ({}) was already removed from the form",
                self.name,
                self.shared.id()
            );
        }
    }
}

impl Drop for Control {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("id", &self.shared.id())
            .field("snapshot", &self.shared.snapshot())
            .field("touched", &self.shared.is_touched())
            .finish()
    }
}
