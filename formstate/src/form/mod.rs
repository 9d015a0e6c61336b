//! Form - the aggregate owner of every field's value, status and errors.
//!
//! Controls register with the form and send it commands. The form runs the
//! validators, stores the results, and after each visible change pushes a
//! [`FieldSnapshot`] to the affected control, calls the render callback and
//! records the change with the installed wakeup sender.
//!
//! No lock is held while validators or callbacks run, so both may call back
//! into the form.

mod options;
mod pending;
mod state;
mod submit;

pub use options::{
    ChangeCallback, FormOptions, InvalidSubmitCallback, RenderCallback, ValidSubmitCallback,
};
pub use state::{FormSnapshot, SubmitOutcome};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use state::FormState;

use crate::control::{ControlHandle, ControlId, FieldSnapshot};
use crate::error::{FormError, FormResult};
use crate::lock;
use crate::status::Status;
use crate::validation::{Errors, FormErrors, ValidationContext, ValidatorRegistry};
use crate::value::{Model, Value};
use crate::wakeup::{Wakeup, WakeupSender, WakeupSlot};

struct FormShared {
    options: FormOptions,
    registry: ValidatorRegistry,
    state: RwLock<FormState>,
    wakeup: WakeupSlot,
}

/// Handle to a form. Cheap to clone; clones share the same state.
///
/// # Example
///
/// ```
/// use formstate::prelude::*;
///
/// let form = Form::new(FormOptions::new().default_value([("foo", "bar")]));
/// let foo = Control::new(&form, "foo", Rules::new().required()).unwrap();
/// assert_eq!(form.status_of("foo"), Some(Status::Valid));
///
/// form.set_value("foo", "").unwrap();
/// assert_eq!(form.status_of("foo"), Some(Status::Invalid));
/// assert!(form.errors()["foo"].contains("required"));
/// # drop(foo);
/// ```
#[derive(Clone)]
pub struct Form {
    shared: Arc<FormShared>,
}

impl Form {
    /// Create a form from construction-time options.
    pub fn new(options: FormOptions) -> Self {
        let registry = options
            .registry
            .clone()
            .unwrap_or_else(|| ValidatorRegistry::global().clone());
        let state = FormState::new(options.default_value.clone());
        Self {
            shared: Arc::new(FormShared {
                options,
                registry,
                state: RwLock::new(state),
                wakeup: WakeupSlot::default(),
            }),
        }
    }

    /// The registry validators are looked up in.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.shared.registry
    }

    /// Install the sender signalled after every render notification.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.shared.wakeup.install(sender);
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a control under `name`.
    ///
    /// If the value map already holds an entry for `name` the field is
    /// validated right away; otherwise it starts in [`Status::Init`].
    pub fn add_control(&self, name: &str, handle: Arc<dyn ControlHandle>) -> FormResult<()> {
        let existing = {
            let state = lock::read(&self.shared.state);
            if state.is_registered(name) {
                return Err(FormError::already_registered(name));
            }
            state.value.get(name).cloned()
        };

        let errors = match &existing {
            Some(value) => self.run(handle.as_ref(), name, value),
            None => Errors::new(),
        };

        let status = {
            let mut state = lock::write(&self.shared.state);
            state.controls.insert(name.to_string(), handle);
            match existing {
                Some(_) => state.apply(name, errors),
                None => {
                    state.errors.insert(name.to_string(), errors);
                    state.status.insert(name.to_string(), Status::Init);
                    Status::Init
                }
            }
        };

        debug!("Registered control '{}' ({})", name, status);
        self.notify_render(name);
        Ok(())
    }

    /// Deregister `name` and forget its value, errors and status.
    pub fn remove_control(&self, name: &str) -> FormResult<()> {
        {
            let mut state = lock::write(&self.shared.state);
            if state.controls.remove(name).is_none() {
                return Err(FormError::not_found(name));
            }
            state.forget(name);
        }

        debug!("Removed control '{}'", name);
        self.notify_change();
        self.notify_render(name);
        Ok(())
    }

    /// Deregister `name` only if it is still held by control `id`.
    pub(crate) fn deregister(&self, name: &str, id: ControlId) -> bool {
        {
            let mut state = lock::write(&self.shared.state);
            let owned = state.controls.get(name).is_some_and(|handle| handle.id() == id);
            if !owned {
                return false;
            }
            state.controls.remove(name);
            state.forget(name);
        }

        debug!("Control '{}' ({}) detached", name, id);
        self.notify_change();
        self.notify_render(name);
        true
    }

    pub fn has_control(&self, name: &str) -> bool {
        lock::read(&self.shared.state).is_registered(name)
    }

    /// Names of the registered controls, sorted.
    pub fn control_names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock::read(&self.shared.state)
            .controls
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    // =========================================================================
    // Values and errors
    // =========================================================================

    /// Current value of a field.
    pub fn value(&self, name: &str) -> Option<Value> {
        lock::read(&self.shared.state).value.get(name).cloned()
    }

    /// The whole value map.
    pub fn values(&self) -> Model {
        lock::read(&self.shared.state).value.clone()
    }

    /// Write a field's value, then re-validate that field.
    ///
    /// Only the changed field is re-validated. A field whose `equalToControl`
    /// rule points at `name` keeps its old result until it is validated again.
    /// Values for unregistered names are stored without validation.
    pub fn set_value(&self, name: &str, value: impl Into<Value>) -> FormResult<()> {
        let registered = self.store_value(name, value.into());
        self.notify_change();

        if registered {
            self.validate_control(name)?;
        } else {
            trace!("Stored value for unregistered field '{}'", name);
        }
        Ok(())
    }

    fn store_value(&self, name: &str, value: Value) -> bool {
        let mut state = lock::write(&self.shared.state);
        state.value.insert(name.to_string(), value);
        state.next_ticket(name);
        state.is_registered(name)
    }

    /// Override a field's errors without running its validators.
    ///
    /// Used for errors that come from elsewhere, such as a server-side
    /// uniqueness check. The status follows from whether `errors` is empty.
    /// An async attempt still in flight for the field is superseded and its
    /// result will be discarded.
    pub fn set_errors(&self, name: &str, errors: Errors) -> FormResult<()> {
        let status = {
            let mut state = lock::write(&self.shared.state);
            if !state.is_registered(name) {
                return Err(FormError::not_found(name));
            }
            state.next_ticket(name);
            state.apply(name, errors)
        };

        trace!("Errors set on '{}' ({})", name, status);
        self.notify_render(name);
        Ok(())
    }

    /// Validate a field against its current value and store the result.
    pub fn validate_control(&self, name: &str) -> FormResult<Status> {
        let (handle, value) = {
            let state = lock::read(&self.shared.state);
            let handle = state
                .controls
                .get(name)
                .cloned()
                .ok_or_else(|| FormError::not_found(name))?;
            (handle, state.value.get(name).cloned().unwrap_or_default())
        };

        let errors = self.run(handle.as_ref(), name, &value);
        let status = Status::from_errors(&errors);
        self.set_errors(name, errors)?;
        Ok(status)
    }

    fn run(&self, handle: &dyn ControlHandle, name: &str, value: &Value) -> Errors {
        let cx = ValidationContext::new(self, name);
        handle.run_validation(value, &cx)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn status_of(&self, name: &str) -> Option<Status> {
        lock::read(&self.shared.state).status.get(name).copied()
    }

    pub fn errors_of(&self, name: &str) -> Option<Errors> {
        lock::read(&self.shared.state).errors.get(name).cloned()
    }

    /// Value, status and errors of a registered field.
    pub fn field(&self, name: &str) -> Option<FieldSnapshot> {
        let state = lock::read(&self.shared.state);
        state.is_registered(name).then(|| state.field(name))
    }

    pub fn statuses(&self) -> BTreeMap<String, Status> {
        lock::read(&self.shared.state).status.clone()
    }

    pub fn errors(&self) -> FormErrors {
        lock::read(&self.shared.state).errors.clone()
    }

    /// `Valid` when every field is valid, `Invalid` otherwise.
    pub fn status(&self) -> Status {
        if self.is_valid() {
            Status::Valid
        } else {
            Status::Invalid
        }
    }

    /// Every field is `Valid`. An empty form is valid.
    pub fn is_valid(&self) -> bool {
        lock::read(&self.shared.state).is_valid()
    }

    /// Some field was never validated.
    pub fn is_init(&self) -> bool {
        lock::read(&self.shared.state).is_init()
    }

    /// Some field waits for its async hook.
    pub fn is_pending(&self) -> bool {
        lock::read(&self.shared.state).is_pending()
    }

    /// Not submittable as-is: some field is unvalidated, or nothing is
    /// pending and some field failed.
    pub fn is_invalid(&self) -> bool {
        let state = lock::read(&self.shared.state);
        state.is_init() || (!state.is_pending() && !state.is_valid())
    }

    pub fn is_submitted(&self) -> bool {
        lock::read(&self.shared.state).submitted
    }

    pub fn submit_count(&self) -> u32 {
        lock::read(&self.shared.state).submit_count
    }

    pub fn snapshot(&self) -> FormSnapshot {
        lock::read(&self.shared.state).snapshot()
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// A field changed: push its snapshot to the control, then tell the
    /// host to re-render.
    fn notify_render(&self, name: &str) {
        let push = {
            let state = lock::read(&self.shared.state);
            state
                .controls
                .get(name)
                .map(|handle| (Arc::clone(handle), state.field(name)))
        };
        if let Some((handle, snapshot)) = push {
            handle.receive(snapshot);
        }
        self.render(Wakeup::Field(name.to_string()));
    }

    /// Form-level state changed: push snapshots to every control.
    fn notify_render_all(&self) {
        let pushes: Vec<(Arc<dyn ControlHandle>, FieldSnapshot)> = {
            let state = lock::read(&self.shared.state);
            state
                .controls
                .iter()
                .map(|(name, handle)| (Arc::clone(handle), state.field(name)))
                .collect()
        };
        for (handle, snapshot) in pushes {
            handle.receive(snapshot);
        }
        self.render(Wakeup::Form);
    }

    fn render(&self, change: Wakeup) {
        if let Some(on_render) = &self.shared.options.on_render {
            on_render();
        }
        self.shared.wakeup.notify(change);
    }

    fn notify_change(&self) {
        if let Some(on_change) = &self.shared.options.on_change {
            on_change(&self.values());
        }
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock::read(&self.shared.state);
        f.debug_struct("Form")
            .field("value", &state.value)
            .field("status", &state.status)
            .field("submitted", &state.submitted)
            .finish()
    }
}
