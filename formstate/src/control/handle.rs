use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::form::Form;
use crate::lock;
use crate::status::Status;
use crate::validation::{evaluate, Errors, Rules, ValidationContext};
use crate::value::Value;

/// The single async validation hook a control may carry.
///
/// Receives the value being validated and a handle to the owning form.
pub type AsyncValidator = Arc<dyn Fn(Value, Form) -> BoxFuture<'static, Errors> + Send + Sync>;

/// Unique identifier for a control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

impl ControlId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__control_{}", self.0)
    }
}

/// Read-only view of one field, pushed by the form to its control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub value: Value,
    pub status: Status,
    pub errors: Errors,
}

/// What the form keeps in its registration table.
///
/// [`Control`](super::Control) is the usual implementation, but a rendering
/// layer can register anything that can validate a value on demand.
pub trait ControlHandle: Send + Sync {
    /// Identity of the registering instance.
    fn id(&self) -> ControlId;

    /// Validate `value` against the handle's current rules.
    fn run_validation(&self, value: &Value, cx: &ValidationContext<'_>) -> Errors;

    /// The async hook, if one is installed.
    fn async_validator(&self) -> Option<AsyncValidator> {
        None
    }

    /// Receive the latest state of the field.
    fn receive(&self, _snapshot: FieldSnapshot) {}
}

/// State shared between a [`Control`](super::Control) and the form's table.
pub(crate) struct ControlShared {
    id: ControlId,
    rules: RwLock<Rules>,
    async_validator: RwLock<Option<AsyncValidator>>,
    snapshot: RwLock<FieldSnapshot>,
    touched: AtomicBool,
    dirty: AtomicBool,
}

impl ControlShared {
    pub(crate) fn new(rules: Rules) -> Self {
        Self {
            id: ControlId::next(),
            rules: RwLock::new(rules),
            async_validator: RwLock::new(None),
            snapshot: RwLock::new(FieldSnapshot::default()),
            touched: AtomicBool::new(false),
            dirty: AtomicBool::new(false),
        }
    }

    pub(crate) fn rules(&self) -> Rules {
        lock::read(&self.rules).clone()
    }

    /// Swap in new rules, returning the previous ones.
    pub(crate) fn replace_rules(&self, rules: Rules) -> Rules {
        std::mem::replace(&mut *lock::write(&self.rules), rules)
    }

    pub(crate) fn set_async_validator(&self, hook: Option<AsyncValidator>) {
        *lock::write(&self.async_validator) = hook;
    }

    pub(crate) fn snapshot(&self) -> FieldSnapshot {
        lock::read(&self.snapshot).clone()
    }

    pub(crate) fn is_touched(&self) -> bool {
        self.touched.load(Ordering::SeqCst)
    }

    /// Returns `true` if the flag actually changed.
    pub(crate) fn set_touched(&self, touched: bool) -> bool {
        let changed = self.touched.swap(touched, Ordering::SeqCst) != touched;
        if changed {
            self.dirty.store(true, Ordering::SeqCst);
        }
        changed
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub(crate) fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl ControlHandle for ControlShared {
    fn id(&self) -> ControlId {
        self.id
    }

    fn run_validation(&self, value: &Value, cx: &ValidationContext<'_>) -> Errors {
        let rules = self.rules();
        evaluate(cx.form().registry(), &rules, value, cx)
    }

    fn async_validator(&self) -> Option<AsyncValidator> {
        lock::read(&self.async_validator).clone()
    }

    fn receive(&self, snapshot: FieldSnapshot) {
        let mut current = lock::write(&self.snapshot);
        if *current != snapshot {
            *current = snapshot;
            self.dirty.store(true, Ordering::SeqCst);
        }
    }
}
