use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::control::{ControlHandle, FieldSnapshot};
use crate::status::Status;
use crate::validation::{Errors, FormErrors};
use crate::value::Model;

/// Which submit callback was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    Valid,
    Invalid,
}

/// Point-in-time view of the whole form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub value: Model,
    pub status: BTreeMap<String, Status>,
    pub errors: FormErrors,
    pub submitted: bool,
    pub submit_count: u32,
    pub is_valid: bool,
    pub is_init: bool,
    pub is_pending: bool,
}

/// Authoritative per-field maps. Only the form touches these.
#[derive(Default)]
pub(super) struct FormState {
    pub(super) controls: HashMap<String, Arc<dyn ControlHandle>>,
    pub(super) value: Model,
    pub(super) errors: FormErrors,
    pub(super) status: BTreeMap<String, Status>,
    pub(super) tickets: HashMap<String, u64>,
    pub(super) submitted: bool,
    pub(super) submit_count: u32,
}

impl FormState {
    pub(super) fn new(value: Model) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    pub(super) fn is_registered(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    /// Store a validation result and derive the status from it.
    pub(super) fn apply(&mut self, name: &str, errors: Errors) -> Status {
        let status = Status::from_errors(&errors);
        self.errors.insert(name.to_string(), errors);
        self.status.insert(name.to_string(), status);
        status
    }

    pub(super) fn mark_pending(&mut self, name: &str) {
        self.errors.insert(name.to_string(), Errors::new());
        self.status.insert(name.to_string(), Status::Pending);
    }

    /// Drop the value, errors and status of a field.
    ///
    /// The ticket counter survives and is advanced, so an attempt started
    /// before removal can never match one of a control registered later
    /// under the same name.
    pub(super) fn forget(&mut self, name: &str) {
        self.value.remove(name);
        self.errors.remove(name);
        self.status.remove(name);
        self.next_ticket(name);
    }

    /// Start a new validation attempt, invalidating older ones.
    pub(super) fn next_ticket(&mut self, name: &str) -> u64 {
        let ticket = self.tickets.entry(name.to_string()).or_insert(0);
        *ticket += 1;
        *ticket
    }

    pub(super) fn is_latest(&self, name: &str, ticket: u64) -> bool {
        self.tickets.get(name).copied() == Some(ticket)
    }

    pub(super) fn field(&self, name: &str) -> FieldSnapshot {
        FieldSnapshot {
            value: self.value.get(name).cloned().unwrap_or_default(),
            status: self.status.get(name).copied().unwrap_or_default(),
            errors: self.errors.get(name).cloned().unwrap_or_default(),
        }
    }

    pub(super) fn init_fields(&self) -> Vec<String> {
        self.status
            .iter()
            .filter(|(_, status)| status.is_init())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Every known field is `Valid`. An empty form is valid.
    pub(super) fn is_valid(&self) -> bool {
        self.status.values().all(|s| s.is_valid())
    }

    pub(super) fn is_init(&self) -> bool {
        self.status.values().any(|s| s.is_init())
    }

    pub(super) fn is_pending(&self) -> bool {
        self.status.values().any(|s| s.is_pending())
    }

    pub(super) fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            value: self.value.clone(),
            status: self.status.clone(),
            errors: self.errors.clone(),
            submitted: self.submitted,
            submit_count: self.submit_count,
            is_valid: self.is_valid(),
            is_init: self.is_init(),
            is_pending: self.is_pending(),
        }
    }
}
