//! Async validation.
//!
//! Each attempt takes a per-field ticket. Any later attempt, or a new value,
//! advances the ticket, and a resolution carrying an older ticket is dropped
//! instead of overwriting fresher state.

use log::debug;

use super::Form;
use crate::error::{FormError, FormResult};
use crate::lock;
use crate::status::Status;
use crate::validation::Errors;
use crate::value::Value;

impl Form {
    /// Validate a field, running its async hook when the sync rules pass.
    ///
    /// While the hook is in flight the field is [`Status::Pending`]. Returns
    /// the field's status once this attempt settles, or the current status if
    /// the attempt was superseded.
    pub async fn validate_control_async(&self, name: &str) -> FormResult<Status> {
        let (handle, value, ticket) = {
            let mut state = lock::write(&self.shared.state);
            let handle = state
                .controls
                .get(name)
                .cloned()
                .ok_or_else(|| FormError::not_found(name))?;
            let ticket = state.next_ticket(name);
            (handle, state.value.get(name).cloned().unwrap_or_default(), ticket)
        };

        let errors = self.run(handle.as_ref(), name, &value);
        let hook = match handle.async_validator() {
            Some(hook) if errors.is_empty() => hook,
            _ => return Ok(self.settle(name, ticket, errors)),
        };

        {
            let mut state = lock::write(&self.shared.state);
            if !state.is_latest(name, ticket) {
                return Ok(state.status.get(name).copied().unwrap_or_default());
            }
            state.mark_pending(name);
        }
        debug!("Async validation of '{}' started (ticket {})", name, ticket);
        self.notify_render(name);

        let errors = hook(value, self.clone()).await;
        Ok(self.settle(name, ticket, errors))
    }

    /// Write a value, then validate it including the async hook.
    ///
    /// Values for unregistered names are stored without validation.
    pub async fn set_value_async(&self, name: &str, value: Value) -> FormResult<()> {
        let registered = self.store_value(name, value);
        self.notify_change();

        if registered {
            self.validate_control_async(name).await?;
        }
        Ok(())
    }

    /// Apply `errors` if `ticket` is still the latest attempt for `name`.
    fn settle(&self, name: &str, ticket: u64, errors: Errors) -> Status {
        let applied = {
            let mut state = lock::write(&self.shared.state);
            if state.is_registered(name) && state.is_latest(name, ticket) {
                Ok(state.apply(name, errors))
            } else {
                Err(state.status.get(name).copied().unwrap_or_default())
            }
        };

        match applied {
            Ok(status) => {
                self.notify_render(name);
                status
            }
            Err(current) => {
                debug!(
                    "Discarding stale validation of '{}' (ticket {})",
                    name, ticket
                );
                current
            }
        }
    }
}
